//! Engine configuration.
//!
//! Every detector tunable lives here so a deployment can widen or narrow the
//! search without touching detector code. The defaults are the calibrated
//! production values; the two hard budgets (`cycle_max_results`,
//! `shell_step_budget`) are what guarantee termination on dense graphs.

use serde::{Deserialize, Serialize};

/// Tunables for a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum cycle length (in accounts) reported by the cycle detector.
    pub cycle_min_len: usize,
    /// Maximum cycle length reported by the cycle detector.
    pub cycle_max_len: usize,
    /// Hard cap on accepted cycles across the whole run.
    pub cycle_max_results: usize,

    /// Minimum unique partners for a fan-in/fan-out hub.
    pub smurf_threshold: usize,

    /// Maximum total transactions for an account to count as a shell.
    pub shell_max_tx: u64,
    /// Minimum accounts in a shell chain.
    pub shell_min_chain: usize,
    /// Minimum shell intermediaries required in a chain.
    pub shell_min_interior: usize,
    /// Chains longer than this many accounts are not expanded further.
    pub shell_max_chain: usize,
    /// Hard budget on BFS frontier expansions across the whole run.
    pub shell_step_budget: usize,
    /// Hard cap on accepted shell chains.
    pub shell_max_results: usize,

    /// Minimum unique senders for the merchant legitimacy shape.
    pub merchant_in_degree: usize,
    /// Minimum unique recipients for the payroll legitimacy shapes.
    pub payroll_out_degree: usize,

    /// Burst window for temporal scoring, in hours.
    pub burst_window_hours: i64,
    /// Velocity window, in hours.
    pub velocity_window_hours: i64,
    /// Extended (one week) burst window, in hours.
    pub week_window_hours: i64,

    /// Maximum nodes emitted in the rendering payload.
    pub max_graph_nodes: usize,

    /// Soft upper bound on transactions per call; exceeding it logs a warning.
    pub soft_transaction_bound: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cycle_min_len: 3,
            cycle_max_len: 5,
            cycle_max_results: 500,
            smurf_threshold: 10,
            shell_max_tx: 3,
            shell_min_chain: 3,
            shell_min_interior: 2,
            shell_max_chain: 6,
            shell_step_budget: 50_000,
            shell_max_results: 300,
            merchant_in_degree: 12,
            payroll_out_degree: 15,
            burst_window_hours: 72,
            velocity_window_hours: 24,
            week_window_hours: 168,
            max_graph_nodes: 800,
            soft_transaction_bound: 10_000,
        }
    }
}
