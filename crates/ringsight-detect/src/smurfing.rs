//! Fan-in / fan-out hub analysis.
//!
//! A single pass over non-legitimate accounts. An account with at least the
//! threshold number of unique senders is a fan-in hub; unique receivers, a
//! fan-out hub. The same account can hold both roles and then produces two
//! hits; the consolidator reconciles them.

use crate::types::{FanRole, SmurfingHit};
use chrono::Duration;
use ringsight_core::config::EngineConfig;
use ringsight_graph::{window::max_count_in_window, TxGraph};
use std::collections::HashSet;

/// Detect fan-in and fan-out hubs.
///
/// `max_window_count` on each hit is the largest number of transactions
/// touching the hub (incoming and outgoing merged) that fit inside any
/// contiguous 72-hour window, which feeds the hub score.
#[must_use]
pub fn detect_smurfing(
    graph: &TxGraph,
    legit: &HashSet<String>,
    config: &EngineConfig,
) -> Vec<SmurfingHit> {
    let window = Duration::hours(config.burst_window_hours);
    let mut hits = Vec::new();

    for account in graph.sorted_accounts() {
        if legit.contains(account) {
            continue;
        }

        let window_count = graph
            .stats(account)
            .map_or(0, |stats| max_count_in_window(&stats.timestamps, window));

        if let Some(senders) = graph.in_neighbors(account) {
            if senders.len() >= config.smurf_threshold {
                hits.push(SmurfingHit {
                    hub: account.to_string(),
                    role: FanRole::FanIn,
                    partners: senders.iter().cloned().collect(),
                    max_window_count: window_count,
                });
            }
        }

        if let Some(receivers) = graph.out_neighbors(account) {
            if receivers.len() >= config.smurf_threshold {
                hits.push(SmurfingHit {
                    hub: account.to_string(),
                    role: FanRole::FanOut,
                    partners: receivers.iter().cloned().collect(),
                    max_window_count: window_count,
                });
            }
        }
    }

    tracing::debug!(hubs = hits.len(), "smurfing analysis complete");
    hits
}
