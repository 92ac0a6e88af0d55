//! Detector output types.

use chrono::{DateTime, Utc};

/// Fan direction of a smurfing hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanRole {
    /// Many unique senders funnel into the hub.
    FanIn,
    /// The hub disperses to many unique receivers.
    FanOut,
}

/// A simple directed cycle of 3-5 accounts.
///
/// `members` starts at the cycle's lexicographically smallest account (the
/// DFS anchor). Hop `i` is `members[i] -> members[(i + 1) % len]`. When a
/// hop has parallel transfers, `hop_timestamps` carries the earliest and
/// `hop_amounts` the largest, per the temporal/decay analysis contract.
#[derive(Debug, Clone)]
pub struct CycleHit {
    /// Cycle members in traversal order.
    pub members: Vec<String>,
    /// Largest transfer amount per hop.
    pub hop_amounts: Vec<f64>,
    /// Earliest transfer instant per hop.
    pub hop_timestamps: Vec<DateTime<Utc>>,
}

/// A fan-in or fan-out hub.
#[derive(Debug, Clone)]
pub struct SmurfingHit {
    /// The aggregating or dispersing account.
    pub hub: String,
    /// Direction of the fan.
    pub role: FanRole,
    /// Unique partners on the fan side, ascending.
    pub partners: Vec<String>,
    /// Largest transaction count in any 72-hour window on the fan side.
    pub max_window_count: usize,
}

/// A layered pass-through chain.
#[derive(Debug, Clone)]
pub struct ShellHit {
    /// Chain accounts in path order, no repeats.
    pub path: Vec<String>,
    /// How many interior accounts meet the low-activity shell predicate.
    pub shell_interiors: usize,
}
