//! Report model: the structured output contract.

use serde::{Deserialize, Serialize};

/// Behavioural tag attached to a suspicious account.
///
/// Variants are declared in the alphabetical order of their wire names so a
/// `BTreeSet<PatternTag>` serialises as the contract's ordered tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PatternTag {
    /// Monotone per-hop amount decrease inside a cycle.
    #[serde(rename = "amount_decay")]
    AmountDecay,
    /// Member of a 3-account cycle.
    #[serde(rename = "cycle_length_3")]
    CycleLength3,
    /// Member of a 4-account cycle.
    #[serde(rename = "cycle_length_4")]
    CycleLength4,
    /// Member of a 5-account cycle.
    #[serde(rename = "cycle_length_5")]
    CycleLength5,
    /// Sends into a fan-in hub.
    #[serde(rename = "fan_in_contributor")]
    FanInContributor,
    /// Aggregates from many unique senders.
    #[serde(rename = "fan_in_hub")]
    FanInHub,
    /// Disperses to many unique receivers.
    #[serde(rename = "fan_out_hub")]
    FanOutHub,
    /// Receives from a fan-out hub.
    #[serde(rename = "fan_out_receiver")]
    FanOutReceiver,
    /// Many transactions inside a single day.
    #[serde(rename = "high_velocity")]
    HighVelocity,
    /// Member of a layered shell chain.
    #[serde(rename = "shell_chain_member")]
    ShellChainMember,
    /// All cycle transfers inside 72 hours.
    #[serde(rename = "temporal_burst_72h")]
    TemporalBurst72h,
    /// All cycle transfers inside one week.
    #[serde(rename = "temporal_burst_week")]
    TemporalBurstWeek,
}

/// Ring classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Cyclic fund routing.
    Cycle,
    /// Fan-in / fan-out structuring.
    Smurfing,
    /// Layered pass-through chain.
    ShellNetwork,
}

/// One consolidated fraud finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudRing {
    /// Dense identifier `R001`, `R002`, ... assigned after deduplication.
    pub ring_id: String,
    /// Ring classification.
    pub pattern_type: PatternType,
    /// Member accounts, non-empty, in detection order.
    pub member_accounts: Vec<String>,
    /// Maximum suspicion score among members at emission time.
    pub risk_score: f64,
}

/// One flagged account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspiciousAccount {
    /// Account identifier.
    pub account_id: String,
    /// Accumulated suspicion, rounded to an integer in `[0, 100]`.
    pub suspicion_score: u32,
    /// Ring of the account's highest-scoring membership, if any. Peripheral
    /// smurfing partners carry patterns but no ring.
    pub ring_id: Option<String>,
    /// Ordered set of behavioural tags.
    pub detected_patterns: Vec<PatternTag>,
}

/// Node emitted for downstream rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadNode {
    /// Account identifier.
    pub id: String,
    /// Incoming transfer count.
    pub tx_in: u64,
    /// Outgoing transfer count.
    pub tx_out: u64,
    /// Total transfer count.
    pub tx_total: u64,
    /// Sum of incoming amounts, 2 decimal places.
    pub total_in: f64,
    /// Sum of outgoing amounts, 2 decimal places.
    pub total_out: f64,
    /// Whether the account was flagged.
    pub suspicious: bool,
    /// Resolved ring membership, if any.
    pub ring_id: Option<String>,
}

/// Edge emitted for downstream rendering, one per (source, target) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadEdge {
    /// Paying account.
    pub source: String,
    /// Receiving account.
    pub target: String,
    /// Amount of the first ingested transfer on the pair, 2 decimal places.
    pub amount: f64,
}

/// Pruned graph payload for the force-directed rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphPayload {
    /// Selected nodes, budget-capped, suspicious members always included.
    pub nodes: Vec<PayloadNode>,
    /// Edges with both endpoints selected.
    pub edges: Vec<PayloadEdge>,
}

/// Run-level counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Accounts appearing in any transfer.
    pub total_accounts_analyzed: usize,
    /// Valid transactions analysed.
    pub total_transactions: usize,
    /// Accounts in `suspicious_accounts`.
    pub suspicious_accounts_flagged: usize,
    /// Rings surviving deduplication.
    pub fraud_rings_detected: usize,
    /// Distinct cycles accepted by the cycle detector.
    pub cycles_found: usize,
    /// Distinct accounts holding a fan hub role.
    pub smurfing_hubs_found: usize,
    /// Shell chains accepted by the chain detector.
    pub shell_chains_found: usize,
    /// Input rows rejected by the ingest layer.
    pub rows_rejected: usize,
    /// Wall-clock seconds spent in the pipeline.
    pub processing_time_seconds: f64,
}

/// The full analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Run-level counters.
    pub summary: Summary,
    /// Flagged accounts, descending score, ties by account id.
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    /// Rings ordered by ring id.
    pub fraud_rings: Vec<FraudRing>,
    /// Rendering payload.
    pub graph: GraphPayload,
}

/// Round to 2 decimal places for monetary and latency fields.
#[must_use]
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 1 decimal place for ring risk scores.
#[must_use]
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
