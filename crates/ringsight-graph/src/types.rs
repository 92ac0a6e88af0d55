//! Transaction and account statistics types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A validated money transfer between two accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Upstream transaction identifier. Duplicates are tolerated and counted
    /// as separate transfers.
    pub transaction_id: String,
    /// Paying account.
    pub sender_id: String,
    /// Receiving account. Never equal to `sender_id`.
    pub receiver_id: String,
    /// Transfer amount, strictly positive.
    pub amount: f64,
    /// Transfer instant.
    pub timestamp: DateTime<Utc>,
}

/// One directed transfer as stored on the graph's edge indexes.
#[derive(Debug, Clone)]
pub struct TransferEdge {
    /// Paying account.
    pub source: String,
    /// Receiving account.
    pub target: String,
    /// Transfer amount.
    pub amount: f64,
    /// Transfer instant.
    pub timestamp: DateTime<Utc>,
}

/// Aggregate statistics for a single account.
#[derive(Debug, Clone, Default)]
pub struct NodeStats {
    /// Incoming transfer count.
    pub tx_in: u64,
    /// Outgoing transfer count.
    pub tx_out: u64,
    /// Sum of incoming amounts.
    pub total_in: f64,
    /// Sum of outgoing amounts.
    pub total_out: f64,
    /// Timestamps of every transfer touching the account, ascending.
    pub timestamps: Vec<DateTime<Utc>>,
}

impl NodeStats {
    /// Total transfer count touching the account.
    #[must_use]
    pub fn tx_total(&self) -> u64 {
        self.tx_in + self.tx_out
    }
}
