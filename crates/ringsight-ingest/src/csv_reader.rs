//! CSV reading and row validation.

use crate::timestamp::parse_timestamp;
use ringsight_core::error::{EngineError, Result};
use ringsight_graph::Transaction;
use std::collections::HashMap;

/// Columns every upload must carry.
const REQUIRED_COLUMNS: &[&str] = &[
    "transaction_id",
    "sender_id",
    "receiver_id",
    "amount",
    "timestamp",
];

/// Per-class counters for skipped rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectionCounts {
    /// Empty or absent required field.
    pub missing_field: usize,
    /// Non-numeric, non-positive or non-finite amount.
    pub bad_amount: usize,
    /// Sender equals receiver.
    pub self_transfer: usize,
    /// Timestamp failed every parse attempt.
    pub bad_timestamp: usize,
}

impl RejectionCounts {
    /// Total rejected rows.
    #[must_use]
    pub fn total(&self) -> usize {
        self.missing_field + self.bad_amount + self.self_transfer + self.bad_timestamp
    }
}

/// Outcome of reading one upload.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Rows that passed validation, ingest order.
    pub transactions: Vec<Transaction>,
    /// Data rows seen, valid or not.
    pub total_rows: usize,
    /// Skipped-row diagnostics.
    pub rejected: RejectionCounts,
}

/// Read and validate a CSV upload.
///
/// Headers are trimmed and lowercased before matching. The file is decoded
/// as UTF-8 with a Latin-1 fallback, matching what spreadsheet exports
/// actually produce.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] when a required column is missing
/// or the file has no header row.
pub fn read_transactions(bytes: &[u8]) -> Result<IngestReport> {
    let text = decode(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| EngineError::invalid_input(format!("could not parse CSV header: {e}")))?;

    let mut columns: HashMap<String, usize> = HashMap::new();
    for (index, name) in headers.iter().enumerate() {
        columns.insert(name.trim().to_lowercase(), index);
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !columns.contains_key(*c))
        .collect();
    if !missing.is_empty() {
        return Err(EngineError::invalid_input(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    }

    let idx = |name: &str| columns[name];
    let (id_col, sender_col, receiver_col, amount_col, ts_col) = (
        idx("transaction_id"),
        idx("sender_id"),
        idx("receiver_id"),
        idx("amount"),
        idx("timestamp"),
    );

    let mut transactions = Vec::new();
    let mut rejected = RejectionCounts::default();
    let mut total_rows = 0usize;

    for record in reader.records() {
        let Ok(record) = record else {
            total_rows += 1;
            rejected.missing_field += 1;
            continue;
        };
        total_rows += 1;

        let field = |col: usize| record.get(col).unwrap_or("").trim();

        let transaction_id = field(id_col);
        let sender_id = field(sender_col);
        let receiver_id = field(receiver_col);
        if transaction_id.is_empty() || sender_id.is_empty() || receiver_id.is_empty() {
            rejected.missing_field += 1;
            continue;
        }

        if sender_id == receiver_id {
            rejected.self_transfer += 1;
            continue;
        }

        let amount = match field(amount_col).parse::<f64>() {
            Ok(value) if value > 0.0 && value.is_finite() => value,
            _ => {
                rejected.bad_amount += 1;
                continue;
            }
        };

        let Some(timestamp) = parse_timestamp(field(ts_col)) else {
            rejected.bad_timestamp += 1;
            continue;
        };

        transactions.push(Transaction {
            transaction_id: transaction_id.to_string(),
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            amount,
            timestamp,
        });
    }

    if rejected.total() > 0 {
        tracing::debug!(
            rejected = rejected.total(),
            accepted = transactions.len(),
            "rows skipped during ingest"
        );
    }

    Ok(IngestReport {
        transactions,
        total_rows,
        rejected,
    })
}

/// UTF-8 with Latin-1 fallback.
fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
