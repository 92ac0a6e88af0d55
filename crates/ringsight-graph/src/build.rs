//! Graph construction.

use crate::types::{NodeStats, Transaction, TransferEdge};
use std::collections::{BTreeSet, HashMap};

/// Directed transaction multigraph with per-account statistics.
///
/// Partner sets are `BTreeSet` so neighbour iteration is ordered by account
/// id without re-sorting at every traversal; detectors rely on that order
/// for deterministic output.
#[derive(Debug, Clone, Default)]
pub struct TxGraph {
    /// Outgoing partner set per account.
    pub adj: HashMap<String, BTreeSet<String>>,
    /// Incoming partner set per account.
    pub rev: HashMap<String, BTreeSet<String>>,
    /// Outgoing transfers per account, ingest order.
    pub edges_by_source: HashMap<String, Vec<TransferEdge>>,
    /// Incoming transfers per account, ingest order.
    pub edges_by_target: HashMap<String, Vec<TransferEdge>>,
    /// Statistics per account.
    pub node_stats: HashMap<String, NodeStats>,
    /// Total transfer count.
    pub edge_count: usize,
}

impl TxGraph {
    /// Build the graph in one pass over the transaction sequence.
    ///
    /// Construction is total: every transaction reaching this point has
    /// already been validated by the ingest layer.
    #[must_use]
    pub fn build(transactions: &[Transaction]) -> Self {
        let mut graph = TxGraph::default();

        for tx in transactions {
            let (s, r) = (tx.sender_id.as_str(), tx.receiver_id.as_str());

            graph
                .adj
                .entry(s.to_string())
                .or_default()
                .insert(r.to_string());
            graph
                .rev
                .entry(r.to_string())
                .or_default()
                .insert(s.to_string());

            let sender = graph.node_stats.entry(s.to_string()).or_default();
            sender.tx_out += 1;
            sender.total_out += tx.amount;
            sender.timestamps.push(tx.timestamp);

            let receiver = graph.node_stats.entry(r.to_string()).or_default();
            receiver.tx_in += 1;
            receiver.total_in += tx.amount;
            receiver.timestamps.push(tx.timestamp);

            let edge = TransferEdge {
                source: s.to_string(),
                target: r.to_string(),
                amount: tx.amount,
                timestamp: tx.timestamp,
            };
            graph
                .edges_by_source
                .entry(s.to_string())
                .or_default()
                .push(edge.clone());
            graph
                .edges_by_target
                .entry(r.to_string())
                .or_default()
                .push(edge);
            graph.edge_count += 1;
        }

        for stats in graph.node_stats.values_mut() {
            stats.timestamps.sort_unstable();
        }

        graph
    }

    /// Account count.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_stats.len()
    }

    /// All account ids, ascending.
    #[must_use]
    pub fn sorted_accounts(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.node_stats.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Outgoing partner set of an account (empty set when unknown).
    #[must_use]
    pub fn out_neighbors(&self, account: &str) -> Option<&BTreeSet<String>> {
        self.adj.get(account)
    }

    /// Incoming partner set of an account.
    #[must_use]
    pub fn in_neighbors(&self, account: &str) -> Option<&BTreeSet<String>> {
        self.rev.get(account)
    }

    /// Statistics for an account.
    #[must_use]
    pub fn stats(&self, account: &str) -> Option<&NodeStats> {
        self.node_stats.get(account)
    }

    /// Check the structural invariants the rest of the pipeline relies on.
    ///
    /// Violations indicate a construction bug, not bad input.
    pub fn validate(&self) -> Result<(), String> {
        for (id, stats) in &self.node_stats {
            if stats.tx_in + stats.tx_out != stats.timestamps.len() as u64 {
                return Err(format!(
                    "account {id}: tx counts disagree with timestamp count"
                ));
            }

            let out_sum: f64 = self
                .edges_by_source
                .get(id)
                .map(|edges| edges.iter().map(|e| e.amount).sum())
                .unwrap_or(0.0);
            if (out_sum - stats.total_out).abs() > 1e-6 {
                return Err(format!("account {id}: total_out disagrees with edges"));
            }

            let in_sum: f64 = self
                .edges_by_target
                .get(id)
                .map(|edges| edges.iter().map(|e| e.amount).sum())
                .unwrap_or(0.0);
            if (in_sum - stats.total_in).abs() > 1e-6 {
                return Err(format!("account {id}: total_in disagrees with edges"));
            }

            if let Some(edges) = self.edges_by_source.get(id) {
                let partners: BTreeSet<&str> =
                    edges.iter().map(|e| e.target.as_str()).collect();
                let adj: BTreeSet<&str> = self
                    .adj
                    .get(id)
                    .map(|set| set.iter().map(String::as_str).collect())
                    .unwrap_or_default();
                if partners != adj {
                    return Err(format!(
                        "account {id}: adjacency disagrees with edge index"
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn create_transaction(id: u32, sender: &str, receiver: &str, amount: f64) -> Transaction {
        Transaction {
            transaction_id: format!("TX{id:04}"),
            sender_id: sender.to_string(),
            receiver_id: receiver.to_string(),
            amount,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
                + chrono::Duration::minutes(i64::from(id)),
        }
    }

    #[test]
    fn test_build_counts() {
        let txs = vec![
            create_transaction(1, "A", "B", 100.0),
            create_transaction(2, "A", "B", 50.0),
            create_transaction(3, "B", "C", 75.0),
        ];
        let graph = TxGraph::build(&txs);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count, 3);

        let a = graph.stats("A").unwrap();
        assert_eq!(a.tx_out, 2);
        assert_eq!(a.tx_in, 0);
        assert!((a.total_out - 150.0).abs() < f64::EPSILON);

        let b = graph.stats("B").unwrap();
        assert_eq!(b.tx_in, 2);
        assert_eq!(b.tx_out, 1);
        assert_eq!(b.tx_total(), 3);
    }

    #[test]
    fn test_parallel_edges_preserved() {
        let txs = vec![
            create_transaction(1, "A", "B", 100.0),
            create_transaction(2, "A", "B", 50.0),
        ];
        let graph = TxGraph::build(&txs);

        // One partner, two transfers
        assert_eq!(graph.out_neighbors("A").unwrap().len(), 1);
        assert_eq!(graph.edges_by_source["A"].len(), 2);
        // Ingest order preserved
        assert!((graph.edges_by_source["A"][0].amount - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sorted_accounts() {
        let txs = vec![
            create_transaction(1, "zeta", "alpha", 10.0),
            create_transaction(2, "mid", "zeta", 10.0),
        ];
        let graph = TxGraph::build(&txs);
        assert_eq!(graph.sorted_accounts(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_validate_passes() {
        let txs = vec![
            create_transaction(1, "A", "B", 100.0),
            create_transaction(2, "B", "C", 90.0),
            create_transaction(3, "C", "A", 80.0),
        ];
        let graph = TxGraph::build(&txs);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_empty_graph() {
        let graph = TxGraph::build(&[]);
        assert_eq!(graph.node_count(), 0);
        assert!(graph.validate().is_ok());
        assert!(graph.sorted_accounts().is_empty());
    }
}
