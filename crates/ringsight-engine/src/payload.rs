//! Rendering payload selection.
//!
//! The payload carries the full transaction network up to a node budget so
//! the front end can show fraud in context rather than just the fraud
//! subgraph. Suspicious accounts are always included; remaining budget is
//! filled with the busiest normal accounts.

use crate::report::{round2, GraphPayload, PayloadEdge, PayloadNode};
use ringsight_core::config::EngineConfig;
use ringsight_graph::TxGraph;
use std::collections::{HashMap, HashSet};

/// Select nodes and edges for downstream rendering.
#[must_use]
pub fn build_graph_payload(
    graph: &TxGraph,
    suspicious: &HashSet<String>,
    ring_membership: &HashMap<String, String>,
    config: &EngineConfig,
) -> GraphPayload {
    let all_accounts = graph.sorted_accounts();

    let display: HashSet<&str> = if all_accounts.len() <= config.max_graph_nodes {
        all_accounts.iter().copied().collect()
    } else {
        let mut normal: Vec<&str> = all_accounts
            .iter()
            .copied()
            .filter(|account| !suspicious.contains(*account))
            .collect();
        normal.sort_by(|a, b| {
            let degree_a = graph.stats(a).map_or(0, |s| s.tx_total());
            let degree_b = graph.stats(b).map_or(0, |s| s.tx_total());
            degree_b.cmp(&degree_a).then_with(|| a.cmp(b))
        });

        let slots = config.max_graph_nodes.saturating_sub(suspicious.len());
        suspicious
            .iter()
            .map(String::as_str)
            .chain(normal.into_iter().take(slots))
            .collect()
    };

    let mut display_sorted: Vec<&str> = display.iter().copied().collect();
    display_sorted.sort_unstable();

    let nodes: Vec<PayloadNode> = display_sorted
        .iter()
        .map(|id| {
            let stats = graph.stats(id).cloned().unwrap_or_default();
            PayloadNode {
                id: (*id).to_string(),
                tx_in: stats.tx_in,
                tx_out: stats.tx_out,
                tx_total: stats.tx_total(),
                total_in: round2(stats.total_in),
                total_out: round2(stats.total_out),
                suspicious: suspicious.contains(*id),
                ring_id: ring_membership.get(*id).cloned(),
            }
        })
        .collect();

    let mut seen_pairs: HashSet<(&str, &str)> = HashSet::new();
    let mut edges: Vec<PayloadEdge> = Vec::new();
    for account in &all_accounts {
        let Some(transfers) = graph.edges_by_source.get(*account) else {
            continue;
        };
        for edge in transfers {
            if !display.contains(edge.source.as_str()) || !display.contains(edge.target.as_str())
            {
                continue;
            }
            if seen_pairs.insert((edge.source.as_str(), edge.target.as_str())) {
                edges.push(PayloadEdge {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    amount: round2(edge.amount),
                });
            }
        }
    }

    GraphPayload { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ringsight_graph::Transaction;

    fn tx(id: u32, sender: &str, receiver: &str, amount: f64) -> Transaction {
        Transaction {
            transaction_id: format!("TX{id:04}"),
            sender_id: sender.to_string(),
            receiver_id: receiver.to_string(),
            amount,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
                + chrono::Duration::minutes(i64::from(id)),
        }
    }

    #[test]
    fn test_small_graph_fully_included() {
        let txs = vec![tx(1, "A", "B", 123.456), tx(2, "B", "C", 50.0)];
        let graph = TxGraph::build(&txs);
        let payload = build_graph_payload(
            &graph,
            &HashSet::new(),
            &HashMap::new(),
            &EngineConfig::default(),
        );

        assert_eq!(payload.nodes.len(), 3);
        assert_eq!(payload.edges.len(), 2);
        // Monetary fields rounded to cents
        let a = payload.nodes.iter().find(|n| n.id == "A").unwrap();
        assert!((a.total_out - 123.46).abs() < 1e-9);
    }

    #[test]
    fn test_budget_prefers_suspicious_then_degree() {
        // 5-node budget, 6 accounts: the quiet one drops out
        let mut txs = Vec::new();
        let mut id = 0;
        for i in 0..4 {
            txs.push(tx(id, "busy", &format!("peer{i}"), 10.0));
            id += 1;
        }
        txs.push(tx(id, "quiet", "peer0", 10.0));
        id += 1;
        txs.push(tx(id, "flagged", "peer1", 10.0));

        let graph = TxGraph::build(&txs);
        let suspicious = HashSet::from(["flagged".to_string()]);
        let config = EngineConfig {
            max_graph_nodes: 5,
            ..EngineConfig::default()
        };
        let payload = build_graph_payload(&graph, &suspicious, &HashMap::new(), &config);

        assert_eq!(payload.nodes.len(), 5);
        let ids: Vec<&str> = payload.nodes.iter().map(|n| n.id.as_str()).collect();
        assert!(ids.contains(&"flagged"));
        assert!(ids.contains(&"busy"));
        // Every emitted edge has both endpoints present
        let id_set: HashSet<&str> = ids.into_iter().collect();
        for edge in &payload.edges {
            assert!(id_set.contains(edge.source.as_str()));
            assert!(id_set.contains(edge.target.as_str()));
        }
    }

    #[test]
    fn test_parallel_edges_collapse() {
        let txs = vec![tx(1, "A", "B", 100.0), tx(2, "A", "B", 200.0)];
        let graph = TxGraph::build(&txs);
        let payload = build_graph_payload(
            &graph,
            &HashSet::new(),
            &HashMap::new(),
            &EngineConfig::default(),
        );

        assert_eq!(payload.edges.len(), 1);
        // First ingested transfer's amount is shown
        assert!((payload.edges[0].amount - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_ring_id_carried_on_nodes() {
        let txs = vec![tx(1, "A", "B", 100.0)];
        let graph = TxGraph::build(&txs);
        let membership = HashMap::from([("A".to_string(), "R001".to_string())]);
        let payload = build_graph_payload(
            &graph,
            &HashSet::from(["A".to_string()]),
            &membership,
            &EngineConfig::default(),
        );

        let a = payload.nodes.iter().find(|n| n.id == "A").unwrap();
        assert!(a.suspicious);
        assert_eq!(a.ring_id.as_deref(), Some("R001"));
        let b = payload.nodes.iter().find(|n| n.id == "B").unwrap();
        assert!(!b.suspicious);
        assert_eq!(b.ring_id, None);
    }
}
