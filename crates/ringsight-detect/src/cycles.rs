//! Bounded canonical cycle enumeration.
//!
//! Simple directed cycles of 3-5 accounts are enumerated by a DFS anchored
//! at each account in ascending id order. Two rules keep the search canonical
//! and bounded:
//!
//! 1. A neighbour is traversed only if it sorts after the anchor, so every
//!    cycle is discovered exactly once, from its smallest member.
//! 2. The path is pruned past 5 accounts, and the whole run stops after the
//!    configured cap of accepted cycles.
//!
//! Legitimate accounts are excluded both as anchors and as interior nodes.

use crate::types::CycleHit;
use chrono::{DateTime, Utc};
use ringsight_core::config::EngineConfig;
use ringsight_graph::TxGraph;
use std::collections::{BTreeSet, HashSet};

/// Enumerate simple directed cycles of configured length.
///
/// Never fails; an empty result is valid. Cycles are deduplicated by member
/// set as they are accepted (the first discovery wins), so the cap counts
/// distinct cycles.
#[must_use]
pub fn detect_cycles(
    graph: &TxGraph,
    legit: &HashSet<String>,
    config: &EngineConfig,
) -> Vec<CycleHit> {
    let mut search = CycleSearch {
        graph,
        legit,
        config,
        cycles: Vec::new(),
        seen_member_sets: HashSet::new(),
    };

    for anchor in graph.sorted_accounts() {
        if search.at_capacity() {
            break;
        }
        if legit.contains(anchor) {
            continue;
        }
        let mut path = vec![anchor.to_string()];
        let mut on_path: HashSet<&str> = HashSet::from([anchor]);
        search.dfs(anchor, anchor, &mut path, &mut on_path);
    }

    tracing::debug!(
        cycles = search.cycles.len(),
        capped = search.at_capacity(),
        "cycle enumeration complete"
    );

    search
        .cycles
        .into_iter()
        .map(|members| build_hit(graph, members))
        .collect()
}

struct CycleSearch<'a> {
    graph: &'a TxGraph,
    legit: &'a HashSet<String>,
    config: &'a EngineConfig,
    cycles: Vec<Vec<String>>,
    seen_member_sets: HashSet<BTreeSet<String>>,
}

impl<'a> CycleSearch<'a> {
    fn at_capacity(&self) -> bool {
        self.cycles.len() >= self.config.cycle_max_results
    }

    fn dfs(
        &mut self,
        anchor: &'a str,
        current: &'a str,
        path: &mut Vec<String>,
        on_path: &mut HashSet<&'a str>,
    ) {
        if self.at_capacity() || path.len() > self.config.cycle_max_len {
            return;
        }

        let graph = self.graph;
        let Some(neighbors) = graph.out_neighbors(current) else {
            return;
        };
        for neighbor in neighbors {
            if self.at_capacity() {
                return;
            }
            let neighbor = neighbor.as_str();

            if neighbor == anchor && path.len() >= self.config.cycle_min_len {
                let member_set: BTreeSet<String> = path.iter().cloned().collect();
                if self.seen_member_sets.insert(member_set) {
                    self.cycles.push(path.clone());
                }
                continue;
            }

            if neighbor > anchor
                && !on_path.contains(neighbor)
                && !self.legit.contains(neighbor)
            {
                path.push(neighbor.to_string());
                on_path.insert(neighbor);
                self.dfs(anchor, neighbor, path, on_path);
                path.pop();
                on_path.remove(neighbor);
            }
        }
    }
}

/// Resolve per-hop transfer evidence for a discovered cycle.
fn build_hit(graph: &TxGraph, members: Vec<String>) -> CycleHit {
    let n = members.len();
    let mut hop_amounts = Vec::with_capacity(n);
    let mut hop_timestamps = Vec::with_capacity(n);

    for i in 0..n {
        let (source, target) = (&members[i], &members[(i + 1) % n]);
        let (earliest, largest) = hop_evidence(graph, source, target);
        hop_timestamps.push(earliest);
        hop_amounts.push(largest);
    }

    CycleHit {
        members,
        hop_amounts,
        hop_timestamps,
    }
}

/// Earliest timestamp and largest amount among the parallel transfers on a
/// hop. The DFS only follows existing edges, so the hop always has at least
/// one transfer.
fn hop_evidence(graph: &TxGraph, source: &str, target: &str) -> (DateTime<Utc>, f64) {
    let mut earliest: Option<DateTime<Utc>> = None;
    let mut largest = 0.0_f64;

    if let Some(edges) = graph.edges_by_source.get(source) {
        for edge in edges.iter().filter(|e| e.target == target) {
            largest = largest.max(edge.amount);
            earliest = Some(match earliest {
                Some(ts) if ts <= edge.timestamp => ts,
                _ => edge.timestamp,
            });
        }
    }

    (earliest.unwrap_or_default(), largest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ringsight_graph::Transaction;

    fn tx(id: u32, sender: &str, receiver: &str, amount: f64, hour: i64) -> Transaction {
        Transaction {
            transaction_id: format!("TX{id:04}"),
            sender_id: sender.to_string(),
            receiver_id: receiver.to_string(),
            amount,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
                + chrono::Duration::hours(hour),
        }
    }

    fn no_legit() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn test_triangle_found_once() {
        let txs = vec![
            tx(1, "A", "B", 1000.0, 0),
            tx(2, "B", "C", 950.0, 1),
            tx(3, "C", "A", 910.0, 2),
        ];
        let graph = TxGraph::build(&txs);
        let hits = detect_cycles(&graph, &no_legit(), &EngineConfig::default());

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].members, vec!["A", "B", "C"]);
        // Anchored at the smallest member
        assert_eq!(hits[0].members[0], "A");
    }

    #[test]
    fn test_two_cycle_not_reported() {
        let txs = vec![tx(1, "A", "B", 100.0, 0), tx(2, "B", "A", 100.0, 1)];
        let graph = TxGraph::build(&txs);
        let hits = detect_cycles(&graph, &no_legit(), &EngineConfig::default());
        assert!(hits.is_empty());
    }

    #[test]
    fn test_six_cycle_pruned() {
        let txs = vec![
            tx(1, "A", "B", 100.0, 0),
            tx(2, "B", "C", 100.0, 1),
            tx(3, "C", "D", 100.0, 2),
            tx(4, "D", "E", 100.0, 3),
            tx(5, "E", "F", 100.0, 4),
            tx(6, "F", "A", 100.0, 5),
        ];
        let graph = TxGraph::build(&txs);
        let hits = detect_cycles(&graph, &no_legit(), &EngineConfig::default());
        assert!(hits.is_empty());
    }

    #[test]
    fn test_parallel_edge_evidence() {
        let txs = vec![
            // Two parallel transfers on the A->B hop: evidence must pick the
            // earliest instant and the largest amount independently.
            tx(1, "A", "B", 400.0, 0),
            tx(2, "A", "B", 900.0, 5),
            tx(3, "B", "C", 300.0, 1),
            tx(4, "C", "A", 250.0, 2),
        ];
        let graph = TxGraph::build(&txs);
        let hits = detect_cycles(&graph, &no_legit(), &EngineConfig::default());

        assert_eq!(hits.len(), 1);
        let hit = &hits[0];
        assert!((hit.hop_amounts[0] - 900.0).abs() < f64::EPSILON);
        assert_eq!(
            hit.hop_timestamps[0],
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_legitimate_interior_excluded() {
        let txs = vec![
            tx(1, "A", "B", 100.0, 0),
            tx(2, "B", "C", 100.0, 1),
            tx(3, "C", "A", 100.0, 2),
        ];
        let graph = TxGraph::build(&txs);
        let legit: HashSet<String> = HashSet::from(["B".to_string()]);
        let hits = detect_cycles(&graph, &legit, &EngineConfig::default());
        assert!(hits.is_empty());
    }

    #[test]
    fn test_cap_respected() {
        // One anchor, 30 x 30 triangles through it: well past the cap
        let mut txs = Vec::new();
        let mut id = 0;
        for b in 0..30 {
            txs.push(tx(id, "a00", &format!("b{b:02}"), 100.0, 0));
            id += 1;
        }
        for b in 0..30 {
            for c in 0..30 {
                txs.push(tx(id, &format!("b{b:02}"), &format!("c{c:02}"), 100.0, 1));
                id += 1;
            }
        }
        for c in 0..30 {
            txs.push(tx(id, &format!("c{c:02}"), "a00", 100.0, 2));
            id += 1;
        }

        let graph = TxGraph::build(&txs);
        let config = EngineConfig::default();
        let hits = detect_cycles(&graph, &no_legit(), &config);
        assert_eq!(hits.len(), config.cycle_max_results);
    }

    #[test]
    fn test_member_set_dedup() {
        // A->B->C->A and A->C->B->A share a member set; only one survives
        let txs = vec![
            tx(1, "A", "B", 100.0, 0),
            tx(2, "B", "C", 100.0, 1),
            tx(3, "C", "A", 100.0, 2),
            tx(4, "A", "C", 100.0, 3),
            tx(5, "C", "B", 100.0, 4),
            tx(6, "B", "A", 100.0, 5),
        ];
        let graph = TxGraph::build(&txs);
        let hits = detect_cycles(&graph, &no_legit(), &EngineConfig::default());
        assert_eq!(hits.len(), 1);
    }
}
