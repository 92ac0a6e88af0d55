//! Shell network chain discovery.
//!
//! A shell is an account with at most 3 lifetime transactions: the classic
//! pass-through intermediary. Chains are enumerated breadth-first from every
//! non-legitimate account so that shorter, structurally stronger chains are
//! recorded first and cheapest. The whole search runs under a hard frontier
//! budget and a result cap, both of which terminate enumeration
//! deterministically with the chains accepted so far.

use crate::types::ShellHit;
use ringsight_core::config::EngineConfig;
use ringsight_graph::TxGraph;
use std::collections::{HashSet, VecDeque};

/// Enumerate layered pass-through chains.
///
/// A chain is accepted once it spans at least `shell_min_chain` accounts and
/// its interior contains at least `shell_min_interior` shell accounts.
/// Paths never repeat an account, so cycles are rejected structurally.
#[must_use]
pub fn detect_shells(
    graph: &TxGraph,
    legit: &HashSet<String>,
    config: &EngineConfig,
) -> Vec<ShellHit> {
    let mut shells: Vec<ShellHit> = Vec::new();
    let mut steps = 0usize;

    for start in graph.sorted_accounts() {
        if steps >= config.shell_step_budget || shells.len() >= config.shell_max_results {
            break;
        }
        if legit.contains(start) {
            continue;
        }

        let mut queue: VecDeque<Vec<String>> = VecDeque::from([vec![start.to_string()]]);
        let mut enqueued: HashSet<String> = HashSet::from([start.to_string()]);

        while !queue.is_empty() {
            if steps >= config.shell_step_budget || shells.len() >= config.shell_max_results
            {
                break;
            }
            let path = queue.pop_front().expect("queue is non-empty");
            steps += 1;

            if path.len() > config.shell_max_chain {
                continue;
            }

            let current = path.last().expect("paths are never empty");
            let Some(neighbors) = graph.out_neighbors(current) else {
                continue;
            };
            for next in neighbors {
                if enqueued.contains(next) {
                    continue;
                }

                let mut new_path = path.clone();
                new_path.push(next.clone());

                let interior = &new_path[1..new_path.len() - 1];
                let shell_interiors = interior
                    .iter()
                    .filter(|account| {
                        graph
                            .stats(account)
                            .map_or(false, |s| s.tx_total() <= config.shell_max_tx)
                    })
                    .count();

                if new_path.len() >= config.shell_min_chain
                    && shell_interiors >= config.shell_min_interior
                {
                    shells.push(ShellHit {
                        path: new_path.clone(),
                        shell_interiors,
                    });
                }

                enqueued.insert(next.clone());
                queue.push_back(new_path);
            }
        }
    }

    shells.truncate(config.shell_max_results);
    tracing::debug!(
        chains = shells.len(),
        steps,
        "shell chain enumeration complete"
    );
    shells
}
