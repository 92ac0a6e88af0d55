//! Pipeline entry point.
//!
//! Strictly sequential: build the graph, classify legitimate accounts, run
//! the three detectors, consolidate, select the payload. Detectors never
//! communicate; the consolidator is the only stage with cross-detector
//! state. One invocation is a pure function of its input modulo the
//! measured processing time.

use crate::consolidate::consolidate;
use crate::payload::build_graph_payload;
use crate::report::{round2, Report, Summary};
use ringsight_core::config::EngineConfig;
use ringsight_core::error::{EngineError, Result};
use ringsight_detect::{detect_cycles, detect_shells, detect_smurfing, legitimate_accounts};
use ringsight_graph::{Transaction, TxGraph};
use std::collections::HashSet;
use std::time::Instant;

/// Run the full detection pipeline over a validated transaction batch.
///
/// # Errors
///
/// Returns [`EngineError::PipelineAborted`] if the constructed graph
/// violates its structural invariants. Detector budgets exhausting are not
/// errors; an empty input yields an empty report.
pub fn analyze(transactions: &[Transaction], config: &EngineConfig) -> Result<Report> {
    let started = Instant::now();

    if transactions.len() > config.soft_transaction_bound {
        tracing::warn!(
            transactions = transactions.len(),
            bound = config.soft_transaction_bound,
            "input exceeds the soft transaction bound"
        );
    }

    let graph = TxGraph::build(transactions);
    graph.validate().map_err(EngineError::aborted)?;

    let legit = legitimate_accounts(&graph, config);
    let cycles = detect_cycles(&graph, &legit, config);
    let smurfs = detect_smurfing(&graph, &legit, config);
    let shells = detect_shells(&graph, &legit, config);

    let smurfing_hubs_found = smurfs
        .iter()
        .map(|hit| hit.hub.as_str())
        .collect::<HashSet<_>>()
        .len();
    let cycles_found = cycles.len();
    let shell_chains_found = shells.len();

    let consolidation = consolidate(&graph, &cycles, &smurfs, &shells, &legit, config);

    let suspicious_set: HashSet<String> = consolidation
        .suspicious
        .iter()
        .map(|account| account.account_id.clone())
        .collect();
    let graph_payload =
        build_graph_payload(&graph, &suspicious_set, &consolidation.ring_membership, config);

    let summary = Summary {
        total_accounts_analyzed: graph.node_count(),
        total_transactions: transactions.len(),
        suspicious_accounts_flagged: consolidation.suspicious.len(),
        fraud_rings_detected: consolidation.rings.len(),
        cycles_found,
        smurfing_hubs_found,
        shell_chains_found,
        rows_rejected: 0,
        processing_time_seconds: round2(started.elapsed().as_secs_f64()),
    };

    tracing::info!(
        accounts = summary.total_accounts_analyzed,
        rings = summary.fraud_rings_detected,
        suspicious = summary.suspicious_accounts_flagged,
        "analysis complete"
    );

    Ok(Report {
        summary,
        suspicious_accounts: consolidation.suspicious,
        fraud_rings: consolidation.rings,
        graph: graph_payload,
    })
}
