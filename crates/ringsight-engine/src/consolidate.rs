//! Ring consolidation.
//!
//! The only stage with global state across detectors: it owns ring identity
//! and score emission. Contributions are applied in a fixed order (cycles,
//! then fan/velocity, then shells, then peripheral partners) so identical
//! input always yields identical scores.

use crate::report::{round1, FraudRing, PatternTag, PatternType, SuspiciousAccount};
use crate::score::{
    cycle_base, shell_member_contribution, smurf_hub_score, ScoreBoard, BURST_BONUS,
    DECAY_BONUS, PERIPHERAL_FACTOR, REPORTING_FLOOR, VELOCITY_MIN_COUNT, VELOCITY_WEIGHT,
    WEEK_BONUS,
};
use chrono::Duration;
use ringsight_core::config::EngineConfig;
use ringsight_detect::{CycleHit, FanRole, ShellHit, SmurfingHit};
use ringsight_graph::{window::max_count_in_window, TxGraph};
use std::collections::{HashMap, HashSet};

/// Overlap above which two same-pattern rings are considered duplicates.
const DEDUP_OVERLAP: f64 = 0.85;

/// Consolidated findings: rings, flagged accounts and the account-to-ring
/// resolution used by the payload builder.
#[derive(Debug)]
pub struct Consolidation {
    /// Surviving rings, ordered by ring id.
    pub rings: Vec<FraudRing>,
    /// Flagged accounts, descending score.
    pub suspicious: Vec<SuspiciousAccount>,
    /// Account to ring id of its highest-scoring membership.
    pub ring_membership: HashMap<String, String>,
}

/// A ring candidate before deduplication.
struct Candidate {
    pattern: PatternType,
    members: Vec<String>,
    member_set: HashSet<String>,
    seq: usize,
    risk: f64,
}

/// Merge detector hits into rings and compute account scores.
#[must_use]
pub fn consolidate(
    graph: &TxGraph,
    cycles: &[CycleHit],
    smurfs: &[SmurfingHit],
    shells: &[ShellHit],
    legit: &HashSet<String>,
    config: &EngineConfig,
) -> Consolidation {
    let mut board = ScoreBoard::new();
    let mut candidates: Vec<Candidate> = Vec::new();

    apply_cycle_contributions(cycles, config, &mut board, &mut candidates);
    apply_fan_contributions(smurfs, config, &mut board, &mut candidates);
    apply_velocity_contributions(graph, config, &mut board);
    apply_shell_contributions(shells, legit, &mut board, &mut candidates);
    apply_peripheral_contributions(smurfs, legit, config, &mut board);

    // Ring risk is the maximum member suspicion at emission time.
    for candidate in &mut candidates {
        candidate.risk = candidate
            .members
            .iter()
            .map(|m| board.score_of(m))
            .fold(0.0, f64::max);
    }

    let survivors = deduplicate(candidates);
    let rings = number_rings(survivors);

    let mut ring_membership: HashMap<String, String> = HashMap::new();
    for ring in &rings {
        for member in &ring.member_accounts {
            ring_membership
                .entry(member.clone())
                .or_insert_with(|| ring.ring_id.clone());
        }
    }

    let suspicious = emit_suspicious(board, &ring_membership);

    tracing::info!(
        rings = rings.len(),
        suspicious = suspicious.len(),
        "consolidation complete"
    );

    Consolidation {
        rings,
        suspicious,
        ring_membership,
    }
}

fn apply_cycle_contributions(
    cycles: &[CycleHit],
    config: &EngineConfig,
    board: &mut ScoreBoard,
    candidates: &mut Vec<Candidate>,
) {
    let burst_window = Duration::hours(config.burst_window_hours);
    let week_window = Duration::hours(config.week_window_hours);

    for hit in cycles {
        let len = hit.members.len();
        let tag = match len {
            3 => PatternTag::CycleLength3,
            4 => PatternTag::CycleLength4,
            _ => PatternTag::CycleLength5,
        };

        let burst = cycle_burst(hit, burst_window, week_window);
        let decay = has_amount_decay(&hit.hop_amounts);

        for member in &hit.members {
            board.apply(member, tag, cycle_base(len));
            if let Some((bonus, burst_tag)) = burst {
                board.apply(member, burst_tag, bonus);
            }
            if decay {
                board.apply(member, PatternTag::AmountDecay, DECAY_BONUS);
            }
        }

        push_candidate(candidates, PatternType::Cycle, hit.members.clone());
    }
}

/// Temporal bonus for a cycle: all hop transfers inside 72 hours earns the
/// burst bonus; inside a week (but not 72 hours) the smaller one.
fn cycle_burst(
    hit: &CycleHit,
    burst_window: Duration,
    week_window: Duration,
) -> Option<(f64, PatternTag)> {
    let earliest = hit.hop_timestamps.iter().min()?;
    let latest = hit.hop_timestamps.iter().max()?;
    let span = *latest - *earliest;

    if span <= burst_window {
        Some((BURST_BONUS, PatternTag::TemporalBurst72h))
    } else if span <= week_window {
        Some((WEEK_BONUS, PatternTag::TemporalBurstWeek))
    } else {
        None
    }
}

/// True when every successive hop-amount ratio sits in the skim band.
fn has_amount_decay(hop_amounts: &[f64]) -> bool {
    if hop_amounts.len() < 3 {
        return false;
    }
    hop_amounts.windows(2).all(|pair| {
        if pair[0] <= 0.0 {
            return false;
        }
        let ratio = pair[1] / pair[0];
        (0.65..=0.98).contains(&ratio)
    })
}

fn apply_fan_contributions(
    smurfs: &[SmurfingHit],
    config: &EngineConfig,
    board: &mut ScoreBoard,
    candidates: &mut Vec<Candidate>,
) {
    for hit in smurfs {
        let hub_score =
            smurf_hub_score(hit.partners.len(), hit.max_window_count, config.smurf_threshold);
        let tag = match hit.role {
            FanRole::FanIn => PatternTag::FanInHub,
            FanRole::FanOut => PatternTag::FanOutHub,
        };
        board.apply(&hit.hub, tag, hub_score);
        push_candidate(candidates, PatternType::Smurfing, vec![hit.hub.clone()]);
    }
}

/// Velocity bonus for accounts already flagged by the cycle or fan stages.
fn apply_velocity_contributions(graph: &TxGraph, config: &EngineConfig, board: &mut ScoreBoard) {
    let window = Duration::hours(config.velocity_window_hours);

    for account in board.flagged_sorted() {
        let Some(stats) = graph.stats(&account) else {
            continue;
        };
        let count = max_count_in_window(&stats.timestamps, window);
        if count >= VELOCITY_MIN_COUNT {
            board.apply(&account, PatternTag::HighVelocity, count as f64 * VELOCITY_WEIGHT);
        }
    }
}

fn apply_shell_contributions(
    shells: &[ShellHit],
    legit: &HashSet<String>,
    board: &mut ScoreBoard,
    candidates: &mut Vec<Candidate>,
) {
    for hit in shells {
        let members: Vec<String> = hit
            .path
            .iter()
            .filter(|account| !legit.contains(*account))
            .cloned()
            .collect();
        if members.len() < 2 {
            continue;
        }

        let contribution = shell_member_contribution(hit.shell_interiors, hit.path.len());
        for member in &members {
            board.apply(member, PatternTag::ShellChainMember, contribution);
        }

        push_candidate(candidates, PatternType::ShellNetwork, members);
    }
}

/// Peripheral fan partners: flagged with a fraction of the hub score but
/// never assigned to a ring. They may be innocent customers.
fn apply_peripheral_contributions(
    smurfs: &[SmurfingHit],
    legit: &HashSet<String>,
    config: &EngineConfig,
    board: &mut ScoreBoard,
) {
    for hit in smurfs {
        let hub_score =
            smurf_hub_score(hit.partners.len(), hit.max_window_count, config.smurf_threshold);
        let tag = match hit.role {
            FanRole::FanIn => PatternTag::FanInContributor,
            FanRole::FanOut => PatternTag::FanOutReceiver,
        };
        for partner in &hit.partners {
            if legit.contains(partner) {
                continue;
            }
            board.apply(partner, tag, hub_score * PERIPHERAL_FACTOR);
        }
    }
}

fn push_candidate(candidates: &mut Vec<Candidate>, pattern: PatternType, members: Vec<String>) {
    let member_set: HashSet<String> = members.iter().cloned().collect();
    let seq = candidates.len();
    candidates.push(Candidate {
        pattern,
        members,
        member_set,
        seq,
        risk: 0.0,
    });
}

/// Drop same-pattern rings whose member overlap exceeds the threshold,
/// keeping the better ring of each conflicting pair. "Better" is higher
/// risk, then larger membership, then earlier construction.
fn deduplicate(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.risk
            .total_cmp(&a.risk)
            .then(b.members.len().cmp(&a.members.len()))
            .then(a.seq.cmp(&b.seq))
    });

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        let duplicate = kept.iter().any(|existing| {
            existing.pattern == candidate.pattern
                && member_overlap(&existing.member_set, &candidate.member_set) > DEDUP_OVERLAP
        });
        if !duplicate {
            kept.push(candidate);
        }
    }
    kept
}

fn member_overlap(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    intersection as f64 / a.len().min(b.len()).max(1) as f64
}

/// Sort survivors by descending risk (ties by smallest member, then
/// construction order) and assign dense identifiers.
fn number_rings(mut survivors: Vec<Candidate>) -> Vec<FraudRing> {
    survivors.sort_by(|a, b| {
        b.risk
            .total_cmp(&a.risk)
            .then_with(|| a.members.iter().min().cmp(&b.members.iter().min()))
            .then(a.seq.cmp(&b.seq))
    });

    survivors
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| FraudRing {
            ring_id: format!("R{:03}", index + 1),
            pattern_type: candidate.pattern,
            member_accounts: candidate.members,
            risk_score: round1(candidate.risk),
        })
        .collect()
}

fn emit_suspicious(
    board: ScoreBoard,
    ring_membership: &HashMap<String, String>,
) -> Vec<SuspiciousAccount> {
    let mut suspicious: Vec<SuspiciousAccount> = board
        .into_records()
        .into_iter()
        .filter(|(_, record)| record.score >= REPORTING_FLOOR)
        .map(|(account_id, record)| SuspiciousAccount {
            ring_id: ring_membership.get(&account_id).cloned(),
            suspicion_score: record.score.round() as u32,
            detected_patterns: record.patterns.into_iter().collect(),
            account_id,
        })
        .collect();

    suspicious.sort_by(|a, b| {
        b.suspicion_score
            .cmp(&a.suspicion_score)
            .then_with(|| a.account_id.cmp(&b.account_id))
    });
    suspicious
}
