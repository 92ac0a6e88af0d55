//! Suspicion scoring with diminishing-returns accumulation.
//!
//! Every contribution `c` moves an account's score `s` by
//! `c * (1 - s / 120)`, clamped to `[0, 100]`. The 120 denominator is
//! load-bearing: a single strong signal (a length-3 cycle at base 85) still
//! reaches the high 80s, while stacked weak signals asymptote well below
//! the cap. Do not tune it without re-running the scenario suite.

use crate::report::PatternTag;
use std::collections::{BTreeSet, HashMap};

/// Score ceiling.
pub const SCORE_CAP: f64 = 100.0;
/// Diminishing-returns denominator.
pub const HEADROOM: f64 = 120.0;
/// Accounts below this accumulated score are not reported.
pub const REPORTING_FLOOR: f64 = 1.0;

/// Temporal bonus when all cycle transfers fall inside 72 hours.
pub const BURST_BONUS: f64 = 8.0;
/// Temporal bonus when they fall inside a week but not 72 hours.
pub const WEEK_BONUS: f64 = 4.0;
/// Bonus for monotone per-hop amount decay.
pub const DECAY_BONUS: f64 = 6.0;
/// Factor applied to the hub score for peripheral fan partners.
pub const PERIPHERAL_FACTOR: f64 = 0.3;
/// Minimum 24-hour window count that counts as high velocity.
pub const VELOCITY_MIN_COUNT: usize = 6;
/// Per-transaction weight of the velocity contribution.
pub const VELOCITY_WEIGHT: f64 = 1.5;

/// Base contribution for cycle membership by cycle length.
#[must_use]
pub fn cycle_base(len: usize) -> f64 {
    match len {
        3 => 85.0,
        4 => 80.0,
        5 => 75.0,
        _ => 70.0,
    }
}

/// Hub score for a fan with `partners` unique counterparties above the
/// `threshold` gate and `window_count` transfers in the densest 72-hour
/// window.
#[must_use]
pub fn smurf_hub_score(partners: usize, window_count: usize, threshold: usize) -> f64 {
    let over = partners.saturating_sub(threshold) as f64;
    (40.0 + over * 3.0 + window_count as f64 * 2.0).min(SCORE_CAP)
}

/// Per-member contribution for a shell chain with `interiors` low-activity
/// intermediaries spanning `chain_len` accounts.
#[must_use]
pub fn shell_member_contribution(interiors: usize, chain_len: usize) -> f64 {
    0.5 * (55.0 + 10.0 * interiors as f64 + 2.0 * chain_len as f64)
}

/// Mutable per-account scoring table. The consolidator is its only writer.
#[derive(Debug, Default)]
pub struct ScoreBoard {
    accounts: HashMap<String, AccountRecord>,
}

/// Accumulated state for one account.
#[derive(Debug, Default, Clone)]
pub struct AccountRecord {
    /// Current suspicion score.
    pub score: f64,
    /// Tags attached so far; a set, no duplicates.
    pub patterns: BTreeSet<PatternTag>,
}

impl ScoreBoard {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one contribution and attach its tag.
    pub fn apply(&mut self, account: &str, tag: PatternTag, contribution: f64) {
        let record = self.accounts.entry(account.to_string()).or_default();
        record.score =
            (record.score + contribution * (1.0 - record.score / HEADROOM)).clamp(0.0, SCORE_CAP);
        record.patterns.insert(tag);
    }

    /// Current score of an account (0 when never flagged).
    #[must_use]
    pub fn score_of(&self, account: &str) -> f64 {
        self.accounts.get(account).map_or(0.0, |r| r.score)
    }

    /// Accounts flagged so far, ascending by id.
    #[must_use]
    pub fn flagged_sorted(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.accounts.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// Consume the board.
    #[must_use]
    pub fn into_records(self) -> HashMap<String, AccountRecord> {
        self.accounts
    }
}
