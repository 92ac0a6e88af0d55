//! Built-in synthetic sample dataset.
//!
//! Deterministically seeded traffic covering every pattern class the engine
//! detects, plus legitimate shapes that must stay unflagged and background
//! noise. Used by the demo endpoint and the benchmark suite.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ringsight_graph::Transaction;

/// Generate the sample batch.
#[must_use]
pub fn generate_sample() -> Vec<Transaction> {
    let mut batch = Batch::new(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap());

    // Cyclic routing: a 3-account loop with skim-per-hop decay, plus a
    // second loop sharing two of its members
    batch.add("cyc-alpha-1", "cyc-alpha-2", 5_000.0, 0.0);
    batch.add("cyc-alpha-2", "cyc-alpha-3", 4_800.0, 2.0);
    batch.add("cyc-alpha-3", "cyc-alpha-1", 4_600.0, 5.0);
    batch.add("cyc-alpha-1", "cyc-alpha-2", 3_200.0, 24.0);
    batch.add("cyc-alpha-2", "cyc-alpha-4", 3_000.0, 26.0);
    batch.add("cyc-alpha-4", "cyc-alpha-1", 2_900.0, 30.0);

    // A 4-account loop
    batch.add("cyc-beta-1", "cyc-beta-2", 8_000.0, 1.0);
    batch.add("cyc-beta-2", "cyc-beta-3", 7_800.0, 3.0);
    batch.add("cyc-beta-3", "cyc-beta-4", 7_500.0, 6.0);
    batch.add("cyc-beta-4", "cyc-beta-1", 7_200.0, 10.0);

    // Smurfing fan-in: 14 mules feed one aggregator inside a day
    for i in 1..=14 {
        batch.add(
            &format!("mule-{i:02}"),
            "aggregator-1",
            500.0 + f64::from(i) * 10.0,
            f64::from(i) * 0.5,
        );
    }
    batch.add("aggregator-1", "offramp-1", 3_000.0, 20.0);
    batch.add("aggregator-1", "offramp-2", 2_800.0, 21.0);

    // Smurfing fan-out: one hub disperses to 13 receivers
    batch.add("disperser-src", "disperser-hub", 15_000.0, 0.0);
    for i in 1..=13 {
        batch.add(
            "disperser-hub",
            &format!("payout-{i:02}"),
            900.0 + f64::from(i) * 5.0,
            f64::from(i) * 2.0,
        );
    }

    // Shell layering: three single-use intermediaries between endpoints
    batch.add("shell-src", "shell-mid-1", 12_000.0, 0.0);
    batch.add("shell-mid-1", "shell-mid-2", 11_800.0, 5.0);
    batch.add("shell-mid-2", "shell-mid-3", 11_600.0, 12.0);
    batch.add("shell-mid-3", "shell-dst", 11_400.0, 20.0);

    // Legitimate merchant: many customers in, almost nothing out
    for i in 1..=21 {
        batch.add(
            &format!("customer-{i:02}"),
            "merchant-1",
            50.0 + f64::from(i) * 5.0,
            f64::from(i),
        );
    }
    batch.add("merchant-1", "supplier-1", 900.0, 100.0);

    // Legitimate payroll: one funding transfer, many salary payments
    batch.add("employer-1", "payroll-1", 50_000.0, 70.0);
    let mut rng = StdRng::seed_from_u64(42);
    for i in 1..=22 {
        batch.add(
            "payroll-1",
            &format!("employee-{i:02}"),
            2_800.0 + f64::from(rng.gen_range(0..500)),
            72.0,
        );
    }

    // Background noise between ordinary retail accounts
    let retail: Vec<String> = (1..=15).map(|i| format!("retail-{i:02}")).collect();
    for i in 0..35 {
        let s = rng.gen_range(0..retail.len());
        let mut r = rng.gen_range(0..retail.len());
        while r == s {
            r = rng.gen_range(0..retail.len());
        }
        batch.add(
            &retail[s],
            &retail[r],
            f64::from(rng.gen_range(100..3_000)),
            f64::from(i) * 1.5,
        );
    }

    batch.transactions
}

struct Batch {
    base: DateTime<Utc>,
    next_id: u32,
    transactions: Vec<Transaction>,
}

impl Batch {
    fn new(base: DateTime<Utc>) -> Self {
        Self {
            base,
            next_id: 1,
            transactions: Vec::new(),
        }
    }

    fn add(&mut self, sender: &str, receiver: &str, amount: f64, hours: f64) {
        self.transactions.push(Transaction {
            transaction_id: format!("TX_{:05}", self.next_id),
            sender_id: sender.to_string(),
            receiver_id: receiver.to_string(),
            amount,
            timestamp: self.base + Duration::minutes((hours * 60.0) as i64),
        });
        self.next_id += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analyze;
    use ringsight_core::config::EngineConfig;

    #[test]
    fn test_sample_is_deterministic() {
        let a = generate_sample();
        let b = generate_sample();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.transaction_id, y.transaction_id);
            assert_eq!(x.sender_id, y.sender_id);
            assert_eq!(x.receiver_id, y.receiver_id);
            assert!((x.amount - y.amount).abs() < f64::EPSILON);
            assert_eq!(x.timestamp, y.timestamp);
        }
    }

    #[test]
    fn test_sample_covers_every_pattern() {
        let report = analyze(&generate_sample(), &EngineConfig::default()).unwrap();

        assert!(report.summary.cycles_found >= 2);
        assert!(report.summary.smurfing_hubs_found >= 2);
        assert!(report.summary.shell_chains_found >= 1);
        assert!(report.summary.fraud_rings_detected >= 4);

        // Legitimate shapes must stay clean
        for account in &report.suspicious_accounts {
            assert_ne!(account.account_id, "merchant-1");
            assert_ne!(account.account_id, "payroll-1");
        }
    }
}
