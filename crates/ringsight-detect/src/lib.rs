//! # Ringsight Detect
//!
//! The three pattern detectors and the structural false-positive filter:
//!
//! - `legitimacy` - classifies merchants and payroll shapes so ordinary
//!   commerce is never flagged
//! - `cycles` - bounded canonical DFS over simple directed cycles (3-5 hops)
//! - `smurfing` - fan-in/fan-out hub analysis with a temporal sliding window
//! - `shells` - budgeted BFS over chains of low-activity intermediaries
//!
//! Detectors are independent readers of the graph and never communicate;
//! cross-detector reconciliation happens in `ringsight-engine`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cycles;
pub mod legitimacy;
pub mod shells;
pub mod smurfing;
pub mod types;

pub use cycles::detect_cycles;
pub use legitimacy::legitimate_accounts;
pub use shells::detect_shells;
pub use smurfing::detect_smurfing;
pub use types::{CycleHit, FanRole, ShellHit, SmurfingHit};
