//! # Ringsight Engine
//!
//! The consolidation half of the pipeline: merges detector hits into fraud
//! rings, computes calibrated suspicion scores with diminishing-returns
//! accumulation, selects the rendering payload and assembles the report.
//!
//! The entry point is [`pipeline::analyze`]: a pure function from a
//! validated transaction batch to a [`report::Report`], deterministic for
//! identical input modulo the measured processing time.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod consolidate;
pub mod payload;
pub mod pipeline;
pub mod report;
pub mod sample;
pub mod score;

pub use pipeline::analyze;
pub use report::Report;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::pipeline::analyze;
    pub use crate::report::{
        FraudRing, GraphPayload, PatternTag, PatternType, Report, Summary, SuspiciousAccount,
    };
    pub use crate::sample::generate_sample;
}
