//! # Ringsight Graph
//!
//! Directed transaction multigraph and per-account statistics.
//!
//! The graph is built in a single pass over the validated transaction
//! sequence and is immutable afterwards. Parallel edges are preserved: a
//! sender may pay the same receiver many times, and the per-source edge
//! lists keep ingest order, which is the authoritative order for downstream
//! temporal analysis.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod build;
pub mod types;
pub mod window;

pub use build::TxGraph;
pub use types::{NodeStats, Transaction, TransferEdge};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::build::TxGraph;
    pub use crate::types::{NodeStats, Transaction, TransferEdge};
    pub use crate::window::max_count_in_window;
}
