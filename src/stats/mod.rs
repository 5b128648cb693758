//! Submission statistics.
//!
//! # Data Flow
//! ```text
//! POST /hash handler
//!     → measures its own elapsed time
//!     → aggregator.rs record_sample (count + elapsed, one lock)
//!
//! GET /stats
//!     → aggregator.rs snapshot (consistent pair)
//!     → serialized as {"total": N, "average": F}
//! ```
//!
//! # Design Decisions
//! - Count and elapsed total share one mutex so a snapshot is never torn
//! - Attempts without a secret are still counted

pub mod aggregator;

pub use aggregator::{StatsAggregator, StatsReport, StatsSnapshot};
