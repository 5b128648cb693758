//! Digest store subsystem.
//!
//! # Data Flow
//! ```text
//! POST /hash (secret, now)
//!     → digest.rs (SHA-512 → base64)
//!     → table.rs (append under write lock, id = len + 1)
//!     → id returned to caller
//!
//! GET /hash/{id} (id, now)
//!     → table.rs (read lock, bounds check)
//!     → visibility gate: now - requested_at >= delay
//!     → digest copy or "not yet"
//! ```
//!
//! # Design Decisions
//! - Records are append-only; ids are dense and never reused
//! - Hashing happens at submit time; the delay only gates retrieval
//! - Visibility is computed per query, never cached or timer-driven

pub mod digest;
pub mod table;

pub use digest::compute_digest;
pub use table::{DigestLookup, DigestRecord, DigestStore, DEFAULT_VISIBILITY_DELAY};
