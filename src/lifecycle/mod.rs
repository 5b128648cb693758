//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Init logging/metrics → Bind listener
//!     Bind failure → fail_initialization → Stopped (no drain)
//!     run(): bind → serve → await_shutdown → bounded drain
//!
//! Shutdown (shutdown.rs):
//!     Running → ShutdownRequested → Draining → Stopped
//!
//! Triggers:
//!     signals.rs: SIGTERM/SIGINT → request_shutdown
//!     GET /shutdown → request_shutdown
//! ```
//!
//! # Design Decisions
//! - First trigger wins; later triggers are no-ops
//! - Ordered shutdown: stop accept, drain, close
//! - Shutdown has timeout: forced exit after deadline

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{ShutdownCause, ShutdownCoordinator, ShutdownPhase};
