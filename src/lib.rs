//! Password encoder service library.
//!
//! Accepts secrets over HTTP, stores their SHA-512 digests, and releases each
//! digest only after a fixed delay. Tracks submission statistics and supports
//! a drain-style shutdown triggered over HTTP or by OS signal.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod stats;
pub mod store;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::ShutdownCoordinator;
pub use stats::StatsAggregator;
pub use store::DigestStore;
