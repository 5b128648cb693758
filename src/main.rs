//! Password encoder service.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │               PASSWORD ENCODER                │
//!                         │                                               │
//!   POST /hash ───────────┼─▶ handlers ──▶ DigestStore (append, hash)     │
//!                         │      │                                        │
//!                         │      └───────▶ StatsAggregator (count, time)  │
//!                         │                                               │
//!   GET /hash/{id} ───────┼─▶ handlers ──▶ DigestStore (visibility gate)  │
//!   GET /stats ───────────┼─▶ handlers ──▶ StatsAggregator (snapshot)     │
//!   GET /shutdown ────────┼─▶ handlers ──▶ ShutdownCoordinator            │
//!   SIGINT / SIGTERM ─────┼─▶ signals  ──▶ ShutdownCoordinator            │
//!                         │                        │                      │
//!                         │                        ▼                      │
//!                         │        server: stop accepting → drain → stop  │
//!                         └───────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use password_encoder::config::{load_config, validate_config, ConfigError, ServerConfig};
use password_encoder::lifecycle::{signals, startup, ShutdownCoordinator};
use password_encoder::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "password-encoder")]
#[command(about = "HTTP service that hashes passwords and releases digests after a delay", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for the HTTP password encoder server to use.
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level or filter directive (overrides the config file).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(port) = args.port {
        config.listener.set_port(port);
    }
    if let Some(level) = args.log_level {
        config.observability.log_level = level;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);

    tracing::info!("password-encoder v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        visibility_delay_secs = config.encoder.visibility_delay_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let coordinator = ShutdownCoordinator::new();
    signals::spawn_signal_listener(coordinator.clone());

    let outcome = startup::run(config, coordinator).await?;
    tracing::info!(?outcome, "Shutdown complete");
    Ok(())
}
