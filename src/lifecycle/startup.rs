//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the listener before any traffic is served
//! - Report a failed bind to the shutdown coordinator
//! - Serve until stopped, bounding the drain by a deadline
//!
//! # Design Decisions
//! - Fail fast: a bind error is fatal and skips draining

use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ListenerConfig, ServerConfig};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::{ShutdownCause, ShutdownCoordinator};

/// Errors raised before the server starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The configured address could not be bound.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that end a server run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// How a run that did not fail came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every in-flight request finished before the deadline.
    Drained,
    /// The drain deadline passed and the server task was aborted.
    DeadlineExceeded,
}

/// Bind, serve, and return once the coordinator reaches `Stopped` or the
/// drain deadline passes.
pub async fn run(
    config: ServerConfig,
    coordinator: ShutdownCoordinator,
) -> Result<RunOutcome, RunError> {
    let drain_deadline = Duration::from_secs(config.timeouts.shutdown_secs);

    let (server_task, startup_error) = match bind_listener(&config.listener, &coordinator).await {
        Ok(listener) => {
            let server = HttpServer::new(config, coordinator.clone());
            (Some(tokio::spawn(server.run(listener))), None)
        }
        Err(e) => (None, Some(e)),
    };

    match coordinator.await_shutdown().await {
        ShutdownCause::InitializationFailure => {
            tracing::error!("Server failed to initialize, nothing to drain");
            if let Some(e) = startup_error {
                return Err(e.into());
            }
        }
        ShutdownCause::Requested => {
            // a trigger raced the failed bind; there is still nothing to drain
            if let Some(e) = startup_error {
                return Err(e.into());
            }
            let drained =
                tokio::time::timeout(drain_deadline, coordinator.await_drain_complete()).await;
            if drained.is_err() {
                tracing::warn!(
                    deadline_secs = drain_deadline.as_secs(),
                    "Drain deadline exceeded, forcing exit"
                );
                if let Some(task) = server_task {
                    task.abort();
                }
                return Ok(RunOutcome::DeadlineExceeded);
            }
        }
    }

    if let Some(task) = server_task {
        task.await??;
    }
    Ok(RunOutcome::Drained)
}

/// Bind the configured listener.
///
/// On failure the coordinator moves straight to `Stopped` with an
/// initialization-failure cause.
pub async fn bind_listener(
    config: &ListenerConfig,
    coordinator: &ShutdownCoordinator,
) -> Result<TcpListener, StartupError> {
    match TcpListener::bind(&config.bind_address).await {
        Ok(listener) => {
            if let Ok(addr) = listener.local_addr() {
                tracing::info!(address = %addr, "Listening for connections");
            }
            Ok(listener)
        }
        Err(source) => {
            tracing::error!(address = %config.bind_address, error = %source, "Listener failed to start");
            coordinator.fail_initialization();
            Err(StartupError::Bind {
                address: config.bind_address.clone(),
                source,
            })
        }
    }
}
