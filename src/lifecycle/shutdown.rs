//! Shutdown coordination for the encoder service.

use std::sync::Arc;
use tokio::sync::watch;

/// Where the process is in its stop sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownPhase {
    /// Serving normally.
    Running,
    /// A trigger fired; the server has not yet stopped accepting.
    ShutdownRequested,
    /// No new connections; in-flight requests finishing.
    Draining,
    /// Terminal.
    Stopped,
}

/// Why the process is stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownCause {
    /// An external trigger (endpoint or OS signal) asked for a graceful stop.
    Requested,
    /// The listener never started, so there is nothing to drain.
    InitializationFailure,
}

#[derive(Debug, Clone, Copy)]
struct State {
    phase: ShutdownPhase,
    cause: Option<ShutdownCause>,
}

/// Coordinator for graceful shutdown.
///
/// The first trigger wins; later triggers are no-ops. Any number of tasks may
/// wait on the shutdown request or on drain completion.
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
    tx: Arc<watch::Sender<State>>,
}

impl ShutdownCoordinator {
    /// Create a coordinator in the `Running` phase.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(State {
            phase: ShutdownPhase::Running,
            cause: None,
        });
        Self { tx: Arc::new(tx) }
    }

    /// Request a graceful shutdown.
    ///
    /// Returns `true` only for the call that moved the coordinator out of
    /// `Running`.
    pub fn request_shutdown(&self) -> bool {
        let fired = self.tx.send_if_modified(|state| {
            if state.phase != ShutdownPhase::Running {
                return false;
            }
            state.phase = ShutdownPhase::ShutdownRequested;
            state.cause = Some(ShutdownCause::Requested);
            true
        });

        if fired {
            tracing::info!("Shutdown requested");
        } else {
            tracing::debug!(phase = ?self.phase(), "Shutdown already in progress, ignoring request");
        }
        fired
    }

    /// Record that the listener failed to start. Skips straight to `Stopped`.
    pub fn fail_initialization(&self) {
        self.tx.send_if_modified(|state| {
            if state.phase != ShutdownPhase::Running {
                return false;
            }
            state.phase = ShutdownPhase::Stopped;
            state.cause = Some(ShutdownCause::InitializationFailure);
            true
        });
    }

    /// The server has stopped accepting new connections.
    pub fn begin_drain(&self) {
        self.tx.send_if_modified(|state| {
            if state.phase != ShutdownPhase::ShutdownRequested {
                return false;
            }
            state.phase = ShutdownPhase::Draining;
            true
        });
    }

    /// All in-flight work has finished.
    ///
    /// Returns `true` only for the call that moved the coordinator to `Stopped`.
    pub fn complete_drain(&self) -> bool {
        let stopped = self.tx.send_if_modified(|state| {
            if state.phase == ShutdownPhase::Stopped {
                return false;
            }
            state.phase = ShutdownPhase::Stopped;
            if state.cause.is_none() {
                state.cause = Some(ShutdownCause::Requested);
            }
            true
        });

        if stopped {
            tracing::info!("Drain complete");
        }
        stopped
    }

    /// Wait until a shutdown has been requested and return its cause.
    pub async fn await_shutdown(&self) -> ShutdownCause {
        let mut rx = self.tx.subscribe();
        let cause = match rx.wait_for(|state| state.cause.is_some()).await {
            Ok(state) => state.cause,
            // The sender lives as long as `self`, so this is unreachable.
            Err(_) => None,
        };
        cause.unwrap_or(ShutdownCause::Requested)
    }

    /// Wait until the coordinator reaches `Stopped`.
    pub async fn await_drain_complete(&self) {
        let mut rx = self.tx.subscribe();
        let _ = rx
            .wait_for(|state| state.phase == ShutdownPhase::Stopped)
            .await;
    }

    /// Current phase.
    pub fn phase(&self) -> ShutdownPhase {
        self.tx.borrow().phase
    }

    /// Whether a stop of any kind has begun.
    pub fn is_shutting_down(&self) -> bool {
        self.phase() != ShutdownPhase::Running
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
