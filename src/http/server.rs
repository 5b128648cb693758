//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, limits)
//! - Bind server to listener
//! - Drive the shutdown coordinator through drain and stop

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::handlers;
use crate::http::middleware::dump::dump_request;
use crate::http::request::{request_id, MakeRequestUuid};
use crate::lifecycle::ShutdownCoordinator;
use crate::stats::StatsAggregator;
use crate::store::DigestStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DigestStore>,
    pub stats: Arc<StatsAggregator>,
    pub shutdown: ShutdownCoordinator,
}

impl AppState {
    /// Fresh store and aggregator sharing `shutdown`.
    pub fn new(config: &ServerConfig, shutdown: ShutdownCoordinator) -> Self {
        Self {
            store: Arc::new(DigestStore::with_visibility_delay(
                config.encoder.visibility_delay(),
            )),
            stats: Arc::new(StatsAggregator::new()),
            shutdown,
        }
    }
}

/// HTTP server for the password encoder.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig, shutdown: ShutdownCoordinator) -> Self {
        let state = AppState::new(&config, shutdown);
        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/hash", post(handlers::submit_hash).get(handlers::submit_hash))
            .route("/hash/{id}", get(handlers::get_hash))
            .route("/stats", get(handlers::get_stats))
            .route("/shutdown", get(handlers::shutdown).post(handlers::shutdown))
            .fallback(handlers::fallback)
            .with_state(state);

        if config.observability.dump_requests {
            router = router.layer(middleware::from_fn(dump_request));
        }

        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        request_id = %request_id(request.headers()),
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                .layer(ConcurrencyLimitLayer::new(config.listener.max_connections))
                .layer(DefaultBodyLimit::max(config.security.max_body_size)),
        )
    }

    /// Run the server until a shutdown is requested and every in-flight
    /// request has finished.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            visibility_delay_secs = self.config.encoder.visibility_delay_secs,
            "HTTP server starting"
        );

        let coordinator = self.state.shutdown.clone();
        let drain = {
            let coordinator = coordinator.clone();
            async move {
                let cause = coordinator.await_shutdown().await;
                tracing::info!(?cause, "Stopping listener, draining in-flight requests");
                coordinator.begin_drain();
            }
        };

        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(drain)
            .await;

        coordinator.complete_drain();
        tracing::info!("HTTP server stopped");
        result
    }

    /// Shared state, for inspection after requests have been served.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
