//! Shared helpers for integration tests.

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use password_encoder::config::ServerConfig;
use password_encoder::http::{AppState, HttpServer};
use password_encoder::lifecycle::ShutdownCoordinator;

/// A server running on an ephemeral local port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    pub coordinator: ShutdownCoordinator,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    #[allow(dead_code)]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the encoder with `config`, bound to 127.0.0.1 on a free port.
pub async fn start_server(config: ServerConfig) -> TestServer {
    let coordinator = ShutdownCoordinator::new();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config, coordinator.clone());
    let state = server.state().clone();
    let handle = tokio::spawn(server.run(listener));

    TestServer {
        addr,
        state,
        coordinator,
        handle,
    }
}

/// Config with a short visibility delay so tests can wait it out.
#[allow(dead_code)]
pub fn fast_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.encoder.visibility_delay_secs = 1;
    config
}

/// Client that never reuses connections, so shutdown is not held up by idle sockets.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
