//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! HTTP server lifecycle for the console API

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::signal;
use tokio::sync::RwLock;

use crate::{
    config::ConsoleConfig,
    error::{internal_error, ApiResult},
    handlers::init_server_start_time,
    rest::create_rest_router,
};

/// Server lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// Server status
#[derive(Debug, Clone)]
pub struct ServerStatus {
    pub state: ServerState,
    pub address: Option<SocketAddr>,
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub uptime_seconds: u64,
}

impl Default for ServerStatus {
    fn default() -> Self {
        Self {
            state: ServerState::Starting,
            address: None,
            start_time: None,
            uptime_seconds: 0,
        }
    }
}

/// Kafka console API server
pub struct ConsoleServer {
    config: ConsoleConfig,
    router: Option<Router>,
    status: Arc<RwLock<ServerStatus>>,
}

impl ConsoleServer {
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            router: None,
            status: Arc::new(RwLock::new(ServerStatus::default())),
        }
    }

    /// Build the auth and Kafka services and the router
    pub async fn init(&mut self) -> ApiResult<()> {
        tracing::info!(
            "Initializing {} v{}",
            crate::CONSOLE_API_NAME,
            crate::CONSOLE_API_VERSION
        );

        init_server_start_time();

        let state = crate::build_state(self.config.clone()).await?;
        self.router = Some(create_rest_router(state));

        tracing::info!("Console server initialized successfully");
        Ok(())
    }

    /// Serve until SIGINT or SIGTERM
    pub async fn start(&mut self) -> ApiResult<()> {
        let listener = tokio::net::TcpListener::bind(self.config.http_address())
            .await
            .map_err(|e| {
                internal_error(format!(
                    "Failed to bind {}: {}",
                    self.config.http_address(),
                    e
                ))
            })?;

        self.serve(listener, wait_for_shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// In-flight requests get the configured shutdown timeout to finish.
    pub async fn serve<F>(&mut self, listener: tokio::net::TcpListener, shutdown: F) -> ApiResult<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        if self.router.is_none() {
            self.init().await?;
        }
        let router = self
            .router
            .take()
            .ok_or_else(|| internal_error("Server router not initialized"))?;

        let address = listener
            .local_addr()
            .map_err(|e| internal_error(format!("Failed to read listener address: {}", e)))?;

        {
            let mut status = self.status.write().await;
            status.state = ServerState::Running;
            status.address = Some(address);
            status.start_time = Some(chrono::Utc::now());
        }

        tracing::info!("HTTP server listening on {}", address);

        let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();
        let status = self.status.clone();
        let graceful = async move {
            shutdown.await;
            status.write().await.state = ServerState::Stopping;
            tracing::info!("Shutdown signal received, draining connections");
            let _ = drain_tx.send(());
        };

        let server = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(graceful)
        .into_future();

        let drain_timeout = self.config.shutdown_timeout();
        let result = tokio::select! {
            result = server => result.map_err(|e| internal_error(format!("HTTP server error: {}", e))),
            _ = async {
                if drain_rx.await.is_ok() {
                    tokio::time::sleep(drain_timeout).await;
                } else {
                    std::future::pending::<()>().await;
                }
            } => {
                tracing::warn!(
                    "Connections still open after {}s, forcing shutdown",
                    drain_timeout.as_secs()
                );
                Ok(())
            }
        };

        self.status.write().await.state = ServerState::Stopped;
        tracing::info!("Console server stopped");
        result
    }

    /// Get server status
    pub async fn get_status(&self) -> ServerStatus {
        let mut status = self.status.read().await.clone();

        if let Some(start_time) = status.start_time {
            let now = chrono::Utc::now();
            status.uptime_seconds = (now - start_time).num_seconds().max(0) as u64;
        }

        status
    }

    pub fn get_config(&self) -> &ConsoleConfig {
        &self.config
    }
}

/// Wait for SIGINT or SIGTERM
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate_signal) => {
                terminate_signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT signal"),
        _ = terminate => tracing::info!("Received SIGTERM signal"),
    }
}

/// Run the server with the given configuration
pub async fn run_server(config: ConsoleConfig) -> ApiResult<()> {
    let mut server = ConsoleServer::new(config);
    server.init().await?;
    server.start().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_auth::UserConfig;
    use console_kafka::AdminBackend;

    fn test_config() -> ConsoleConfig {
        let mut config = ConsoleConfig::default();
        config.kafka.backend = AdminBackend::Memory;
        config.auth.users = UserConfig::lightweight();
        config.logging.enable_request_logging = false;
        config
    }

    #[tokio::test]
    async fn test_serve_until_shutdown() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let mut server = ConsoleServer::new(test_config());
        assert_eq!(server.get_status().await.state, ServerState::Starting);
        let status = server.status.clone();

        let handle = tokio::spawn(async move {
            server
                .serve(listener, async move {
                    let _ = stop_rx.await;
                })
                .await
        });

        // Wait for the listener to accept
        let mut stream = None;
        for _ in 0..50 {
            if let Ok(s) = tokio::net::TcpStream::connect(addr).await {
                stream = Some(s);
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(stream.is_some());
        drop(stream);

        stop_tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
        assert_eq!(status.read().await.state, ServerState::Stopped);
    }
}
