//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! REST API server for the Kafka console
//!
//! Every route lives under `/api`. Successful responses use the envelope
//! `{"success": true, "data": ..., "message": ...}` and failures use
//! `{"success": false, "error": {...}}`. Everything except health, login and
//! registration requires a bearer token issued by [`console_auth`].

pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod rest;
pub mod server;
pub mod types;

pub use config::{ConsoleConfig, LogFormat};
pub use error::{ApiError, ApiResult, ErrorBody, ErrorResponse};
pub use rest::{create_rest_router, AppState};
pub use server::{run_server, ConsoleServer, ServerState, ServerStatus};
pub use types::ApiResponse;

/// Console API version
pub const CONSOLE_API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Console API name
pub const CONSOLE_API_NAME: &str = "kafka-console";

/// Build the shared state from configuration
pub async fn build_state(config: ConsoleConfig) -> ApiResult<AppState> {
    let auth = console_auth::init_auth_system(config.auth.clone())
        .await
        .map_err(|e| ApiError::Configuration(format!("Failed to initialize auth: {}", e)))?;

    let (registry, services) = console_kafka::init_kafka_services(&config.kafka)
        .await
        .map_err(|e| ApiError::Configuration(format!("Failed to initialize Kafka services: {}", e)))?;

    Ok(AppState::new(config, auth, registry, services))
}
