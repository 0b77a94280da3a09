//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Health and fallback handlers

use axum::extract::State;
use std::sync::OnceLock;
use std::time::Instant;

use crate::{
    constants::{MSG_ROUTE_NOT_FOUND, MSG_SERVICE_HEALTHY},
    error::{not_found, ApiError},
    rest::AppState,
    types::{ApiResponse, HealthResponse},
};

static SERVER_START_TIME: OnceLock<Instant> = OnceLock::new();

/// Initialize server start time
pub fn init_server_start_time() {
    SERVER_START_TIME.get_or_init(Instant::now);
}

/// Server uptime in seconds, 0 before the server starts
pub fn get_server_uptime() -> u64 {
    SERVER_START_TIME
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

pub async fn health_handler(State(state): State<AppState>) -> ApiResponse<HealthResponse> {
    let health = HealthResponse {
        status: "healthy".to_string(),
        version: crate::CONSOLE_API_VERSION.to_string(),
        clusters: state.registry.cluster_count().await,
        uptime_seconds: get_server_uptime(),
        timestamp: chrono::Utc::now(),
    };

    ApiResponse::success(health, MSG_SERVICE_HEALTHY)
}

pub async fn not_found_handler() -> ApiError {
    not_found(MSG_ROUTE_NOT_FOUND)
}
