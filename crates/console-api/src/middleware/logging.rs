//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Logging and metrics middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use metrics::{counter, histogram};
use std::time::Instant;

use super::utils::{truncate_string, RequestContext};
use crate::rest::AppState;

/// Longest URI written to the request log
const MAX_LOGGED_URI_LEN: usize = 256;

/// Logging middleware
///
/// Logs each completed request with its id, records request counters and
/// response times, and counts errors by class.
pub async fn logging_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start_time = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.start_time)
        .unwrap_or_else(Instant::now);
    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();
    let method = request.method().clone();
    let uri = truncate_string(&request.uri().to_string(), MAX_LOGGED_URI_LEN);
    let path = request.uri().path().to_string();
    let client = super::rate_limit::client_ip(&request);

    let response = next.run(request).await;

    let duration = start_time.elapsed();
    let status = response.status();

    counter!("console_api_requests_total", 1, "method" => method.to_string(), "status_code" => status.as_u16().to_string());
    histogram!("console_api_response_time_seconds", duration.as_secs_f64(), "method" => method.to_string());
    if status.is_client_error() || status.is_server_error() {
        let error_type = if status.is_server_error() {
            "server_error"
        } else {
            "client_error"
        };
        counter!("console_api_errors_total", 1, "error_type" => error_type);
    }

    if state.config.logging.enable_request_logging {
        tracing::info!(
            request_id = %request_id,
            client = %client,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = duration.as_millis() as u64,
            "Request completed"
        );
    } else {
        tracing::debug!(request_id = %request_id, path = %path, status = %status, "Request completed");
    }

    response
}
