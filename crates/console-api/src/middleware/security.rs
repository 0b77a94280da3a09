//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! CORS and security header middleware

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::{config::ConsoleConfig, rest::AppState};

/// CORS middleware
pub fn cors_middleware(config: &ConsoleConfig) -> CorsLayer {
    if !config.cors.enabled {
        return CorsLayer::new();
    }

    let methods: Vec<Method> = config
        .cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    let headers: Vec<HeaderName> = config
        .cors
        .allowed_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_methods(methods)
        .allow_headers(headers)
        .max_age(Duration::from_secs(config.cors.max_age_secs));

    if config.cors.allowed_origins.iter().any(|o| o == "*") {
        // A literal `*` cannot be combined with credentials, so echo the caller's origin
        if config.cors.allow_credentials {
            cors.allow_origin(AllowOrigin::mirror_request())
                .allow_credentials(true)
        } else {
            cors.allow_origin(Any)
        }
    } else {
        let origins: Vec<HeaderValue> = config
            .cors
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        cors.allow_origin(origins)
            .allow_credentials(config.cors.allow_credentials)
    }
}

/// Security headers middleware
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let security = &state.config.security;
    if !security.enable_security_headers {
        return response;
    }

    let headers = response.headers_mut();
    let configured = [
        ("Content-Security-Policy", &security.content_security_policy),
        ("Strict-Transport-Security", &security.strict_transport_security),
        ("X-Frame-Options", &security.x_frame_options),
        ("X-Content-Type-Options", &security.x_content_type_options),
    ];
    for (name, value) in configured {
        if let Some(value) = value.as_deref().and_then(|v| HeaderValue::from_str(v).ok()) {
            headers.insert(name, value);
        }
    }

    headers.insert("X-XSS-Protection", HeaderValue::from_static("1; mode=block"));
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}
