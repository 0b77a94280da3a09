//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Request context and string helpers shared by middleware and handlers

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

/// Response header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request context
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID
    pub request_id: String,

    /// Start time
    pub start_time: Instant,

    /// User ID (if authenticated)
    pub user_id: Option<String>,

    /// Request metadata
    pub metadata: HashMap<String, String>,
}

impl RequestContext {
    /// Create a new request context
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            start_time: Instant::now(),
            user_id: None,
            metadata: HashMap::new(),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Request ID middleware
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = match request.extensions().get::<RequestContext>() {
        Some(context) => context.request_id.clone(),
        None => {
            let context = RequestContext::new();
            let request_id = context.request_id.clone();
            request.extensions_mut().insert(context);
            request_id
        }
    };

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Drop control characters other than tab, line feed and carriage return
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| (*c as u32) >= 0x20 || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

/// Cut a string to `max_len` characters, ending with "..." when shortened
pub fn truncate_string(input: &str, max_len: usize) -> String {
    if input.chars().count() <= max_len {
        return input.to_string();
    }

    let keep = max_len.saturating_sub(3);
    let mut truncated: String = input.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}
