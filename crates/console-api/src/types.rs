//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Request and response types for the console API

use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Success envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    pub message: String,
}

impl<T> ApiResponse<T> {
    /// Wrap data with a success message
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// Password change request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,

    #[serde(default)]
    pub new_password: String,
}

/// Cluster registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddClusterRequest {
    pub name: String,

    pub brokers: Vec<String>,
}

/// Name of a created or removed cluster or topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
}

impl NamedResource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Message browse query string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageQuery {
    pub key: Option<String>,

    pub value: Option<String>,

    pub start_time: Option<DateTime<Utc>>,

    pub end_time: Option<DateTime<Utc>>,

    pub format: Option<String>,
}

/// Replay query string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayQuery {
    pub start_offset: i64,

    pub end_offset: i64,
}

/// Replay outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayResult {
    pub topic: String,

    pub replayed: usize,
}

/// Message validation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateMessageRequest {
    pub format: String,

    #[serde(default)]
    pub value: Value,
}

/// Health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,

    pub version: String,

    pub clusters: usize,

    pub uptime_seconds: u64,

    pub timestamp: DateTime<Utc>,
}
