//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Error handling for the console API
//!
//! Every failure leaves the server in the error envelope
//! `{"success": false, "error": {"type", "message", "details", "code"}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use console_auth::AuthError;
use console_kafka::KafkaError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Kafka error: {message}")]
    Kafka {
        message: String,
        category: &'static str,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Get HTTP status code for the error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Kafka { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error type for the envelope
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Kafka { .. } => "KAFKA_ERROR",
            ApiError::Internal(_) | ApiError::Configuration(_) => "INTERNAL_ERROR",
        }
    }

    /// Get error message without the variant prefix
    pub fn message(&self) -> String {
        match self {
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg)
            | ApiError::Configuration(msg) => msg.clone(),
            ApiError::Kafka { message, .. } => message.clone(),
        }
    }

    /// Extra detail reported alongside the message
    pub fn details(&self) -> Option<String> {
        match self {
            ApiError::Kafka { category, .. } => Some((*category).to_string()),
            _ => None,
        }
    }
}

/// Error body inside the envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// HTTP status code
    pub code: u16,
}

/// Error envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: &ApiError) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                error_type: error.error_type().to_string(),
                message: error.message(),
                details: error.details(),
                code: error.status_code().as_u16(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::error!(error_type = self.error_type(), "{}", self.message());
        }

        (status_code, Json(ErrorResponse::new(&self))).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Validation(format!("Invalid request data: {}", err))
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::Configuration(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials(msg) => ApiError::Unauthorized(msg),
            AuthError::AuthenticationFailed(msg) => ApiError::Unauthorized(msg),
            AuthError::UserNotFound(msg) => ApiError::NotFound(msg),
            AuthError::UserExists(msg) => ApiError::Conflict(msg),
            AuthError::WeakPassword(msg) => ApiError::Validation(msg),
            AuthError::TokenValidation(_)
            | AuthError::TokenExpired(_)
            | AuthError::TokenNotYetValid(_)
            | AuthError::TokenBlacklisted(_) => ApiError::Unauthorized("Invalid token".to_string()),
            AuthError::TokenGeneration(msg) => {
                ApiError::Internal(format!("Failed to generate token: {}", msg))
            }
            AuthError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<KafkaError> for ApiError {
    fn from(err: KafkaError) -> Self {
        kafka_error("", err)
    }
}

/// Map a Kafka error, prefixing unexpected failures with the handler's context
pub fn kafka_error(context: &str, err: KafkaError) -> ApiError {
    match err {
        KafkaError::ClusterNotFound(msg)
        | KafkaError::TopicNotFound(msg)
        | KafkaError::ConsumerGroupNotFound(msg) => ApiError::NotFound(msg),
        KafkaError::ClusterExists(msg) => ApiError::Conflict(msg),
        KafkaError::Validation(msg) => ApiError::Validation(msg),
        other => {
            tracing::warn!(
                error_code = other.error_code(),
                category = other.category(),
                "{}{}",
                context,
                other
            );
            ApiError::Kafka {
                message: format!("{}{}", context, other),
                category: other.category(),
            }
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

pub fn validation_error(message: impl Into<String>) -> ApiError {
    ApiError::Validation(message.into())
}

pub fn not_found(message: impl Into<String>) -> ApiError {
    ApiError::NotFound(message.into())
}

pub fn unauthorized(message: impl Into<String>) -> ApiError {
    ApiError::Unauthorized(message.into())
}

pub fn forbidden(message: impl Into<String>) -> ApiError {
    ApiError::Forbidden(message.into())
}

pub fn internal_error(message: impl Into<String>) -> ApiError {
    ApiError::Internal(message.into())
}
