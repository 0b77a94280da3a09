//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Error types for the console client

use thiserror::Error;

use crate::constants::MSG_REQUEST_FAILED;

/// Client error
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with the error envelope
    #[error("{message}")]
    Api {
        error_type: String,
        message: String,
        status: u16,
    },

    /// Connection, timeout or protocol failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("{0}")]
    NotAuthenticated(String),

    /// Token persistence failed
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    pub fn api(error_type: impl Into<String>, message: impl Into<String>, status: u16) -> Self {
        Self::Api {
            error_type: error_type.into(),
            message: message.into(),
            status,
        }
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self::Http(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn not_authenticated(message: impl Into<String>) -> Self {
        Self::NotAuthenticated(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a retry may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Message with the envelope fallback applied
    pub fn message(&self) -> String {
        match self {
            Self::Api { message, .. } if message.is_empty() => MSG_REQUEST_FAILED.to_string(),
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_is_server_message() {
        let err = ClientError::api("NOT_FOUND", "cluster 'prod' not found", 404);
        assert_eq!(err.to_string(), "cluster 'prod' not found");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_transport_errors_are_transient() {
        assert!(ClientError::http("connection refused").is_transient());
        assert!(!ClientError::decode("bad json").is_transient());
        assert!(ClientError::api("UNAUTHORIZED", "Invalid token", 401).is_unauthorized());
    }
}
