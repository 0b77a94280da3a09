//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Kafka console configuration
//!
//! Backend selection, client timeouts and the clusters registered at startup.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cluster::validate_broker_list;
use crate::error::{KafkaError, KafkaResult};

/// Admin backend used for every cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminBackend {
    /// librdkafka through the `rdkafka` crate
    Rdkafka,
    /// In-process cluster kept in memory
    Memory,
}

impl Default for AdminBackend {
    fn default() -> Self {
        if cfg!(feature = "kafka") {
            AdminBackend::Rdkafka
        } else {
            AdminBackend::Memory
        }
    }
}

impl fmt::Display for AdminBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminBackend::Rdkafka => write!(f, "rdkafka"),
            AdminBackend::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for AdminBackend {
    type Err = KafkaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rdkafka" | "kafka" => Ok(AdminBackend::Rdkafka),
            "memory" | "in-memory" => Ok(AdminBackend::Memory),
            other => Err(KafkaError::configuration(&format!(
                "Unknown admin backend: {}",
                other
            ))),
        }
    }
}

/// A cluster registered at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Cluster name
    pub name: String,

    /// Bootstrap brokers as `host:port`
    pub brokers: Vec<String>,

    /// Extra client properties passed to librdkafka
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl ClusterConfig {
    pub fn new(name: impl Into<String>, brokers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            brokers,
            properties: HashMap::new(),
        }
    }

    /// Comma separated bootstrap servers
    pub fn bootstrap_servers(&self) -> String {
        self.brokers.join(",")
    }
}

/// Main Kafka configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KafkaConfig {
    #[serde(default)]
    pub backend: AdminBackend,

    /// Metadata, admin and group request timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Produce delivery timeout in milliseconds
    #[serde(default = "default_message_timeout_ms")]
    pub message_timeout_ms: u64,

    /// Client id reported to the brokers
    #[serde(default = "default_client_id")]
    pub client_id: String,

    #[serde(default)]
    pub clusters: Vec<ClusterConfig>,
}

fn default_request_timeout_ms() -> u64 {
    crate::DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_message_timeout_ms() -> u64 {
    crate::DEFAULT_MESSAGE_TIMEOUT_MS
}

fn default_client_id() -> String {
    crate::DEFAULT_CLIENT_ID.to_string()
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            backend: AdminBackend::default(),
            request_timeout_ms: default_request_timeout_ms(),
            message_timeout_ms: default_message_timeout_ms(),
            client_id: default_client_id(),
            clusters: Vec::new(),
        }
    }
}

impl KafkaConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn message_timeout(&self) -> Duration {
        Duration::from_millis(self.message_timeout_ms)
    }

    /// Validate the configuration, collecting every problem
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.request_timeout_ms == 0 {
            errors.push("Kafka request timeout cannot be 0".to_string());
        }

        if self.message_timeout_ms == 0 {
            errors.push("Kafka message timeout cannot be 0".to_string());
        }

        if self.backend == AdminBackend::Rdkafka && !cfg!(feature = "kafka") {
            errors.push("Kafka feature is not enabled, use the memory backend".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for cluster in &self.clusters {
            if cluster.name.trim().is_empty() {
                errors.push("Cluster name cannot be empty".to_string());
                continue;
            }
            if !seen.insert(cluster.name.as_str()) {
                errors.push(format!("Duplicate cluster name: {}", cluster.name));
            }
            if let Err(e) = validate_broker_list(&cluster.brokers) {
                errors.push(format!("Cluster {}: {}", cluster.name, e));
            }
        }

        errors
    }

    /// Validate the configuration
    pub fn ensure_valid(&self) -> KafkaResult<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(KafkaError::configuration(&errors.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("memory".parse::<AdminBackend>().unwrap(), AdminBackend::Memory);
        assert_eq!("RDKAFKA".parse::<AdminBackend>().unwrap(), AdminBackend::Rdkafka);
        assert!("zookeeper".parse::<AdminBackend>().is_err());
        assert_eq!(AdminBackend::Memory.to_string(), "memory");
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: KafkaConfig = serde_json::from_str(
            r#"{"backend":"memory","clusters":[{"name":"local","brokers":["localhost:9092"]}]}"#,
        )
        .unwrap();

        assert_eq!(config.backend, AdminBackend::Memory);
        assert_eq!(config.request_timeout_ms, crate::DEFAULT_REQUEST_TIMEOUT_MS);
        assert_eq!(config.clusters[0].bootstrap_servers(), "localhost:9092");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validation_collects_errors() {
        let config = KafkaConfig {
            backend: AdminBackend::Memory,
            request_timeout_ms: 0,
            clusters: vec![
                ClusterConfig::new("a", vec!["localhost".to_string()]),
                ClusterConfig::new("a", vec!["localhost:9092".to_string()]),
            ],
            ..KafkaConfig::default()
        };

        let errors = config.validate();
        assert_eq!(errors.len(), 3);
        assert!(config.ensure_valid().is_err());
    }
}
