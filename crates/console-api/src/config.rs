//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Configuration management for the console API
//!
//! Values come from an optional YAML or TOML file, then from environment
//! variables prefixed with `KAFKA_CONSOLE_` where `__` separates nested keys
//! (`KAFKA_CONSOLE_SERVER__PORT=9000`). The legacy `KAFKA_BROKERS` variable
//! seeds a `default` cluster when no clusters are configured.

use console_auth::AuthConfig;
use console_kafka::{parse_broker_list, ClusterConfig, KafkaConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding a comma separated broker list
pub const KAFKA_BROKERS_ENV: &str = "KAFKA_BROKERS";

/// Name of the cluster seeded from `KAFKA_BROKERS`
pub const DEFAULT_CLUSTER_NAME: &str = "default";

/// Console API configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// CORS configuration
    pub cors: CorsConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,

    /// Security configuration
    pub security: SecurityConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Kafka backend and clusters
    pub kafka: KafkaConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Time allowed for in-flight requests to finish on shutdown
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_secs: 5,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,

    /// Allowed origins, `*` for any
    pub allowed_origins: Vec<String>,

    pub allowed_methods: Vec<String>,

    pub allowed_headers: Vec<String>,

    pub allow_credentials: bool,

    /// Preflight cache lifetime in seconds
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: ["POST", "OPTIONS", "GET", "PUT", "DELETE"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            allowed_headers: [
                "Content-Type",
                "Content-Length",
                "Accept-Encoding",
                "X-CSRF-Token",
                "Authorization",
                "accept",
                "origin",
                "Cache-Control",
                "X-Requested-With",
            ]
            .iter()
            .map(|h| h.to_string())
            .collect(),
            allow_credentials: true,
            max_age_secs: 86400,
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,

    /// Requests allowed per client per minute
    pub requests_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: 100,
        }
    }
}

/// Security headers configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub enable_security_headers: bool,

    pub content_security_policy: Option<String>,

    pub strict_transport_security: Option<String>,

    pub x_frame_options: Option<String>,

    pub x_content_type_options: Option<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_security_headers: true,
            content_security_policy: None,
            strict_transport_security: None,
            x_frame_options: Some("DENY".to_string()),
            x_content_type_options: Some("nosniff".to_string()),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,

    pub format: LogFormat,

    /// Log every completed request
    pub enable_request_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            enable_request_logging: true,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from an optional file and the environment
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("KAFKA_CONSOLE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: ConsoleConfig = settings.try_deserialize()?;
        config.apply_legacy_brokers(std::env::var(KAFKA_BROKERS_ENV).ok().as_deref());
        Ok(config)
    }

    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
        Self::load(Some(path))
    }

    /// Seed the `default` cluster from a broker list when none is configured
    pub fn apply_legacy_brokers(&mut self, brokers: Option<&str>) {
        if !self.kafka.clusters.is_empty() {
            return;
        }

        let brokers = brokers.map(parse_broker_list).unwrap_or_default();
        if !brokers.is_empty() {
            tracing::info!(
                "Seeding cluster '{}' from {}",
                DEFAULT_CLUSTER_NAME,
                KAFKA_BROKERS_ENV
            );
            self.kafka
                .clusters
                .push(ClusterConfig::new(DEFAULT_CLUSTER_NAME, brokers));
        }
    }

    /// Get HTTP server address
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }

    /// Settings that are accepted but unsafe outside development
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.auth.jwt.uses_default_secret() {
            warnings.push(
                "Auth config: JWT secret is the built-in default, set auth.jwt.secret".to_string(),
            );
        }
        warnings
    }

    /// Validate configuration, reporting every problem at once
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for warning in self.warnings() {
            tracing::warn!("{}", warning);
        }

        let mut errors = Vec::new();

        if self.server.host.trim().is_empty() {
            errors.push("Server host cannot be empty".to_string());
        }

        if self.server.port == 0 {
            errors.push(format!("Invalid port number: {}", self.server.port));
        }

        if self.auth.jwt.secret.is_empty() {
            errors.push("Auth config: JWT secret cannot be empty".to_string());
        }

        if self.auth.jwt.expiration_secs == 0 {
            errors.push("Auth config: JWT expiration cannot be 0".to_string());
        }

        if self.rate_limit.enabled && self.rate_limit.requests_per_minute == 0 {
            errors.push("Rate limit config: requests per minute cannot be 0".to_string());
        }

        if self.cors.enabled && self.cors.allowed_origins.is_empty() {
            errors.push("CORS config: at least one allowed origin is required".to_string());
        }

        errors.extend(
            self.kafka
                .validate()
                .into_iter()
                .map(|e| format!("Kafka config: {}", e)),
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigValidationError::ValidationFailed(errors))
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Validation failed: {}", .0.join(", "))]
    ValidationFailed(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_kafka::AdminBackend;

    fn memory_config() -> ConsoleConfig {
        let mut config = ConsoleConfig::default();
        config.kafka.backend = AdminBackend::Memory;
        config
    }

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.http_address(), "0.0.0.0:8080");
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(config.rate_limit.requests_per_minute, 100);
        assert!(config.cors.allowed_methods.contains(&"DELETE".to_string()));
        assert!(config.cors.allowed_headers.contains(&"X-CSRF-Token".to_string()));
    }

    #[test]
    fn test_default_memory_config_is_valid() {
        assert!(memory_config().validate().is_ok());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = memory_config();
        config.server.port = 0;
        config.auth.jwt.secret = String::new();
        config.rate_limit.requests_per_minute = 0;
        config.kafka.clusters.push(ClusterConfig::new("bad", vec!["nohost".into()]));

        match config.validate() {
            Err(ConfigValidationError::ValidationFailed(errors)) => {
                assert_eq!(errors.len(), 4);
                assert!(errors[3].starts_with("Kafka config: Cluster bad"));
            }
            Ok(()) => panic!("expected validation failure"),
        }
    }

    #[test]
    fn test_default_secret_warns() {
        let mut config = memory_config();
        assert!(config
            .warnings()
            .iter()
            .any(|w| w.starts_with("Auth config: JWT secret is the built-in default")));
        assert!(config.validate().is_ok());

        config.auth.jwt.secret = "a-real-secret".to_string();
        assert!(!config.warnings().iter().any(|w| w.starts_with("Auth config")));
    }

    #[test]
    fn test_legacy_brokers_seed_default_cluster() {
        let mut config = memory_config();
        config.apply_legacy_brokers(Some("kafka-1:9092, kafka-2:9092"));

        assert_eq!(config.kafka.clusters.len(), 1);
        assert_eq!(config.kafka.clusters[0].name, DEFAULT_CLUSTER_NAME);
        assert_eq!(config.kafka.clusters[0].brokers, vec!["kafka-1:9092", "kafka-2:9092"]);

        // Configured clusters win over the environment
        config.apply_legacy_brokers(Some("other:9092"));
        assert_eq!(config.kafka.clusters[0].brokers.len(), 2);
    }

    #[test]
    fn test_legacy_brokers_ignores_empty() {
        let mut config = memory_config();
        config.apply_legacy_brokers(Some("  "));
        config.apply_legacy_brokers(None);
        assert!(config.kafka.clusters.is_empty());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
server:
  port: 9000
kafka:
  backend: memory
  clusters:
    - name: local
      brokers: ["localhost:9092"]
"#;
        let settings = config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .unwrap();
        let config: ConsoleConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.kafka.clusters[0].name, "local");
        assert!(config.validate().is_ok());
    }
}
