//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Kafka console error handling
//!
//! Errors raised by the cluster registry, the admin backends and the services
//! layered on top of them.

use thiserror::Error;

/// Kafka error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KafkaError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Producer errors
    #[error("Producer error: {0}")]
    Producer(String),

    /// Consumer errors
    #[error("Consumer error: {0}")]
    Consumer(String),

    /// Topic errors
    #[error("Topic error: {0}")]
    Topic(String),

    /// Cluster errors
    #[error("{0}")]
    Cluster(String),

    /// Unknown cluster name
    #[error("{0}")]
    ClusterNotFound(String),

    /// Cluster name already registered
    #[error("{0}")]
    ClusterExists(String),

    /// Unknown topic
    #[error("{0}")]
    TopicNotFound(String),

    /// Unknown consumer group
    #[error("{0}")]
    ConsumerGroupNotFound(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization errors
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Validation errors
    #[error("{0}")]
    Validation(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl KafkaError {
    /// Create a configuration error
    pub fn configuration(message: &str) -> Self {
        KafkaError::Configuration(message.to_string())
    }

    /// Create a connection error
    pub fn connection(message: &str) -> Self {
        KafkaError::Connection(message.to_string())
    }

    /// Create a producer error
    pub fn producer(message: &str) -> Self {
        KafkaError::Producer(message.to_string())
    }

    /// Create a consumer error
    pub fn consumer(message: &str) -> Self {
        KafkaError::Consumer(message.to_string())
    }

    /// Create a topic error
    pub fn topic(message: &str) -> Self {
        KafkaError::Topic(message.to_string())
    }

    /// Create a cluster error
    pub fn cluster(message: &str) -> Self {
        KafkaError::Cluster(message.to_string())
    }

    pub fn cluster_not_found(name: &str) -> Self {
        KafkaError::ClusterNotFound(format!("cluster '{}' not found", name))
    }

    pub fn cluster_exists(name: &str) -> Self {
        KafkaError::ClusterExists(format!("cluster '{}' already exists", name))
    }

    pub fn topic_not_found(name: &str) -> Self {
        KafkaError::TopicNotFound(format!("topic '{}' not found", name))
    }

    pub fn consumer_group_not_found(group_id: &str) -> Self {
        KafkaError::ConsumerGroupNotFound(format!("consumer group '{}' not found", group_id))
    }

    /// Create a serialization error
    pub fn serialization(message: &str) -> Self {
        KafkaError::Serialization(message.to_string())
    }

    /// Create a deserialization error
    pub fn deserialization(message: &str) -> Self {
        KafkaError::Deserialization(message.to_string())
    }

    /// Create a timeout error
    pub fn timeout(message: &str) -> Self {
        KafkaError::Timeout(message.to_string())
    }

    /// Create a validation error
    pub fn validation(message: &str) -> Self {
        KafkaError::Validation(message.to_string())
    }

    /// Create an internal error
    pub fn internal(message: &str) -> Self {
        KafkaError::Internal(message.to_string())
    }

    /// True when the lookup target does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            KafkaError::ClusterNotFound(_)
                | KafkaError::TopicNotFound(_)
                | KafkaError::ConsumerGroupNotFound(_)
        )
    }

    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            KafkaError::Connection(_)
                | KafkaError::Timeout(_)
                | KafkaError::Producer(_)
                | KafkaError::Consumer(_)
        )
    }

    /// Get error code
    pub fn error_code(&self) -> u32 {
        match self {
            KafkaError::Connection(_) => 2001,
            KafkaError::Producer(_) => 2003,
            KafkaError::Consumer(_) => 2004,
            KafkaError::Topic(_) => 2005,
            KafkaError::Cluster(_) => 2006,
            KafkaError::Serialization(_) => 2007,
            KafkaError::Deserialization(_) => 2008,
            KafkaError::Timeout(_) => 2009,
            KafkaError::Validation(_) => 2011,
            KafkaError::Internal(_) => 2012,
            KafkaError::ClusterNotFound(_) => 2013,
            KafkaError::ClusterExists(_) => 2014,
            KafkaError::TopicNotFound(_) => 2015,
            KafkaError::ConsumerGroupNotFound(_) => 2016,
            KafkaError::Configuration(_) => 2100,
        }
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        match self {
            KafkaError::Configuration(_) => "configuration",
            KafkaError::Connection(_) => "connection",
            KafkaError::Producer(_) => "producer",
            KafkaError::Consumer(_) => "consumer",
            KafkaError::Topic(_) | KafkaError::TopicNotFound(_) => "topic",
            KafkaError::Cluster(_) | KafkaError::ClusterNotFound(_) | KafkaError::ClusterExists(_) => {
                "cluster"
            }
            KafkaError::ConsumerGroupNotFound(_) => "consumer_group",
            KafkaError::Serialization(_) => "serialization",
            KafkaError::Deserialization(_) => "deserialization",
            KafkaError::Timeout(_) => "timeout",
            KafkaError::Validation(_) => "validation",
            KafkaError::Internal(_) => "internal",
        }
    }
}

#[cfg(feature = "kafka")]
impl From<rdkafka::error::KafkaError> for KafkaError {
    fn from(error: rdkafka::error::KafkaError) -> Self {
        use rdkafka::error::KafkaError as RdError;

        match &error {
            RdError::ClientCreation(msg) => KafkaError::Connection(msg.clone()),
            RdError::MetadataFetch(_) => KafkaError::Cluster(error.to_string()),
            RdError::GroupListFetch(_) => KafkaError::Consumer(error.to_string()),
            RdError::MessageProduction(_) => KafkaError::Producer(error.to_string()),
            RdError::MessageConsumption(_) | RdError::OffsetFetch(_) => {
                KafkaError::Consumer(error.to_string())
            }
            RdError::AdminOp(_) | RdError::AdminOpCreation(_) => KafkaError::Topic(error.to_string()),
            _ => KafkaError::Internal(error.to_string()),
        }
    }
}

/// Kafka result type
pub type KafkaResult<T> = Result<T, KafkaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        assert_eq!(
            KafkaError::cluster_not_found("prod").to_string(),
            "cluster 'prod' not found"
        );
        assert_eq!(
            KafkaError::consumer_group_not_found("billing").to_string(),
            "consumer group 'billing' not found"
        );
        assert!(KafkaError::topic_not_found("orders").is_not_found());
        assert!(!KafkaError::validation("bad").is_not_found());
    }

    #[test]
    fn test_error_classification() {
        let err = KafkaError::timeout("metadata request");
        assert!(err.is_retryable());
        assert_eq!(err.category(), "timeout");
        assert_eq!(err.error_code(), 2009);

        let err = KafkaError::validation("Topic name is required");
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Topic name is required");
    }
}
