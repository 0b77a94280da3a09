//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Kafka administration for the console
//!
//! This crate holds the cluster registry, the [`ClusterAdmin`] abstraction with
//! its librdkafka and in-memory backends, and the topic, broker, consumer group,
//! message and metrics services the REST layer exposes.

pub mod admin;
pub mod assignment;
pub mod cluster;
pub mod config;
pub mod constants;
pub mod error;
pub mod services;

pub use admin::{
    BrokerInfo, ClusterAdmin, ClusterAdminFactory, ClusterMetadata, DefaultAdminFactory, GroupDescription,
    InMemoryAdmin, MemberDescription, PartitionMetadata, RawMessage, TopicMetadata,
};
#[cfg(feature = "kafka")]
pub use admin::RdKafkaAdmin;
pub use assignment::{encode_member_assignment, parse_member_assignment, MemberAssignment};
pub use cluster::{parse_broker_list, validate_broker_list, ClusterEntry, ClusterRegistry};
pub use config::{AdminBackend, ClusterConfig, KafkaConfig};
pub use error::{KafkaError, KafkaResult};
pub use services::{
    Broker, BrokerMetrics, BrokerService, ClusterHealth, ConsumerGroupDetails, ConsumerGroupLag,
    ConsumerGroupMetrics, ConsumerGroupService, ConsumerGroupSummary, CreateTopicRequest, GroupMember,
    KafkaServices, Message, MessageFilter, MessageFormat, MessageSearch, MessageService, MetricsService,
    PartitionDetails, ProduceRequest, ProduceResult, TopicDetails, TopicMetrics, TopicService, TopicSummary,
};

use std::sync::Arc;

/// Kafka console crate version
pub const KAFKA_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default client id reported to brokers
pub const DEFAULT_CLIENT_ID: &str = "kafka-console";

/// Default admin and metadata request timeout in milliseconds
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Default produce delivery timeout in milliseconds
pub const DEFAULT_MESSAGE_TIMEOUT_MS: u64 = 5_000;

/// Default bootstrap servers
pub const DEFAULT_BOOTSTRAP_SERVERS: &str = "localhost:9092";

/// Build the cluster registry and services from configuration
pub async fn init_kafka_services(config: &KafkaConfig) -> KafkaResult<(ClusterRegistry, KafkaServices)> {
    tracing::info!(
        "Initializing Kafka console services v{} ({} backend)",
        KAFKA_VERSION,
        config.backend
    );

    config.ensure_valid()?;
    let factory = Arc::new(DefaultAdminFactory::new(config.clone()));
    let registry = ClusterRegistry::from_config(config, factory).await?;
    let services = KafkaServices::new(registry.clone());

    tracing::info!(
        "Kafka console services initialized with {} cluster(s)",
        registry.cluster_count().await
    );
    Ok((registry, services))
}
