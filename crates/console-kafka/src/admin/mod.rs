//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Kafka admin abstraction
//!
//! [`ClusterAdmin`] is the seam between the console services and a cluster.
//! Two backends implement it: librdkafka (behind the `kafka` feature) and an
//! in-process cluster used by tests and the `memory` backend setting.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{AdminBackend, ClusterConfig, KafkaConfig};
use crate::error::KafkaResult;

#[cfg(feature = "kafka")]
pub mod kafka;
pub mod memory;

#[cfg(feature = "kafka")]
pub use kafka::RdKafkaAdmin;
pub use memory::InMemoryAdmin;

/// Broker as reported by cluster metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerInfo {
    pub id: i32,
    pub host: String,
    pub port: u16,
}

impl BrokerInfo {
    /// `host:port` address
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionMetadata {
    pub id: i32,
    pub leader: i32,
    pub replicas: Vec<i32>,
    pub isr: Vec<i32>,
    pub offline_replicas: Vec<i32>,
}

impl PartitionMetadata {
    /// Replicas missing from the in-sync set
    pub fn out_of_sync(&self) -> usize {
        self.replicas.len().saturating_sub(self.isr.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMetadata {
    pub name: String,
    pub partitions: Vec<PartitionMetadata>,
}

impl TopicMetadata {
    /// Replica count of partition 0, or 0 without partitions
    pub fn replication_factor(&self) -> usize {
        self.partitions
            .iter()
            .find(|p| p.id == 0)
            .or_else(|| self.partitions.first())
            .map(|p| p.replicas.len())
            .unwrap_or(0)
    }
}

/// Snapshot of brokers and topics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMetadata {
    pub brokers: Vec<BrokerInfo>,
    pub topics: Vec<TopicMetadata>,
    /// Controller broker id, -1 when unknown
    pub controller_id: i32,
}

impl ClusterMetadata {
    pub fn topic(&self, name: &str) -> Option<&TopicMetadata> {
        self.topics.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescription {
    pub member_id: String,
    pub client_id: String,
    pub client_host: String,
    /// Raw consumer protocol assignment
    pub assignment: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDescription {
    pub group_id: String,
    pub state: String,
    pub protocol: String,
    pub protocol_type: String,
    pub members: Vec<MemberDescription>,
}

/// Committed offsets of a group, by topic then partition
pub type CommittedOffsets = BTreeMap<String, BTreeMap<i32, i64>>;

/// Record read from a partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<Vec<u8>>,
    pub value: Option<Vec<u8>>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Cluster operations used by the console services
#[async_trait]
pub trait ClusterAdmin: Send + Sync {
    /// Backend name for logs
    fn backend(&self) -> AdminBackend;

    /// Fetch brokers, topics and partitions
    async fn metadata(&self) -> KafkaResult<ClusterMetadata>;

    /// Describe a topic's configuration entries
    async fn topic_configs(&self, topic: &str) -> KafkaResult<BTreeMap<String, String>>;

    async fn create_topic(&self, name: &str, partitions: i32, replication_factor: i32) -> KafkaResult<()>;

    async fn delete_topic(&self, name: &str) -> KafkaResult<()>;

    /// Low and high watermark of a partition
    async fn watermarks(&self, topic: &str, partition: i32) -> KafkaResult<(i64, i64)>;

    async fn list_groups(&self) -> KafkaResult<Vec<GroupDescription>>;

    /// Committed offsets of a group; -1 where nothing is committed
    async fn committed_offsets(&self, group_id: &str) -> KafkaResult<CommittedOffsets>;

    /// Read up to `max` records from `start_offset`
    async fn fetch_messages(
        &self,
        topic: &str,
        partition: i32,
        start_offset: i64,
        max: usize,
        timeout: Duration,
    ) -> KafkaResult<Vec<RawMessage>>;

    /// Produce one record, returning its partition and offset
    async fn produce(
        &self,
        topic: &str,
        partition: Option<i32>,
        key: Option<Vec<u8>>,
        value: Vec<u8>,
    ) -> KafkaResult<(i32, i64)>;
}

/// Creates admin backends for clusters added at runtime
pub trait ClusterAdminFactory: Send + Sync {
    fn create(&self, cluster: &ClusterConfig) -> KafkaResult<Arc<dyn ClusterAdmin>>;
}

/// Factory choosing the backend from configuration
#[derive(Debug, Clone)]
pub struct DefaultAdminFactory {
    config: KafkaConfig,
}

impl DefaultAdminFactory {
    pub fn new(config: KafkaConfig) -> Self {
        Self { config }
    }
}

impl ClusterAdminFactory for DefaultAdminFactory {
    fn create(&self, cluster: &ClusterConfig) -> KafkaResult<Arc<dyn ClusterAdmin>> {
        match self.config.backend {
            AdminBackend::Memory => Ok(Arc::new(InMemoryAdmin::from_brokers(&cluster.brokers))),
            #[cfg(feature = "kafka")]
            AdminBackend::Rdkafka => Ok(Arc::new(RdKafkaAdmin::new(cluster, &self.config)?)),
            #[cfg(not(feature = "kafka"))]
            AdminBackend::Rdkafka => Err(crate::error::KafkaError::configuration(
                "Kafka feature is not enabled, rebuild with --features kafka or use the memory backend",
            )),
        }
    }
}
