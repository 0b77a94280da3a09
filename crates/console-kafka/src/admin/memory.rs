//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! In-process cluster backend

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{
    BrokerInfo, ClusterAdmin, ClusterMetadata, CommittedOffsets, GroupDescription,
    PartitionMetadata, RawMessage, TopicMetadata,
};
use crate::cluster::split_host_port;
use crate::config::AdminBackend;
use crate::error::{KafkaError, KafkaResult};

#[derive(Debug)]
struct MemoryPartition {
    metadata: PartitionMetadata,
    log_start: i64,
    records: Vec<RawMessage>,
}

impl MemoryPartition {
    fn high_watermark(&self) -> i64 {
        self.log_start + self.records.len() as i64
    }
}

#[derive(Debug)]
struct MemoryTopic {
    partitions: Vec<MemoryPartition>,
    configs: BTreeMap<String, String>,
}

#[derive(Debug)]
struct MemoryGroup {
    description: GroupDescription,
    offsets: CommittedOffsets,
}

#[derive(Debug, Default)]
struct MemoryState {
    brokers: Vec<BrokerInfo>,
    controller_id: i32,
    topics: BTreeMap<String, MemoryTopic>,
    groups: BTreeMap<String, MemoryGroup>,
}

impl MemoryState {
    fn partition(&self, topic: &str, partition: i32) -> KafkaResult<&MemoryPartition> {
        let entry = self
            .topics
            .get(topic)
            .ok_or_else(|| KafkaError::topic_not_found(topic))?;
        entry
            .partitions
            .iter()
            .find(|p| p.metadata.id == partition)
            .ok_or_else(|| KafkaError::topic(&format!("Unknown partition {} for topic {}", partition, topic)))
    }

    fn partition_mut(&mut self, topic: &str, partition: i32) -> KafkaResult<&mut MemoryPartition> {
        let entry = self
            .topics
            .get_mut(topic)
            .ok_or_else(|| KafkaError::topic_not_found(topic))?;
        entry
            .partitions
            .iter_mut()
            .find(|p| p.metadata.id == partition)
            .ok_or_else(|| KafkaError::topic(&format!("Unknown partition {} for topic {}", partition, topic)))
    }
}

/// Cluster kept entirely in memory
#[derive(Debug, Clone)]
pub struct InMemoryAdmin {
    state: Arc<RwLock<MemoryState>>,
    round_robin: Arc<AtomicUsize>,
}

impl Default for InMemoryAdmin {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAdmin {
    /// Single broker cluster at localhost:9092
    pub fn new() -> Self {
        Self::with_brokers(vec![BrokerInfo {
            id: 1,
            host: "localhost".to_string(),
            port: 9092,
        }])
    }

    /// Cluster with one broker per parseable `host:port` entry
    pub fn from_brokers(brokers: &[String]) -> Self {
        let brokers: Vec<BrokerInfo> = brokers
            .iter()
            .filter_map(|b| split_host_port(b))
            .enumerate()
            .map(|(i, (host, port))| BrokerInfo {
                id: i as i32 + 1,
                host: host.to_string(),
                port,
            })
            .collect();

        if brokers.is_empty() {
            Self::new()
        } else {
            Self::with_brokers(brokers)
        }
    }

    pub fn with_brokers(brokers: Vec<BrokerInfo>) -> Self {
        let controller_id = brokers.first().map(|b| b.id).unwrap_or(-1);
        Self {
            state: Arc::new(RwLock::new(MemoryState {
                brokers,
                controller_id,
                ..MemoryState::default()
            })),
            round_robin: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Override the in-sync replica set of a partition
    pub async fn set_isr(&self, topic: &str, partition: i32, isr: Vec<i32>) -> KafkaResult<()> {
        let mut state = self.state.write().await;
        let partition = state.partition_mut(topic, partition)?;
        partition.metadata.offline_replicas = partition
            .metadata
            .replicas
            .iter()
            .filter(|r| !isr.contains(r))
            .copied()
            .collect();
        partition.metadata.isr = isr;
        Ok(())
    }

    /// Insert or replace a consumer group description
    pub async fn upsert_group(&self, description: GroupDescription) {
        let mut state = self.state.write().await;
        let group_id = description.group_id.clone();
        match state.groups.get_mut(&group_id) {
            Some(group) => group.description = description,
            None => {
                state.groups.insert(
                    group_id,
                    MemoryGroup {
                        description,
                        offsets: CommittedOffsets::new(),
                    },
                );
            }
        }
    }

    /// Commit an offset for a group, creating an empty group when needed
    pub async fn commit_offset(&self, group_id: &str, topic: &str, partition: i32, offset: i64) {
        let mut state = self.state.write().await;
        let group = state.groups.entry(group_id.to_string()).or_insert_with(|| MemoryGroup {
            description: GroupDescription {
                group_id: group_id.to_string(),
                state: crate::constants::GROUP_STATE_EMPTY.to_string(),
                protocol: String::new(),
                protocol_type: "consumer".to_string(),
                members: Vec::new(),
            },
            offsets: CommittedOffsets::new(),
        });
        group
            .offsets
            .entry(topic.to_string())
            .or_default()
            .insert(partition, offset);
    }

    /// Append a record with an explicit timestamp
    pub async fn append(
        &self,
        topic: &str,
        partition: i32,
        key: Option<Vec<u8>>,
        value: Vec<u8>,
        timestamp: DateTime<Utc>,
    ) -> KafkaResult<i64> {
        let mut state = self.state.write().await;
        let target = state.partition_mut(topic, partition)?;
        let offset = target.high_watermark();
        target.records.push(RawMessage {
            topic: topic.to_string(),
            partition,
            offset,
            key,
            value: Some(value),
            timestamp: Some(timestamp),
        });
        Ok(offset)
    }

    fn pick_partition(&self, key: Option<&[u8]>, count: usize) -> i32 {
        match key {
            Some(key) => {
                let mut hasher = DefaultHasher::new();
                key.hash(&mut hasher);
                (hasher.finish() % count as u64) as i32
            }
            None => (self.round_robin.fetch_add(1, Ordering::Relaxed) % count) as i32,
        }
    }
}

fn default_topic_configs() -> BTreeMap<String, String> {
    [
        ("cleanup.policy", "delete"),
        ("compression.type", "producer"),
        ("max.message.bytes", "1048588"),
        ("min.insync.replicas", "1"),
        ("retention.bytes", "-1"),
        ("retention.ms", "604800000"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[async_trait]
impl ClusterAdmin for InMemoryAdmin {
    fn backend(&self) -> AdminBackend {
        AdminBackend::Memory
    }

    async fn metadata(&self) -> KafkaResult<ClusterMetadata> {
        let state = self.state.read().await;
        Ok(ClusterMetadata {
            brokers: state.brokers.clone(),
            topics: state
                .topics
                .iter()
                .map(|(name, topic)| TopicMetadata {
                    name: name.clone(),
                    partitions: topic.partitions.iter().map(|p| p.metadata.clone()).collect(),
                })
                .collect(),
            controller_id: state.controller_id,
        })
    }

    async fn topic_configs(&self, topic: &str) -> KafkaResult<BTreeMap<String, String>> {
        let state = self.state.read().await;
        state
            .topics
            .get(topic)
            .map(|t| t.configs.clone())
            .ok_or_else(|| KafkaError::topic_not_found(topic))
    }

    async fn create_topic(&self, name: &str, partitions: i32, replication_factor: i32) -> KafkaResult<()> {
        if partitions <= 0 {
            return Err(KafkaError::validation("Partitions must be greater than 0"));
        }
        if replication_factor <= 0 {
            return Err(KafkaError::validation("Replicas must be greater than 0"));
        }

        let mut state = self.state.write().await;
        if state.topics.contains_key(name) {
            return Err(KafkaError::topic(&format!("Topic '{}' already exists", name)));
        }

        let broker_ids: Vec<i32> = state.brokers.iter().map(|b| b.id).collect();
        if replication_factor as usize > broker_ids.len() {
            return Err(KafkaError::topic(&format!(
                "Replication factor: {} larger than available brokers: {}",
                replication_factor,
                broker_ids.len()
            )));
        }

        let partitions = (0..partitions)
            .map(|id| {
                let replicas: Vec<i32> = (0..replication_factor as usize)
                    .map(|r| broker_ids[(id as usize + r) % broker_ids.len()])
                    .collect();
                MemoryPartition {
                    metadata: PartitionMetadata {
                        id,
                        leader: replicas[0],
                        isr: replicas.clone(),
                        replicas,
                        offline_replicas: Vec::new(),
                    },
                    log_start: 0,
                    records: Vec::new(),
                }
            })
            .collect();

        state.topics.insert(
            name.to_string(),
            MemoryTopic {
                partitions,
                configs: default_topic_configs(),
            },
        );

        info!("Created topic: {}", name);
        Ok(())
    }

    async fn delete_topic(&self, name: &str) -> KafkaResult<()> {
        let mut state = self.state.write().await;
        if state.topics.remove(name).is_none() {
            return Err(KafkaError::topic_not_found(name));
        }
        for group in state.groups.values_mut() {
            group.offsets.remove(name);
        }

        info!("Deleted topic: {}", name);
        Ok(())
    }

    async fn watermarks(&self, topic: &str, partition: i32) -> KafkaResult<(i64, i64)> {
        let state = self.state.read().await;
        let partition = state.partition(topic, partition)?;
        Ok((partition.log_start, partition.high_watermark()))
    }

    async fn list_groups(&self) -> KafkaResult<Vec<GroupDescription>> {
        let state = self.state.read().await;
        Ok(state.groups.values().map(|g| g.description.clone()).collect())
    }

    async fn committed_offsets(&self, group_id: &str) -> KafkaResult<CommittedOffsets> {
        let state = self.state.read().await;
        Ok(state
            .groups
            .get(group_id)
            .map(|g| g.offsets.clone())
            .unwrap_or_default())
    }

    async fn fetch_messages(
        &self,
        topic: &str,
        partition: i32,
        start_offset: i64,
        max: usize,
        _timeout: Duration,
    ) -> KafkaResult<Vec<RawMessage>> {
        let state = self.state.read().await;
        let partition = state.partition(topic, partition)?;
        let skip = (start_offset.max(partition.log_start) - partition.log_start) as usize;
        Ok(partition.records.iter().skip(skip).take(max).cloned().collect())
    }

    async fn produce(
        &self,
        topic: &str,
        partition: Option<i32>,
        key: Option<Vec<u8>>,
        value: Vec<u8>,
    ) -> KafkaResult<(i32, i64)> {
        let partition = match partition {
            Some(partition) => partition,
            None => {
                let count = {
                    let state = self.state.read().await;
                    state
                        .topics
                        .get(topic)
                        .map(|t| t.partitions.len())
                        .ok_or_else(|| KafkaError::topic_not_found(topic))?
                };
                self.pick_partition(key.as_deref(), count.max(1))
            }
        };

        let offset = self.append(topic, partition, key, value, Utc::now()).await?;
        debug!("Produced to {}[{}] at offset {}", topic, partition, offset);
        Ok((partition, offset))
    }
}
