//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! librdkafka backend
//!
//! Metadata, watermark, group and offset calls on `BaseConsumer` are blocking
//! and run on the blocking pool. Topic administration and produce use the
//! async `AdminClient` and `FutureProducer`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, ResourceSpecifier, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{BaseConsumer, Consumer};
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::topic_partition_list::{Offset, TopicPartitionList};
use tracing::{debug, info, warn};

use super::{
    BrokerInfo, ClusterAdmin, ClusterMetadata, CommittedOffsets, GroupDescription, MemberDescription,
    PartitionMetadata, RawMessage, TopicMetadata,
};
use crate::config::{AdminBackend, ClusterConfig, KafkaConfig};
use crate::error::{KafkaError, KafkaResult};

/// Cluster admin over librdkafka
pub struct RdKafkaAdmin {
    name: String,
    client_config: ClientConfig,
    admin: AdminClient<DefaultClientContext>,
    consumer: Arc<BaseConsumer>,
    producer: FutureProducer,
    request_timeout: Duration,
    message_timeout: Duration,
}

impl RdKafkaAdmin {
    /// Create clients for a cluster; no connection is made until first use
    pub fn new(cluster: &ClusterConfig, config: &KafkaConfig) -> KafkaResult<Self> {
        let mut client_config = ClientConfig::new();
        client_config
            .set("bootstrap.servers", cluster.bootstrap_servers())
            .set("client.id", &config.client_id)
            .set("socket.timeout.ms", config.request_timeout_ms.to_string());
        for (key, value) in &cluster.properties {
            client_config.set(key, value);
        }

        let admin: AdminClient<DefaultClientContext> = client_config.create()?;
        let consumer: BaseConsumer = client_config.create()?;
        let producer: FutureProducer = client_config
            .clone()
            .set("message.timeout.ms", config.message_timeout_ms.to_string())
            .create()?;

        info!("Created rdkafka admin for cluster: {}", cluster.name);

        Ok(Self {
            name: cluster.name.clone(),
            client_config,
            admin,
            consumer: Arc::new(consumer),
            producer,
            request_timeout: config.request_timeout(),
            message_timeout: config.message_timeout(),
        })
    }

    fn admin_options(&self) -> AdminOptions {
        AdminOptions::new()
            .operation_timeout(Some(self.request_timeout))
            .request_timeout(Some(self.request_timeout))
    }

    /// Consumer bound to a group id, without auto commit
    fn group_consumer(&self, group_id: &str) -> KafkaResult<BaseConsumer> {
        Ok(self
            .client_config
            .clone()
            .set("group.id", group_id)
            .set("enable.auto.commit", "false")
            .set("enable.partition.eof", "false")
            .create()?)
    }
}

async fn blocking<T, F>(f: F) -> KafkaResult<T>
where
    F: FnOnce() -> KafkaResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| KafkaError::internal(&format!("Blocking task failed: {}", e)))?
}

#[async_trait]
impl ClusterAdmin for RdKafkaAdmin {
    fn backend(&self) -> AdminBackend {
        AdminBackend::Rdkafka
    }

    async fn metadata(&self) -> KafkaResult<ClusterMetadata> {
        let consumer = self.consumer.clone();
        let timeout = self.request_timeout;
        let name = self.name.clone();

        blocking(move || {
            let metadata = consumer.fetch_metadata(None, timeout)?;
            debug!(
                "Fetched metadata for {} from broker {}",
                name,
                metadata.orig_broker_id()
            );

            let brokers = metadata
                .brokers()
                .iter()
                .map(|b| BrokerInfo {
                    id: b.id(),
                    host: b.host().to_string(),
                    port: u16::try_from(b.port()).unwrap_or_default(),
                })
                .collect();

            let topics = metadata
                .topics()
                .iter()
                .map(|t| TopicMetadata {
                    name: t.name().to_string(),
                    partitions: t
                        .partitions()
                        .iter()
                        .map(|p| {
                            let replicas = p.replicas().to_vec();
                            let isr = p.isr().to_vec();
                            let offline_replicas =
                                replicas.iter().filter(|r| !isr.contains(r)).copied().collect();
                            PartitionMetadata {
                                id: p.id(),
                                leader: p.leader(),
                                replicas,
                                isr,
                                offline_replicas,
                            }
                        })
                        .collect(),
                })
                .collect();

            Ok(ClusterMetadata {
                brokers,
                topics,
                controller_id: -1,
            })
        })
        .await
    }

    async fn topic_configs(&self, topic: &str) -> KafkaResult<BTreeMap<String, String>> {
        let results = self
            .admin
            .describe_configs(&[ResourceSpecifier::Topic(topic)], &self.admin_options())
            .await?;

        let mut configs = BTreeMap::new();
        for result in results {
            let resource = result
                .map_err(|code| KafkaError::topic(&format!("Failed to describe configs: {}", code)))?;
            for entry in resource.entries {
                if let Some(value) = entry.value {
                    configs.insert(entry.name, value);
                }
            }
        }
        Ok(configs)
    }

    async fn create_topic(&self, name: &str, partitions: i32, replication_factor: i32) -> KafkaResult<()> {
        let topic = NewTopic::new(name, partitions, TopicReplication::Fixed(replication_factor));
        let results = self.admin.create_topics(&[topic], &self.admin_options()).await?;

        for result in results {
            if let Err((topic, code)) = result {
                return Err(KafkaError::topic(&format!("Failed to create topic {}: {}", topic, code)));
            }
        }

        info!("Created topic {} on cluster {}", name, self.name);
        Ok(())
    }

    async fn delete_topic(&self, name: &str) -> KafkaResult<()> {
        let results = self.admin.delete_topics(&[name], &self.admin_options()).await?;

        for result in results {
            if let Err((topic, code)) = result {
                return Err(KafkaError::topic(&format!("Failed to delete topic {}: {}", topic, code)));
            }
        }

        info!("Deleted topic {} on cluster {}", name, self.name);
        Ok(())
    }

    async fn watermarks(&self, topic: &str, partition: i32) -> KafkaResult<(i64, i64)> {
        let consumer = self.consumer.clone();
        let timeout = self.request_timeout;
        let topic = topic.to_string();

        blocking(move || Ok(consumer.fetch_watermarks(&topic, partition, timeout)?)).await
    }

    async fn list_groups(&self) -> KafkaResult<Vec<GroupDescription>> {
        let consumer = self.consumer.clone();
        let timeout = self.request_timeout;

        blocking(move || {
            let groups = consumer.fetch_group_list(None, timeout)?;
            Ok(groups
                .groups()
                .iter()
                .map(|g| GroupDescription {
                    group_id: g.name().to_string(),
                    state: g.state().to_string(),
                    protocol: g.protocol().to_string(),
                    protocol_type: g.protocol_type().to_string(),
                    members: g
                        .members()
                        .iter()
                        .map(|m| MemberDescription {
                            member_id: m.id().to_string(),
                            client_id: m.client_id().to_string(),
                            client_host: m.client_host().to_string(),
                            assignment: m.assignment().map(|a| a.to_vec()).unwrap_or_default(),
                        })
                        .collect(),
                })
                .collect())
        })
        .await
    }

    async fn committed_offsets(&self, group_id: &str) -> KafkaResult<CommittedOffsets> {
        let metadata = self.metadata().await?;
        let consumer = self.group_consumer(group_id)?;
        let timeout = self.request_timeout;

        blocking(move || {
            let mut tpl = TopicPartitionList::new();
            for topic in &metadata.topics {
                for partition in &topic.partitions {
                    tpl.add_partition(&topic.name, partition.id);
                }
            }
            if tpl.count() == 0 {
                return Ok(CommittedOffsets::new());
            }

            let committed = consumer.committed_offsets(tpl, timeout)?;
            let mut offsets = CommittedOffsets::new();
            for elem in committed.elements() {
                let offset = match elem.offset() {
                    Offset::Offset(n) => n,
                    _ => -1,
                };
                offsets
                    .entry(elem.topic().to_string())
                    .or_default()
                    .insert(elem.partition(), offset);
            }
            Ok(offsets)
        })
        .await
    }

    async fn fetch_messages(
        &self,
        topic: &str,
        partition: i32,
        start_offset: i64,
        max: usize,
        timeout: Duration,
    ) -> KafkaResult<Vec<RawMessage>> {
        let (low, high) = self.watermarks(topic, partition).await?;
        let start = start_offset.max(low);
        if start >= high || max == 0 {
            return Ok(Vec::new());
        }

        let consumer = self.group_consumer(&format!("{}-browser", self.name))?;
        let topic = topic.to_string();

        blocking(move || {
            let mut tpl = TopicPartitionList::new();
            tpl.add_partition_offset(&topic, partition, Offset::Offset(start))?;
            consumer.assign(&tpl)?;

            let deadline = Instant::now() + timeout;
            let mut records = Vec::new();
            while records.len() < max && Instant::now() < deadline {
                let message = match consumer.poll(Duration::from_millis(100)) {
                    Some(Ok(message)) => message,
                    Some(Err(e)) => {
                        warn!("Error while reading {}[{}]: {}", topic, partition, e);
                        break;
                    }
                    None => continue,
                };

                records.push(RawMessage {
                    topic: message.topic().to_string(),
                    partition: message.partition(),
                    offset: message.offset(),
                    key: message.key().map(|k| k.to_vec()),
                    value: message.payload().map(|v| v.to_vec()),
                    timestamp: message
                        .timestamp()
                        .to_millis()
                        .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
                });

                if message.offset() + 1 >= high {
                    break;
                }
            }
            Ok(records)
        })
        .await
    }

    async fn produce(
        &self,
        topic: &str,
        partition: Option<i32>,
        key: Option<Vec<u8>>,
        value: Vec<u8>,
    ) -> KafkaResult<(i32, i64)> {
        let mut record = FutureRecord::<[u8], [u8]>::to(topic).payload(value.as_slice());
        if let Some(key) = key.as_deref() {
            record = record.key(key);
        }
        if let Some(partition) = partition {
            record = record.partition(partition);
        }

        self.producer
            .send(record, self.message_timeout)
            .await
            .map_err(|(e, _)| KafkaError::producer(&e.to_string()))
    }
}
