//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Cluster, broker, topic and consumer group metrics
//!
//! Figures are derived from metadata, watermarks and committed offsets on
//! each call; nothing is sampled or cached.

use std::collections::BTreeMap;

use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::admin::{ClusterAdmin, GroupDescription};
use crate::cluster::ClusterRegistry;
use crate::constants::{is_rebalancing, GROUP_STATE_STABLE, NOMINAL_MESSAGE_SIZE};
use crate::error::KafkaResult;

use super::consumer_group::assigned_topics;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerGroupLag {
    pub group_id: String,
    pub topic: String,
    pub total_lag: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterHealth {
    pub total_brokers: usize,
    pub online_brokers: usize,
    pub total_topics: usize,
    pub total_partitions: usize,
    pub under_replicated: usize,
    pub offline_replicas: usize,
    pub controller_id: i32,
    pub is_healthy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerMetrics {
    pub id: i32,
    pub host: String,
    pub port: u16,
    pub is_controller: bool,
    pub is_online: bool,
    pub leader_count: usize,
    pub replica_count: usize,
    pub offline_replicas: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMetrics {
    pub name: String,
    pub partition_count: usize,
    pub replica_count: usize,
    pub total_messages: i64,
    pub under_replicated: usize,
    pub offline_replicas: usize,
    pub avg_message_size: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerGroupMetrics {
    pub group_id: String,
    pub state: String,
    pub member_count: usize,
    pub topic_count: usize,
    pub total_lag: i64,
    pub avg_lag: i64,
    pub max_lag: i64,
    pub is_stable: bool,
    pub last_rebalance: String,
}

/// Per group and topic lag for the given groups
///
/// Partitions without a committed offset are skipped and only topics with a
/// positive total are reported. Groups whose offsets cannot be read are
/// left out.
pub(crate) async fn consumer_lag_report(
    admin: &dyn ClusterAdmin,
    groups: &[GroupDescription],
) -> KafkaResult<Vec<ConsumerGroupLag>> {
    let mut report = Vec::new();

    for group in groups {
        let offsets = match admin.committed_offsets(&group.group_id).await {
            Ok(offsets) => offsets,
            Err(e) => {
                warn!("Could not get offsets for group {}: {}", group.group_id, e);
                continue;
            }
        };

        for (topic, partitions) in offsets {
            let mut total_lag = 0i64;
            for (partition, committed) in partitions {
                if committed < 0 {
                    continue;
                }
                let high = match admin.watermarks(&topic, partition).await {
                    Ok((_, high)) => high,
                    Err(e) => {
                        debug!("Skipping {}[{}] without high watermark: {}", topic, partition, e);
                        continue;
                    }
                };
                total_lag += (high - committed).max(0);
            }

            if total_lag > 0 {
                report.push(ConsumerGroupLag {
                    group_id: group.group_id.clone(),
                    topic,
                    total_lag,
                });
            }
        }
    }

    Ok(report)
}

#[derive(Debug, Clone)]
pub struct MetricsService {
    registry: ClusterRegistry,
}

impl MetricsService {
    pub fn new(registry: ClusterRegistry) -> Self {
        Self { registry }
    }

    pub async fn get_consumer_groups_lag(&self, cluster: &str) -> KafkaResult<Vec<ConsumerGroupLag>> {
        let admin = self.registry.admin(cluster).await?;
        let groups = admin.list_groups().await?;
        consumer_lag_report(admin.as_ref(), &groups).await
    }

    pub async fn get_cluster_health(&self, cluster: &str) -> KafkaResult<ClusterHealth> {
        let admin = self.registry.admin(cluster).await?;
        let metadata = admin.metadata().await?;

        let total_brokers = metadata.brokers.len();
        // Metadata only lists live brokers
        let online_brokers = total_brokers;

        let mut total_partitions = 0;
        let mut under_replicated = 0;
        let mut offline_replicas = 0;
        for partition in metadata.topics.iter().flat_map(|t| t.partitions.iter()) {
            total_partitions += 1;
            if partition.replicas.len() != partition.isr.len() {
                under_replicated += 1;
            }
            offline_replicas += partition.out_of_sync();
        }

        Ok(ClusterHealth {
            total_brokers,
            online_brokers,
            total_topics: metadata.topics.len(),
            total_partitions,
            under_replicated,
            offline_replicas,
            controller_id: metadata.controller_id,
            is_healthy: online_brokers == total_brokers && under_replicated == 0 && offline_replicas == 0,
        })
    }

    pub async fn get_broker_metrics(&self, cluster: &str) -> KafkaResult<Vec<BrokerMetrics>> {
        let admin = self.registry.admin(cluster).await?;
        let metadata = admin.metadata().await?;

        let mut brokers: BTreeMap<i32, BrokerMetrics> = metadata
            .brokers
            .iter()
            .map(|b| {
                (
                    b.id,
                    BrokerMetrics {
                        id: b.id,
                        host: b.host.clone(),
                        port: b.port,
                        is_controller: b.id == metadata.controller_id,
                        is_online: true,
                        leader_count: 0,
                        replica_count: 0,
                        offline_replicas: 0,
                    },
                )
            })
            .collect();

        for partition in metadata.topics.iter().flat_map(|t| t.partitions.iter()) {
            if let Some(leader) = brokers.get_mut(&partition.leader) {
                leader.leader_count += 1;
                leader.offline_replicas += partition.out_of_sync();
            }
            for replica in &partition.replicas {
                if let Some(broker) = brokers.get_mut(replica) {
                    broker.replica_count += 1;
                }
            }
        }

        Ok(brokers.into_values().collect())
    }

    pub async fn get_topic_metrics(&self, cluster: &str) -> KafkaResult<Vec<TopicMetrics>> {
        let admin = self.registry.admin(cluster).await?;
        let metadata = admin.metadata().await?;

        let mut metrics = Vec::with_capacity(metadata.topics.len());
        for topic in &metadata.topics {
            let mut total_messages = 0i64;
            let mut under_replicated = 0;
            let mut offline_replicas = 0;

            let watermarks = join_all(
                topic
                    .partitions
                    .iter()
                    .map(|partition| admin.watermarks(&topic.name, partition.id)),
            )
            .await;

            for (partition, watermark) in topic.partitions.iter().zip(watermarks) {
                match watermark {
                    Ok((_, high)) => total_messages += high,
                    Err(e) => debug!("No high watermark for {}[{}]: {}", topic.name, partition.id, e),
                }
                if partition.replicas.len() != partition.isr.len() {
                    under_replicated += 1;
                }
                offline_replicas += partition.out_of_sync();
            }

            metrics.push(TopicMetrics {
                name: topic.name.clone(),
                partition_count: topic.partitions.len(),
                replica_count: topic.replication_factor(),
                total_messages,
                under_replicated,
                offline_replicas,
                avg_message_size: if total_messages > 0 { NOMINAL_MESSAGE_SIZE } else { 0 },
            });
        }

        metrics.sort_by(|a, b| b.total_messages.cmp(&a.total_messages).then_with(|| a.name.cmp(&b.name)));
        Ok(metrics)
    }

    pub async fn get_consumer_group_metrics(&self, cluster: &str) -> KafkaResult<Vec<ConsumerGroupMetrics>> {
        let admin = self.registry.admin(cluster).await?;
        let groups = admin.list_groups().await?;
        let report = consumer_lag_report(admin.as_ref(), &groups).await?;
        let now = Utc::now().to_rfc3339();

        let mut metrics: Vec<ConsumerGroupMetrics> = groups
            .iter()
            .map(|group| {
                let lags: Vec<i64> = report
                    .iter()
                    .filter(|l| l.group_id == group.group_id)
                    .map(|l| l.total_lag)
                    .collect();
                let total_lag: i64 = lags.iter().sum();
                let max_lag = lags.iter().copied().max().unwrap_or(0);
                let avg_lag = if lags.is_empty() { 0 } else { total_lag / lags.len() as i64 };

                if is_rebalancing(&group.state) {
                    debug!("Consumer group {} is rebalancing ({})", group.group_id, group.state);
                }

                ConsumerGroupMetrics {
                    group_id: group.group_id.clone(),
                    state: group.state.clone(),
                    member_count: group.members.len(),
                    topic_count: assigned_topics(group).len(),
                    total_lag,
                    avg_lag,
                    max_lag,
                    is_stable: group.state == GROUP_STATE_STABLE,
                    last_rebalance: now.clone(),
                }
            })
            .collect();

        metrics.sort_by(|a, b| b.total_lag.cmp(&a.total_lag).then_with(|| a.group_id.cmp(&b.group_id)));
        Ok(metrics)
    }
}
