//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Topic listing and administration

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::admin::PartitionMetadata;
use crate::cluster::ClusterRegistry;
use crate::constants::CONSUMER_OFFSETS_TOPIC;
use crate::error::{KafkaError, KafkaResult};

static TOPIC_NAME: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._-]{1,249}$").ok());

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub name: String,
    #[serde(rename = "partitionCount")]
    pub partition_count: usize,
    #[serde(rename = "replicationFactor")]
    pub replication_factor: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionDetails {
    pub id: i32,
    pub leader: i32,
    pub replicas: Vec<i32>,
    pub isr: Vec<i32>,
    #[serde(rename = "offlineReplicas")]
    pub offline_replicas: Vec<i32>,
}

impl From<&PartitionMetadata> for PartitionDetails {
    fn from(p: &PartitionMetadata) -> Self {
        Self {
            id: p.id,
            leader: p.leader,
            replicas: p.replicas.clone(),
            isr: p.isr.clone(),
            offline_replicas: p.offline_replicas.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicDetails {
    pub name: String,
    pub partitions: Vec<PartitionDetails>,
    pub configs: BTreeMap<String, String>,
    #[serde(rename = "replicationFactor")]
    pub replication_factor: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateTopicRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub partitions: i32,
    #[serde(default)]
    pub replicas: i32,
}

impl CreateTopicRequest {
    pub fn validate(&self) -> KafkaResult<()> {
        if self.name.trim().is_empty() {
            return Err(KafkaError::validation("Topic name is required"));
        }
        if self.partitions <= 0 {
            return Err(KafkaError::validation("Partitions must be greater than 0"));
        }
        if self.replicas <= 0 {
            return Err(KafkaError::validation("Replicas must be greater than 0"));
        }
        if !is_valid_topic_name(&self.name) {
            return Err(KafkaError::validation(
                "Topic name may only contain letters, digits, '.', '_' and '-' (max 249 characters)",
            ));
        }
        Ok(())
    }
}

pub fn is_valid_topic_name(name: &str) -> bool {
    match TOPIC_NAME.as_ref() {
        Some(re) => re.is_match(name) && name != "." && name != "..",
        None => false,
    }
}

#[derive(Debug, Clone)]
pub struct TopicService {
    registry: ClusterRegistry,
}

impl TopicService {
    pub fn new(registry: ClusterRegistry) -> Self {
        Self { registry }
    }

    /// Topics of a cluster, sorted by name
    pub async fn get_topics(&self, cluster: &str) -> KafkaResult<Vec<TopicSummary>> {
        let admin = self.registry.admin(cluster).await?;
        let metadata = admin.metadata().await?;

        let mut topics: Vec<TopicSummary> = metadata
            .topics
            .iter()
            .map(|t| TopicSummary {
                name: t.name.clone(),
                partition_count: t.partitions.len(),
                replication_factor: t.replication_factor(),
            })
            .collect();
        topics.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(topics)
    }

    /// Partition layout and configuration of one topic
    pub async fn get_topic_details(&self, cluster: &str, topic: &str) -> KafkaResult<TopicDetails> {
        let admin = self.registry.admin(cluster).await?;
        let metadata = admin.metadata().await?;
        let found = metadata
            .topic(topic)
            .ok_or_else(|| KafkaError::topic_not_found(topic))?;

        let configs = match admin.topic_configs(topic).await {
            Ok(configs) => configs,
            Err(e) => {
                warn!("Failed to describe configs for topic {}: {}", topic, e);
                BTreeMap::new()
            }
        };

        let mut partitions: Vec<PartitionDetails> = found.partitions.iter().map(PartitionDetails::from).collect();
        partitions.sort_by_key(|p| p.id);

        Ok(TopicDetails {
            name: found.name.clone(),
            replication_factor: found.replication_factor(),
            partitions,
            configs,
        })
    }

    pub async fn create_topic(&self, cluster: &str, request: &CreateTopicRequest) -> KafkaResult<()> {
        request.validate()?;
        let admin = self.registry.admin(cluster).await?;
        admin
            .create_topic(&request.name, request.partitions, request.replicas)
            .await?;

        info!(
            "Created topic {} on cluster {} ({} partitions, rf {})",
            request.name, cluster, request.partitions, request.replicas
        );
        Ok(())
    }

    pub async fn delete_topic(&self, cluster: &str, topic: &str) -> KafkaResult<()> {
        if topic == CONSUMER_OFFSETS_TOPIC {
            return Err(KafkaError::validation("Cannot delete system topic"));
        }

        let admin = self.registry.admin(cluster).await?;
        admin.delete_topic(topic).await?;

        info!("Deleted topic {} on cluster {}", topic, cluster);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::admin::{ClusterAdmin, InMemoryAdmin};
    use crate::services::testing::registry_with;

    fn request(name: &str, partitions: i32, replicas: i32) -> CreateTopicRequest {
        CreateTopicRequest {
            name: name.to_string(),
            partitions,
            replicas,
        }
    }

    #[tokio::test]
    async fn test_topics_sorted_with_replication_factor() {
        let admin = Arc::new(InMemoryAdmin::from_brokers(&[
            "a:9092".to_string(),
            "b:9092".to_string(),
        ]));
        admin.create_topic("zeta", 1, 1).await.unwrap();
        admin.create_topic("alpha", 3, 2).await.unwrap();
        let service = TopicService::new(registry_with(admin).await);

        let topics = service.get_topics("local").await.unwrap();
        assert_eq!(
            topics,
            vec![
                TopicSummary {
                    name: "alpha".to_string(),
                    partition_count: 3,
                    replication_factor: 2
                },
                TopicSummary {
                    name: "zeta".to_string(),
                    partition_count: 1,
                    replication_factor: 1
                },
            ]
        );

        let json = serde_json::to_value(&topics[0]).unwrap();
        assert_eq!(json["partitionCount"], 3);
        assert_eq!(json["replicationFactor"], 2);
    }

    #[tokio::test]
    async fn test_empty_cluster_and_unknown_cluster() {
        let service = TopicService::new(registry_with(Arc::new(InMemoryAdmin::new())).await);
        assert!(service.get_topics("local").await.unwrap().is_empty());
        assert!(matches!(
            service.get_topics("other").await,
            Err(KafkaError::ClusterNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_topic_details() {
        let admin = Arc::new(InMemoryAdmin::new());
        admin.create_topic("orders", 2, 1).await.unwrap();
        let service = TopicService::new(registry_with(admin).await);

        let details = service.get_topic_details("local", "orders").await.unwrap();
        assert_eq!(details.partitions.len(), 2);
        assert_eq!(details.partitions[1].id, 1);
        assert_eq!(details.replication_factor, 1);
        assert_eq!(details.configs.get("cleanup.policy").map(String::as_str), Some("delete"));

        assert!(matches!(
            service.get_topic_details("local", "missing").await,
            Err(KafkaError::TopicNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_topic_validation() {
        let service = TopicService::new(registry_with(Arc::new(InMemoryAdmin::new())).await);

        let cases = [
            (request("", 1, 1), "Topic name is required"),
            (request("t", 0, 1), "Partitions must be greater than 0"),
            (request("t", 1, 0), "Replicas must be greater than 0"),
        ];
        for (req, expected) in cases {
            let err = service.create_topic("local", &req).await.unwrap_err();
            assert_eq!(err.to_string(), expected);
        }

        assert!(service
            .create_topic("local", &request("bad name!", 1, 1))
            .await
            .is_err());

        service.create_topic("local", &request("orders.v1", 2, 1)).await.unwrap();
        assert_eq!(service.get_topics("local").await.unwrap()[0].partition_count, 2);
    }

    #[tokio::test]
    async fn test_delete_topic() {
        let admin = Arc::new(InMemoryAdmin::new());
        admin.create_topic("orders", 1, 1).await.unwrap();
        let service = TopicService::new(registry_with(admin).await);

        let err = service.delete_topic("local", "__consumer_offsets").await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot delete system topic");

        service.delete_topic("local", "orders").await.unwrap();
        assert!(service.get_topics("local").await.unwrap().is_empty());
        assert!(service.delete_topic("local", "orders").await.is_err());
    }

    #[test]
    fn test_topic_name_rules() {
        assert!(is_valid_topic_name("orders-v1.events_2"));
        assert!(!is_valid_topic_name(".."));
        assert!(!is_valid_topic_name("with space"));
        assert!(!is_valid_topic_name(&"x".repeat(250)));
    }
}
