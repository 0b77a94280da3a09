//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Broker listing

use serde::{Deserialize, Serialize};

use crate::cluster::ClusterRegistry;
use crate::error::{KafkaError, KafkaResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Broker {
    pub id: i32,
    pub addr: String,
}

#[derive(Debug, Clone)]
pub struct BrokerService {
    registry: ClusterRegistry,
}

impl BrokerService {
    pub fn new(registry: ClusterRegistry) -> Self {
        Self { registry }
    }

    /// Brokers of a cluster, sorted by id
    pub async fn get_brokers(&self, cluster: &str) -> KafkaResult<Vec<Broker>> {
        let admin = self.registry.admin(cluster).await?;
        let metadata = admin
            .metadata()
            .await
            .map_err(|e| KafkaError::cluster(&format!("failed to describe cluster {}: {}", cluster, e)))?;

        if metadata.brokers.is_empty() {
            return Err(KafkaError::cluster(&format!("no brokers found for cluster {}", cluster)));
        }

        let mut brokers: Vec<Broker> = metadata
            .brokers
            .iter()
            .map(|b| Broker {
                id: b.id,
                addr: b.addr(),
            })
            .collect();
        brokers.sort_by_key(|b| b.id);
        Ok(brokers)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::admin::{BrokerInfo, InMemoryAdmin};
    use crate::services::testing::registry_with;

    #[tokio::test]
    async fn test_brokers_sorted_by_id() {
        let admin = InMemoryAdmin::with_brokers(vec![
            BrokerInfo {
                id: 3,
                host: "kafka-3".to_string(),
                port: 9092,
            },
            BrokerInfo {
                id: 1,
                host: "kafka-1".to_string(),
                port: 9093,
            },
        ]);
        let service = BrokerService::new(registry_with(Arc::new(admin)).await);

        let brokers = service.get_brokers("local").await.unwrap();
        assert_eq!(
            brokers,
            vec![
                Broker {
                    id: 1,
                    addr: "kafka-1:9093".to_string()
                },
                Broker {
                    id: 3,
                    addr: "kafka-3:9092".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_no_brokers() {
        let service = BrokerService::new(registry_with(Arc::new(InMemoryAdmin::with_brokers(Vec::new()))).await);
        let err = service.get_brokers("local").await.unwrap_err();
        assert_eq!(err.to_string(), "no brokers found for cluster local");
    }
}
