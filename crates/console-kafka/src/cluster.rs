//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Cluster registry
//!
//! Named clusters and the admin backend serving each of them. Clusters come
//! from configuration at startup and can be added or removed at runtime.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::admin::{ClusterAdmin, ClusterAdminFactory};
use crate::config::{ClusterConfig, KafkaConfig};
use crate::error::{KafkaError, KafkaResult};

/// A registered cluster
#[derive(Clone)]
pub struct ClusterEntry {
    pub name: String,
    pub brokers: Vec<String>,
    pub admin: Arc<dyn ClusterAdmin>,
}

impl fmt::Debug for ClusterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterEntry")
            .field("name", &self.name)
            .field("brokers", &self.brokers)
            .field("backend", &self.admin.backend())
            .finish()
    }
}

/// Registry of clusters by name
#[derive(Clone)]
pub struct ClusterRegistry {
    clusters: Arc<RwLock<HashMap<String, ClusterEntry>>>,
    factory: Arc<dyn ClusterAdminFactory>,
}

impl fmt::Debug for ClusterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterRegistry").finish_non_exhaustive()
    }
}

impl ClusterRegistry {
    /// Create an empty registry
    pub fn new(factory: Arc<dyn ClusterAdminFactory>) -> Self {
        Self {
            clusters: Arc::new(RwLock::new(HashMap::new())),
            factory,
        }
    }

    /// Create a registry holding the configured clusters
    pub async fn from_config(config: &KafkaConfig, factory: Arc<dyn ClusterAdminFactory>) -> KafkaResult<Self> {
        let registry = Self::new(factory);
        for cluster in &config.clusters {
            registry.add_cluster(&cluster.name, cluster.brokers.clone()).await?;
        }
        Ok(registry)
    }

    /// Cluster names, sorted
    pub async fn list_clusters(&self) -> Vec<String> {
        let clusters = self.clusters.read().await;
        let mut names: Vec<String> = clusters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Validate and register a cluster, creating its admin backend
    pub async fn add_cluster(&self, name: &str, brokers: Vec<String>) -> KafkaResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(KafkaError::validation("Cluster name is required"));
        }
        validate_broker_list(&brokers)?;

        if self.clusters.read().await.contains_key(name) {
            return Err(KafkaError::cluster_exists(name));
        }

        let admin = self.factory.create(&ClusterConfig::new(name, brokers.clone()))?;
        self.register(name, brokers, admin).await
    }

    /// Register a cluster with an already built admin backend
    pub async fn register(&self, name: &str, brokers: Vec<String>, admin: Arc<dyn ClusterAdmin>) -> KafkaResult<()> {
        {
            let mut clusters = self.clusters.write().await;
            if clusters.contains_key(name) {
                return Err(KafkaError::cluster_exists(name));
            }
            clusters.insert(
                name.to_string(),
                ClusterEntry {
                    name: name.to_string(),
                    brokers: brokers.clone(),
                    admin,
                },
            );
        }

        info!("Added cluster: {} ({})", name, brokers.join(","));
        Ok(())
    }

    /// Remove a cluster
    pub async fn remove_cluster(&self, name: &str) -> KafkaResult<()> {
        {
            let mut clusters = self.clusters.write().await;
            if clusters.remove(name).is_none() {
                return Err(KafkaError::cluster_not_found(name));
            }
        }

        info!("Removed cluster: {}", name);
        Ok(())
    }

    /// Look up a cluster
    pub async fn get(&self, name: &str) -> KafkaResult<ClusterEntry> {
        let clusters = self.clusters.read().await;
        clusters.get(name).cloned().ok_or_else(|| {
            debug!("Cluster lookup failed: {}", name);
            KafkaError::cluster_not_found(name)
        })
    }

    /// Admin backend of a cluster
    pub async fn admin(&self, name: &str) -> KafkaResult<Arc<dyn ClusterAdmin>> {
        Ok(self.get(name).await?.admin)
    }

    pub async fn cluster_count(&self) -> usize {
        self.clusters.read().await.len()
    }
}

/// Split a comma separated broker list, trimming entries
pub fn parse_broker_list(brokers: &str) -> Vec<String> {
    if brokers.trim().is_empty() {
        return Vec::new();
    }
    brokers.split(',').map(|b| b.trim().to_string()).collect()
}

/// Check that every broker is a `host:port` address
pub fn validate_broker_list(brokers: &[String]) -> KafkaResult<()> {
    if brokers.is_empty() {
        return Err(KafkaError::validation("At least one broker is required"));
    }

    for broker in brokers {
        if broker.trim().is_empty() {
            return Err(KafkaError::validation("Broker URL cannot be empty"));
        }
        if split_host_port(broker).is_none() {
            return Err(KafkaError::validation(
                "Invalid broker URL format. Expected host:port",
            ));
        }
    }

    Ok(())
}

/// Split `host:port`, returning `None` when either half is unusable
pub fn split_host_port(addr: &str) -> Option<(&str, u16)> {
    let (host, port) = addr.trim().rsplit_once(':')?;
    if host.is_empty() {
        return None;
    }
    port.parse::<u16>().ok().map(|port| (host, port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::{DefaultAdminFactory, InMemoryAdmin};
    use crate::config::AdminBackend;

    fn registry() -> ClusterRegistry {
        ClusterRegistry::new(Arc::new(DefaultAdminFactory::new(KafkaConfig {
            backend: AdminBackend::Memory,
            ..KafkaConfig::default()
        })))
    }

    #[test]
    fn test_parse_broker_list() {
        assert_eq!(
            parse_broker_list("kafka-1:9092, kafka-2:9092"),
            vec!["kafka-1:9092".to_string(), "kafka-2:9092".to_string()]
        );
        assert!(parse_broker_list("   ").is_empty());
    }

    #[test]
    fn test_validate_broker_list() {
        assert!(validate_broker_list(&["localhost:9092".to_string()]).is_ok());

        let cases = [
            (vec![], "At least one broker is required"),
            (vec!["".to_string()], "Broker URL cannot be empty"),
            (vec!["localhost".to_string()], "Invalid broker URL format. Expected host:port"),
            (vec![":9092".to_string()], "Invalid broker URL format. Expected host:port"),
            (vec!["host:port".to_string()], "Invalid broker URL format. Expected host:port"),
        ];
        for (brokers, expected) in cases {
            let err = validate_broker_list(&brokers).unwrap_err();
            assert_eq!(err.to_string(), expected);
        }
    }

    #[tokio::test]
    async fn test_add_list_remove() {
        let registry = registry();
        registry.add_cluster("zeta", vec!["z:9092".to_string()]).await.unwrap();
        registry.add_cluster("alpha", vec!["a:9092".to_string()]).await.unwrap();

        assert_eq!(registry.list_clusters().await, vec!["alpha", "zeta"]);
        assert_eq!(registry.get("alpha").await.unwrap().brokers, vec!["a:9092"]);

        registry.remove_cluster("alpha").await.unwrap();
        assert_eq!(registry.cluster_count().await, 1);
        assert!(matches!(
            registry.remove_cluster("alpha").await,
            Err(KafkaError::ClusterNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_and_unknown_clusters() {
        let registry = registry();
        registry.add_cluster("local", vec!["localhost:9092".to_string()]).await.unwrap();

        let err = registry
            .add_cluster("local", vec!["localhost:9092".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "cluster 'local' already exists");

        let err = registry.get("missing").await.unwrap_err();
        assert_eq!(err.to_string(), "cluster 'missing' not found");

        assert!(registry.add_cluster(" ", vec!["a:1".to_string()]).await.is_err());
    }

    #[tokio::test]
    async fn test_register_prebuilt_admin() {
        let registry = registry();
        let admin = Arc::new(InMemoryAdmin::new());
        admin.create_topic("orders", 1, 1).await.unwrap();
        registry
            .register("seeded", vec!["localhost:9092".to_string()], admin)
            .await
            .unwrap();

        let metadata = registry.admin("seeded").await.unwrap().metadata().await.unwrap();
        assert_eq!(metadata.topics.len(), 1);
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = KafkaConfig {
            backend: AdminBackend::Memory,
            clusters: vec![ClusterConfig::new("local", vec!["localhost:9092".to_string()])],
            ..KafkaConfig::default()
        };
        let registry = ClusterRegistry::from_config(&config, Arc::new(DefaultAdminFactory::new(config.clone())))
            .await
            .unwrap();
        assert_eq!(registry.list_clusters().await, vec!["local"]);
    }
}
