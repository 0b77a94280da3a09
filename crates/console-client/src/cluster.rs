//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Cluster selection state

use console_kafka::parse_broker_list;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::{constants::*, session::SessionContext, types::ActionOutcome};

#[derive(Debug, Clone, Default)]
struct ClusterState {
    clusters: Vec<String>,
    selected_cluster: Option<String>,
    loading: bool,
}

/// Known clusters and the one currently selected
#[derive(Clone)]
pub struct ClusterContext {
    session: SessionContext,
    state: Arc<RwLock<ClusterState>>,
}

impl ClusterContext {
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            state: Arc::new(RwLock::new(ClusterState {
                loading: true,
                ..ClusterState::default()
            })),
        }
    }

    /// Reload the cluster list, selecting the first cluster when none is selected
    ///
    /// Skipped while logged out or while the session is still loading.
    pub async fn refresh(&self) -> ActionOutcome {
        if !self.session.is_authenticated().await || self.session.is_loading().await {
            self.state.write().await.loading = false;
            return ActionOutcome::ok();
        }

        self.state.write().await.loading = true;
        let result = self.session.client().get_clusters().await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(clusters) => {
                if state.selected_cluster.is_none() {
                    state.selected_cluster = clusters.first().cloned();
                }
                state.clusters = clusters;
                ActionOutcome::ok()
            }
            Err(e) => {
                error!("Failed to fetch clusters: {}", e);
                state.clusters.clear();
                ActionOutcome::failed(format!("{}{}", MSG_FAILED_TO_FETCH_CLUSTERS, e.message()))
            }
        }
    }

    /// Register a cluster from a comma separated broker list
    pub async fn add_cluster(&self, name: &str, brokers: &str) -> ActionOutcome {
        if !self.session.is_authenticated().await {
            return ActionOutcome::failed(MSG_LOGIN_TO_ADD_CLUSTERS);
        }

        let brokers = parse_broker_list(brokers);
        if let Err(e) = self.session.client().add_cluster(name, &brokers).await {
            return ActionOutcome::failed(format!("{}{}", MSG_FAILED_TO_ADD_CLUSTER, e.message()));
        }

        info!("Cluster \"{}\" added", name);
        self.refresh().await
    }

    pub async fn remove_cluster(&self, name: &str) -> ActionOutcome {
        if !self.session.is_authenticated().await {
            return ActionOutcome::failed(MSG_LOGIN_TO_REMOVE_CLUSTERS);
        }

        if let Err(e) = self.session.client().remove_cluster(name).await {
            return ActionOutcome::failed(format!("{}{}", MSG_FAILED_TO_REMOVE_CLUSTER, e.message()));
        }

        info!("Cluster \"{}\" removed", name);
        {
            let mut state = self.state.write().await;
            if state.selected_cluster.as_deref() == Some(name) {
                state.selected_cluster = None;
            }
        }
        self.refresh().await
    }

    pub async fn change_cluster(&self, name: &str) {
        self.state.write().await.selected_cluster = Some(name.to_string());
    }

    pub async fn clusters(&self) -> Vec<String> {
        self.state.read().await.clusters.clone()
    }

    pub async fn selected_cluster(&self) -> Option<String> {
        self.state.read().await.selected_cluster.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }
}
