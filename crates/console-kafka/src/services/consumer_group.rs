//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Consumer group listing and membership

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::admin::{GroupDescription, MemberDescription};
use crate::assignment::{parse_member_assignment, MemberAssignment};
use crate::cluster::ClusterRegistry;
use crate::error::{KafkaError, KafkaResult};

use super::metrics::consumer_lag_report;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerGroupSummary {
    pub group_id: String,
    pub state: String,
    pub num_members: usize,
    pub num_topics: usize,
    pub consumer_lag: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub client_id: String,
    pub client_host: String,
    pub member_id: String,
    pub topics: Vec<String>,
    pub assigned_partitions: BTreeMap<String, Vec<i32>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerGroupDetails {
    pub group_id: String,
    pub state: String,
    pub protocol: String,
    pub protocol_type: String,
    pub members: Vec<GroupMember>,
}

/// Decode a member's assignment, skipping members whose bytes do not parse
pub(crate) fn member_assignment(member: &MemberDescription) -> Option<MemberAssignment> {
    match parse_member_assignment(&member.assignment) {
        Ok(assignment) => Some(assignment),
        Err(e) => {
            debug!("Skipping member {} with unreadable assignment: {}", member.member_id, e);
            None
        }
    }
}

/// Unique topics across a group's parsed member assignments
pub(crate) fn assigned_topics(group: &GroupDescription) -> BTreeSet<String> {
    group
        .members
        .iter()
        .filter_map(member_assignment)
        .flat_map(|assignment| assignment.into_keys())
        .collect()
}

#[derive(Debug, Clone)]
pub struct ConsumerGroupService {
    registry: ClusterRegistry,
}

impl ConsumerGroupService {
    pub fn new(registry: ClusterRegistry) -> Self {
        Self { registry }
    }

    /// Groups of a cluster with member, topic and lag totals
    pub async fn get_consumer_groups(&self, cluster: &str) -> KafkaResult<Vec<ConsumerGroupSummary>> {
        let admin = self.registry.admin(cluster).await?;
        let groups = admin.list_groups().await.map_err(|e| {
            KafkaError::consumer(&format!(
                "failed to list consumer groups for cluster {}: {}",
                cluster, e
            ))
        })?;

        let mut lag_by_group: HashMap<String, i64> = HashMap::new();
        match consumer_lag_report(admin.as_ref(), &groups).await {
            Ok(report) => {
                for entry in report {
                    *lag_by_group.entry(entry.group_id).or_default() += entry.total_lag;
                }
            }
            Err(e) => warn!("Failed to compute consumer lag for cluster {}: {}", cluster, e),
        }

        let mut summaries: Vec<ConsumerGroupSummary> = groups
            .iter()
            .map(|g| ConsumerGroupSummary {
                group_id: g.group_id.clone(),
                state: g.state.clone(),
                num_members: g.members.len(),
                num_topics: assigned_topics(g).len(),
                consumer_lag: lag_by_group.get(&g.group_id).copied().unwrap_or(0),
            })
            .collect();
        summaries.sort_by(|a, b| a.group_id.cmp(&b.group_id));
        Ok(summaries)
    }

    /// Describe one group and its members' assignments
    pub async fn get_consumer_group_details(
        &self,
        cluster: &str,
        group_id: &str,
    ) -> KafkaResult<ConsumerGroupDetails> {
        let admin = self.registry.admin(cluster).await?;
        let groups = admin.list_groups().await.map_err(|e| {
            KafkaError::consumer(&format!("failed to describe consumer group {}: {}", group_id, e))
        })?;

        let group = groups
            .into_iter()
            .find(|g| g.group_id == group_id)
            .ok_or_else(|| KafkaError::consumer_group_not_found(group_id))?;

        let members = group
            .members
            .iter()
            .filter_map(|m| {
                member_assignment(m).map(|assignment| GroupMember {
                    client_id: m.client_id.clone(),
                    client_host: m.client_host.clone(),
                    member_id: m.member_id.clone(),
                    topics: assignment.keys().cloned().collect(),
                    assigned_partitions: assignment,
                })
            })
            .collect();

        Ok(ConsumerGroupDetails {
            group_id: group.group_id,
            state: group.state,
            protocol: group.protocol,
            protocol_type: group.protocol_type,
            members,
        })
    }
}
