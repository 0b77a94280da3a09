//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Console services
//!
//! Each service resolves a cluster by name through the [`ClusterRegistry`] and
//! works against its [`ClusterAdmin`](crate::admin::ClusterAdmin).

pub mod broker;
pub mod consumer_group;
pub mod message;
pub mod metrics;
pub mod topic;

pub use broker::{Broker, BrokerService};
pub use consumer_group::{ConsumerGroupDetails, ConsumerGroupService, ConsumerGroupSummary, GroupMember};
pub use message::{
    Message, MessageFilter, MessageFormat, MessageSearch, MessageService, ProduceRequest, ProduceResult,
};
pub use metrics::{
    BrokerMetrics, ClusterHealth, ConsumerGroupLag, ConsumerGroupMetrics, MetricsService, TopicMetrics,
};
pub use topic::{CreateTopicRequest, PartitionDetails, TopicDetails, TopicService, TopicSummary};

use crate::cluster::ClusterRegistry;

/// All console services over one registry
#[derive(Debug, Clone)]
pub struct KafkaServices {
    pub topics: TopicService,
    pub brokers: BrokerService,
    pub consumer_groups: ConsumerGroupService,
    pub messages: MessageService,
    pub metrics: MetricsService,
}

impl KafkaServices {
    pub fn new(registry: ClusterRegistry) -> Self {
        Self {
            topics: TopicService::new(registry.clone()),
            brokers: BrokerService::new(registry.clone()),
            consumer_groups: ConsumerGroupService::new(registry.clone()),
            messages: MessageService::new(registry.clone()),
            metrics: MetricsService::new(registry),
        }
    }
}
