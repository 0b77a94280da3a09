//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Shared vocabulary for group states, statuses and limits

/// Consumer group states as reported by the group coordinator
pub const GROUP_STATE_STABLE: &str = "Stable";
pub const GROUP_STATE_PREPARING_REBALANCE: &str = "PreparingRebalance";
pub const GROUP_STATE_COMPLETING_REBALANCE: &str = "CompletingRebalance";
pub const GROUP_STATE_DEAD: &str = "Dead";
pub const GROUP_STATE_EMPTY: &str = "Empty";

pub const GROUP_STATES: [&str; 5] = [
    GROUP_STATE_STABLE,
    GROUP_STATE_PREPARING_REBALANCE,
    GROUP_STATE_COMPLETING_REBALANCE,
    GROUP_STATE_DEAD,
    GROUP_STATE_EMPTY,
];

/// Broker and cluster status labels
pub const STATUS_ONLINE: &str = "online";
pub const STATUS_OFFLINE: &str = "offline";
pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_UNHEALTHY: &str = "unhealthy";
pub const STATUS_STABLE: &str = "stable";
pub const STATUS_UNSTABLE: &str = "unstable";

/// Internal topic holding committed offsets
pub const CONSUMER_OFFSETS_TOPIC: &str = "__consumer_offsets";

/// Messages read per partition when browsing
pub const MAX_MESSAGES_PER_PARTITION: usize = 100;

/// Messages scanned per partition when searching
pub const MAX_SEARCH_SCAN_PER_PARTITION: usize = 1000;

/// Deadline for browsing and searching, in milliseconds
pub const MESSAGE_READ_DEADLINE_MS: u64 = 5000;

/// Nominal average message size reported by topic metrics
pub const NOMINAL_MESSAGE_SIZE: i64 = 1024;

/// True for the states a group moves through while rebalancing
pub fn is_rebalancing(state: &str) -> bool {
    state == GROUP_STATE_PREPARING_REBALANCE || state == GROUP_STATE_COMPLETING_REBALANCE
}
