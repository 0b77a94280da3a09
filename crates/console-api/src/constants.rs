//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Response vocabulary shared with the dashboard

pub const AUTH_HEADER_PREFIX: &str = "Bearer ";

// Auth
pub const MSG_INVALID_REQUEST_DATA: &str = "Invalid request data: ";
pub const MSG_USERNAME_REQUIRED: &str = "Username is required";
pub const MSG_PASSWORD_REQUIRED: &str = "Password is required";
pub const MSG_EMAIL_REQUIRED: &str = "Email is required";
pub const MSG_USERNAME_LENGTH: &str = "Username must be between 3 and 50 characters";
pub const MSG_INVALID_EMAIL: &str = "Invalid email format";
pub const MSG_PASSWORD_MIN_LENGTH: &str = "Password must be at least 6 characters";
pub const MSG_USER_REGISTERED: &str = "User registered successfully";
pub const MSG_LOGIN_SUCCESSFUL: &str = "Login successful";
pub const MSG_USER_ID_NOT_FOUND_IN_TOKEN: &str = "User ID not found in token";
pub const MSG_PROFILE_FETCHED: &str = "Profile fetched successfully";
pub const MSG_CURRENT_PASSWORD_REQUIRED: &str = "Current password is required";
pub const MSG_NEW_PASSWORD_REQUIRED: &str = "New password is required";
pub const MSG_NEW_PASSWORD_MIN_LENGTH: &str = "New password must be at least 6 characters";
pub const MSG_PASSWORD_CHANGED: &str = "Password changed successfully";
pub const MSG_LOGGED_OUT: &str = "Logged out successfully";

// Middleware
pub const MSG_INVALID_TOKEN: &str = "Invalid token";
pub const MSG_AUTHORIZATION_HEADER_REQUIRED: &str = "Authorization header required";
pub const MSG_INVALID_AUTHORIZATION_HEADER_FORMAT: &str = "Invalid authorization header format";
pub const MSG_RATE_LIMIT_EXCEEDED: &str = "Rate limit exceeded";

// Clusters
pub const MSG_INVALID_REQUEST: &str = "Invalid request: ";
pub const MSG_CLUSTERS_RETRIEVED: &str = "Clusters retrieved successfully";
pub const MSG_CLUSTER_ADDED: &str = "Cluster added successfully";
pub const MSG_CLUSTER_REMOVED: &str = "Cluster removed successfully";
pub const MSG_FAILED_TO_ADD_CLUSTER: &str = "Failed to add cluster: ";
pub const MSG_FAILED_TO_REMOVE_CLUSTER: &str = "Failed to remove cluster: ";

// Topics
pub const MSG_TOPICS_RETRIEVED: &str = "Topics retrieved successfully";
pub const MSG_TOPIC_DETAILS_RETRIEVED: &str = "Topic details retrieved successfully";
pub const MSG_FAILED_TO_GET_TOPICS: &str = "Failed to get topics: ";
pub const MSG_FAILED_TO_GET_TOPIC_DETAILS: &str = "Failed to get topic details: ";
pub const MSG_FAILED_TO_CREATE_TOPIC: &str = "Failed to create topic: ";
pub const MSG_FAILED_TO_DELETE_TOPIC: &str = "Failed to delete topic: ";

// Brokers and consumer groups
pub const MSG_BROKERS_RETRIEVED: &str = "Brokers retrieved successfully";
pub const MSG_FAILED_TO_GET_BROKERS: &str = "Failed to get brokers: ";
pub const MSG_CONSUMER_GROUPS_RETRIEVED: &str = "Consumer groups retrieved successfully";
pub const MSG_CONSUMER_GROUP_DETAILS_RETRIEVED: &str = "Consumer group details retrieved successfully";
pub const MSG_FAILED_TO_GET_CONSUMER_GROUPS: &str = "Failed to get consumer groups: ";
pub const MSG_FAILED_TO_GET_CONSUMER_GROUP_DETAILS: &str = "Failed to get consumer group details: ";

// Messages
pub const MSG_MESSAGES_RETRIEVED: &str = "Messages retrieved successfully";
pub const MSG_MESSAGE_PRODUCED: &str = "Message produced successfully";
pub const MSG_MESSAGES_REPLAYED: &str = "Messages replayed successfully";
pub const MSG_MESSAGE_VALID: &str = "Message is valid";
pub const MSG_SEARCH_QUERY_REQUIRED: &str = "Search query is required";
pub const MSG_FAILED_TO_GET_MESSAGES: &str = "Failed to get messages: ";
pub const MSG_FAILED_TO_PRODUCE_MESSAGE: &str = "Failed to produce message: ";
pub const MSG_FAILED_TO_REPLAY_MESSAGES: &str = "Failed to replay messages: ";
pub const MSG_FAILED_TO_SEARCH_MESSAGES: &str = "Failed to search messages: ";

// Metrics
pub const MSG_CONSUMER_LAG_RETRIEVED: &str = "Consumer group lag retrieved successfully";
pub const MSG_CLUSTER_HEALTH_RETRIEVED: &str = "Cluster health retrieved successfully";
pub const MSG_BROKER_METRICS_RETRIEVED: &str = "Broker metrics retrieved successfully";
pub const MSG_TOPIC_METRICS_RETRIEVED: &str = "Topic metrics retrieved successfully";
pub const MSG_CONSUMER_GROUP_METRICS_RETRIEVED: &str = "Consumer group metrics retrieved successfully";
pub const MSG_FAILED_TO_GET_CONSUMER_LAG: &str = "Failed to get consumer group lag: ";
pub const MSG_FAILED_TO_GET_CLUSTER_HEALTH: &str = "Failed to get cluster health: ";
pub const MSG_FAILED_TO_GET_BROKER_METRICS: &str = "Failed to get broker metrics: ";
pub const MSG_FAILED_TO_GET_TOPIC_METRICS: &str = "Failed to get topic metrics: ";
pub const MSG_FAILED_TO_GET_CONSUMER_GROUP_METRICS: &str = "Failed to get consumer group metrics: ";

// Health
pub const MSG_SERVICE_HEALTHY: &str = "Service is healthy";
pub const MSG_ROUTE_NOT_FOUND: &str = "Route not found";
