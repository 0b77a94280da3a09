//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Client defaults, storage keys and user-facing messages

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Environment variable overriding the base URL
pub const API_URL_ENV: &str = "KAFKA_CONSOLE_API_URL";

/// Request timeout in milliseconds
pub const API_TIMEOUT_MS: u64 = 30_000;

/// Attempts for idempotent requests
pub const RETRY_ATTEMPTS: u32 = 3;

/// Delay between retries in milliseconds
pub const RETRY_DELAY_MS: u64 = 200;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [5, 10, 25, 50, 100];

/// Refresh intervals in milliseconds
pub const REFRESH_INTERVAL_FAST_MS: u64 = 5_000;
pub const REFRESH_INTERVAL_NORMAL_MS: u64 = 30_000;
pub const REFRESH_INTERVAL_SLOW_MS: u64 = 60_000;

// Storage keys
pub const STORAGE_KEY_TOKEN: &str = "token";
pub const STORAGE_KEY_USER: &str = "user";
pub const STORAGE_KEY_SELECTED_CLUSTER: &str = "kafka-ui-selected-cluster";
pub const STORAGE_KEY_THEME_MODE: &str = "kafka-ui-theme-mode";
pub const STORAGE_KEY_REFRESH_INTERVAL: &str = "kafka-ui-refresh-interval";
pub const STORAGE_KEY_TABLE_SETTINGS: &str = "kafka-ui-table-settings";

// Messages
pub const MSG_REQUEST_FAILED: &str = "Request failed";
pub const MSG_NOT_AUTHENTICATED: &str = "Not authenticated";
pub const MSG_LOGIN_FAILED: &str = "Login failed";
pub const MSG_REGISTRATION_FAILED: &str = "Registration failed";
pub const MSG_CHANGE_PASSWORD_FAILED: &str = "Failed to change password";
pub const MSG_LOGIN_TO_ADD_CLUSTERS: &str = "Please login to add clusters";
pub const MSG_LOGIN_TO_REMOVE_CLUSTERS: &str = "Please login to remove clusters";
pub const MSG_FAILED_TO_FETCH_CLUSTERS: &str = "Failed to fetch clusters: ";
pub const MSG_FAILED_TO_ADD_CLUSTER: &str = "Failed to add cluster: ";
pub const MSG_FAILED_TO_REMOVE_CLUSTER: &str = "Failed to remove cluster: ";
