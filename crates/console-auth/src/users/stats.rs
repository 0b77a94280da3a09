//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! User statistics

use chrono::{DateTime, Utc};
use serde::Serialize;

/// User statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserStats {
    /// Number of users created
    pub users_created: u64,

    /// Number of successful password verifications
    pub password_verifications: u64,

    /// Number of argon2 verifications run, including those for unknown users
    pub password_hash_checks: u64,

    /// Number of rejected logins
    pub failed_login_attempts: u64,

    /// Number of password changes
    pub password_changes: u64,

    pub last_user_created: Option<DateTime<Utc>>,

    pub last_password_verification: Option<DateTime<Utc>>,
}

impl UserStats {
    pub fn increment_users_created(&mut self) {
        self.users_created += 1;
        self.last_user_created = Some(Utc::now());
    }

    pub fn increment_password_verifications(&mut self) {
        self.password_verifications += 1;
        self.last_password_verification = Some(Utc::now());
    }

    pub fn increment_password_hash_checks(&mut self) {
        self.password_hash_checks += 1;
    }

    pub fn increment_failed_login_attempts(&mut self) {
        self.failed_login_attempts += 1;
    }

    pub fn increment_password_changes(&mut self) {
        self.password_changes += 1;
    }
}
