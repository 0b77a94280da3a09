//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! User model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A console user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,

    pub username: String,

    pub email: String,

    /// Argon2 PHC string; never leaves the server
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create new user
    pub fn new(id: u64, username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// ID in the form carried by session tokens
    pub fn token_subject(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new(
            7,
            "testuser".to_string(),
            "test@example.com".to_string(),
            "$argon2id$secret".to_string(),
        );

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["username"], "testuser");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("created_at").is_some());
        assert!(json.get("updated_at").is_some());
    }

    #[test]
    fn test_token_subject() {
        let user = User::new(1, "admin".to_string(), "a@b.c".to_string(), String::new());
        assert_eq!(user.token_subject(), "1");
    }
}
