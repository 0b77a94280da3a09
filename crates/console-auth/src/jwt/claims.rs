//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! JWT claims definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;

/// Claims carried by a console session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// User ID as a decimal string
    pub user_id: String,

    /// Username at the time of issue
    pub username: String,

    /// Issuer
    pub iss: String,

    /// Issued at
    pub iat: i64,

    /// Expiration time
    pub exp: i64,

    /// Not before
    pub nbf: i64,

    /// Token ID, keeps tokens issued in the same second distinct
    pub jti: String,
}

impl JwtClaims {
    /// Create claims for a user
    pub fn new(user_id: String, username: String, config: &JwtConfig) -> Self {
        let now = Utc::now().timestamp();

        Self {
            user_id,
            username,
            iss: config.issuer.clone(),
            iat: now,
            exp: now + config.expiration_secs as i64,
            nbf: now,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }

    /// Check if token is not yet valid
    pub fn is_not_yet_valid(&self) -> bool {
        self.nbf > Utc::now().timestamp()
    }

    /// Get user ID
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Get expiration time as DateTime
    pub fn expiration_time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_claims_creation() {
        let config = JwtConfig::default();
        let claims = JwtClaims::new("1".to_string(), "admin".to_string(), &config);

        assert_eq!(claims.user_id(), "1");
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.exp - claims.iat, config.expiration_secs as i64);
        assert!(!claims.is_expired());
        assert!(!claims.is_not_yet_valid());
    }

    #[test]
    fn test_jwt_claims_are_unique() {
        let config = JwtConfig::default();
        let a = JwtClaims::new("1".to_string(), "admin".to_string(), &config);
        let b = JwtClaims::new("1".to_string(), "admin".to_string(), &config);
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_expired_claims() {
        let config = JwtConfig::default();
        let mut claims = JwtClaims::new("1".to_string(), "admin".to_string(), &config);
        claims.exp = Utc::now().timestamp() - 10;
        assert!(claims.is_expired());
    }
}
