//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! JWT issuing and validation

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::JwtConfig;
use crate::{AuthError, AuthResult};

use super::claims::JwtClaims;
use super::stats::JwtStats;

/// JWT manager
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,

    /// Revoked tokens and their natural expiry
    blacklist: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,

    stats: Arc<RwLock<JwtStats>>,
}

impl JwtManager {
    /// Create new JWT manager
    pub fn new(config: JwtConfig) -> AuthResult<Self> {
        if config.secret.is_empty() {
            return Err(AuthError::internal("JWT secret must not be empty".to_string()));
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            blacklist: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(JwtStats::default())),
        })
    }

    /// Token lifetime in seconds
    pub fn expiration_secs(&self) -> u64 {
        self.config.expiration_secs
    }

    /// Generate a token, returning it with its unix expiry
    pub async fn generate_token(&self, user_id: String, username: String) -> AuthResult<(String, i64)> {
        let claims = JwtClaims::new(user_id, username, &self.config);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::token_generation(e.to_string()))?;

        {
            let mut stats = self.stats.write().await;
            stats.increment_tokens_generated();
        }

        info!("Generated JWT token for user: {}", claims.username);
        Ok((token, claims.exp))
    }

    /// Validate a token and return its claims
    pub async fn validate_token(&self, token: &str) -> AuthResult<JwtClaims> {
        {
            let blacklist = self.blacklist.read().await;
            if let Some(blacklisted_at) = blacklist.get(token) {
                return Err(AuthError::token_blacklisted(format!(
                    "Token revoked, expires at {}",
                    blacklisted_at
                )));
            }
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.validate_nbf = true;

        let token_data = match decode::<JwtClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => data,
            Err(e) => {
                let mut stats = self.stats.write().await;
                stats.increment_validation_failures();
                return Err(AuthError::token_validation(e.to_string()));
            }
        };

        let claims = token_data.claims;

        // Library leeway is 60s; enforce the exact bounds as well
        if claims.is_expired() {
            return Err(AuthError::token_expired("Token has expired".to_string()));
        }
        if claims.is_not_yet_valid() {
            return Err(AuthError::token_not_yet_valid("Token not yet valid".to_string()));
        }

        {
            let mut stats = self.stats.write().await;
            stats.increment_tokens_validated();
        }

        debug!("Validated JWT token for user: {}", claims.username);
        Ok(claims)
    }

    /// Revoke a token until it would have expired anyway
    pub async fn blacklist_token(&self, token: String) -> AuthResult<()> {
        let claims = self.validate_token(&token).await?;
        let expiration = claims.expiration_time();

        let pruned = {
            let now = Utc::now();
            let mut blacklist = self.blacklist.write().await;
            let before = blacklist.len();
            blacklist.retain(|_, expires| *expires >= now);
            let pruned = before - blacklist.len();
            blacklist.insert(token, expiration);
            pruned
        };
        if pruned > 0 {
            debug!("Pruned {} expired blacklisted tokens", pruned);
        }

        {
            let mut stats = self.stats.write().await;
            stats.increment_tokens_blacklisted();
        }

        info!("Blacklisted JWT token for user: {}", claims.username);
        Ok(())
    }

    /// Drop revoked tokens whose expiry has passed
    pub async fn cleanup_blacklist(&self) -> usize {
        let now = Utc::now();
        let mut blacklist = self.blacklist.write().await;
        let before = blacklist.len();
        blacklist.retain(|_, expiration| *expiration >= now);
        let removed = before - blacklist.len();

        if removed > 0 {
            debug!("Cleaned up {} expired blacklisted tokens", removed);
        }
        removed
    }

    /// Number of revoked tokens currently tracked
    pub async fn blacklist_len(&self) -> usize {
        self.blacklist.read().await.len()
    }

    /// Get JWT statistics
    pub async fn get_stats(&self) -> JwtStats {
        self.stats.read().await.clone()
    }
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("config", &"<sensitive>")
            .field("encoding_key", &"<sensitive>")
            .field("decoding_key", &"<sensitive>")
            .field("blacklist", &"<sensitive>")
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new(JwtConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_secret_rejected() {
        let config = JwtConfig {
            secret: String::new(),
            ..JwtConfig::default()
        };
        assert!(JwtManager::new(config).is_err());
    }

    #[test]
    fn test_jwt_manager_debug_redacts() {
        let debug_output = format!("{:?}", manager());
        assert!(debug_output.contains("JwtManager"));
        assert!(debug_output.contains("<sensitive>"));
        assert!(!debug_output.contains("your-secret-key"));
    }

    #[tokio::test]
    async fn test_token_generation_and_validation() {
        let jwt = manager();
        let (token, expires_at) = jwt
            .generate_token("1".to_string(), "admin".to_string())
            .await
            .unwrap();
        assert!(!token.is_empty());
        assert!(expires_at > Utc::now().timestamp());

        let claims = jwt.validate_token(&token).await.unwrap();
        assert_eq!(claims.user_id(), "1");
        assert_eq!(claims.username, "admin");

        let stats = jwt.get_stats().await;
        assert_eq!(stats.tokens_generated, 1);
        assert_eq!(stats.tokens_validated, 1);
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_rejected() {
        let other = JwtManager::new(JwtConfig {
            secret: "another-secret".to_string(),
            ..JwtConfig::default()
        })
        .unwrap();
        let (token, _) = other
            .generate_token("1".to_string(), "admin".to_string())
            .await
            .unwrap();

        let jwt = manager();
        let result = jwt.validate_token(&token).await;
        assert!(matches!(result, Err(AuthError::TokenValidation(_))));
        assert_eq!(jwt.get_stats().await.validation_failures, 1);
    }

    #[tokio::test]
    async fn test_malformed_tokens_rejected() {
        let jwt = manager();
        assert!(jwt.validate_token("").await.is_err());
        assert!(jwt.validate_token("invalid.token.format").await.is_err());
        assert!(jwt.validate_token("not.a.valid.jwt.token").await.is_err());
    }

    #[tokio::test]
    async fn test_blacklisted_token_rejected() {
        let jwt = manager();
        let (token, _) = jwt
            .generate_token("1".to_string(), "admin".to_string())
            .await
            .unwrap();

        jwt.blacklist_token(token.clone()).await.unwrap();
        let result = jwt.validate_token(&token).await;
        assert!(matches!(result, Err(AuthError::TokenBlacklisted(_))));

        // Still within its lifetime, so nothing to clean up
        assert_eq!(jwt.cleanup_blacklist().await, 0);
    }

    #[tokio::test]
    async fn test_token_expiration() {
        let jwt = JwtManager::new(JwtConfig {
            expiration_secs: 1,
            ..JwtConfig::default()
        })
        .unwrap();
        let (token, _) = jwt
            .generate_token("1".to_string(), "admin".to_string())
            .await
            .unwrap();
        assert!(jwt.validate_token(&token).await.is_ok());

        tokio::time::sleep(std::time::Duration::from_millis(2100)).await;

        let result = jwt.validate_token(&token).await;
        assert!(matches!(result, Err(AuthError::TokenExpired(_))));
    }

    #[tokio::test]
    async fn test_expired_blacklist_entries_pruned() {
        let jwt = JwtManager::new(JwtConfig {
            expiration_secs: 1,
            ..JwtConfig::default()
        })
        .unwrap();

        for user in ["alice", "bob", "carol"] {
            let (token, _) = jwt
                .generate_token("1".to_string(), user.to_string())
                .await
                .unwrap();
            jwt.blacklist_token(token).await.unwrap();
        }
        assert_eq!(jwt.blacklist_len().await, 3);

        tokio::time::sleep(std::time::Duration::from_millis(2100)).await;

        let (fresh, _) = jwt
            .generate_token("2".to_string(), "dave".to_string())
            .await
            .unwrap();
        jwt.blacklist_token(fresh).await.unwrap();
        assert_eq!(jwt.blacklist_len().await, 1);
    }

    #[tokio::test]
    async fn test_cleanup_removes_expired_entries() {
        let jwt = JwtManager::new(JwtConfig {
            expiration_secs: 1,
            ..JwtConfig::default()
        })
        .unwrap();
        let (token, _) = jwt
            .generate_token("1".to_string(), "admin".to_string())
            .await
            .unwrap();
        jwt.blacklist_token(token).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(2100)).await;

        assert_eq!(jwt.cleanup_blacklist().await, 1);
        assert_eq!(jwt.blacklist_len().await, 0);
    }
}
