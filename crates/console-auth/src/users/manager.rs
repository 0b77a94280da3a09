//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! User management functionality

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::UserConfig;
use crate::{AuthError, AuthResult};

use super::model::User;
use super::stats::UserStats;

/// In-memory user store with argon2 password hashes
#[derive(Debug)]
pub struct UserManager {
    config: UserConfig,

    users: Arc<RwLock<HashMap<u64, User>>>,

    /// Username to user ID mapping
    username_to_id: Arc<RwLock<HashMap<String, u64>>>,

    next_id: AtomicU64,

    /// Hash verified against when a username is unknown
    dummy_hash: String,

    stats: Arc<RwLock<UserStats>>,
}

impl UserManager {
    /// Create the store, seeding the administrator when configured
    pub async fn new(config: UserConfig) -> AuthResult<Self> {
        let seed = config.seed_admin.then(|| {
            (
                config.admin_username.clone(),
                config.admin_email.clone(),
                config.admin_password.clone(),
            )
        });

        let dummy_hash = hash_password(argon2_params(&config)?, DUMMY_PASSWORD.to_string()).await?;

        let manager = Self {
            config,
            users: Arc::new(RwLock::new(HashMap::new())),
            username_to_id: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            dummy_hash,
            stats: Arc::new(RwLock::new(UserStats::default())),
        };

        if let Some((username, email, password)) = seed {
            manager.create_user(username, email, password).await?;
        }

        Ok(manager)
    }

    /// Create new user
    pub async fn create_user(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> AuthResult<User> {
        self.validate_password(&password)?;
        let password_hash = hash_password(argon2_params(&self.config)?, password).await?;

        let user = {
            let mut username_map = self.username_to_id.write().await;
            if username_map.contains_key(&username) {
                return Err(AuthError::user_exists("Username already exists".to_string()));
            }

            let mut users = self.users.write().await;
            if users.values().any(|u| u.email.eq_ignore_ascii_case(&email)) {
                return Err(AuthError::user_exists("Email already exists".to_string()));
            }

            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let user = User::new(id, username.clone(), email, password_hash);
            users.insert(id, user.clone());
            username_map.insert(username, id);
            user
        };

        {
            let mut stats = self.stats.write().await;
            stats.increment_users_created();
        }

        info!("Created user: {}", user.username);
        Ok(user)
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, user_id: u64) -> Option<User> {
        let users = self.users.read().await;
        users.get(&user_id).cloned()
    }

    /// Get user by username
    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        let user_id = {
            let username_map = self.username_to_id.read().await;
            username_map.get(username).copied()
        };

        match user_id {
            Some(id) => self.get_user_by_id(id).await,
            None => None,
        }
    }

    /// Check a username and password pair
    pub async fn authenticate(&self, username: &str, password: &str) -> AuthResult<User> {
        let user = match self.get_user_by_username(username).await {
            Some(user) => {
                let valid = self.verify_password(password, &user.password_hash).await?;
                valid.then_some(user)
            }
            None => {
                // Same argon2 cost as a wrong password
                self.verify_password(password, &self.dummy_hash).await?;
                None
            }
        };

        let user = match user {
            Some(user) => user,
            None => {
                let mut stats = self.stats.write().await;
                stats.increment_failed_login_attempts();
                warn!("Rejected login for username: '{}'", username);
                return Err(AuthError::invalid_credentials("Invalid credentials".to_string()));
            }
        };

        {
            let mut stats = self.stats.write().await;
            stats.increment_password_verifications();
        }

        Ok(user)
    }

    /// Replace a password after verifying the current one
    pub async fn change_password(
        &self,
        user_id: u64,
        current_password: &str,
        new_password: &str,
    ) -> AuthResult<User> {
        let user = self
            .get_user_by_id(user_id)
            .await
            .ok_or_else(|| AuthError::user_not_found("User not found".to_string()))?;

        if !self.verify_password(current_password, &user.password_hash).await? {
            return Err(AuthError::invalid_credentials(
                "Current password is incorrect".to_string(),
            ));
        }

        self.validate_password(new_password)?;
        let password_hash = hash_password(argon2_params(&self.config)?, new_password.to_string()).await?;

        let updated = {
            let mut users = self.users.write().await;
            let stored = users
                .get_mut(&user_id)
                .ok_or_else(|| AuthError::user_not_found("User not found".to_string()))?;
            stored.password_hash = password_hash;
            stored.updated_at = Utc::now();
            stored.clone()
        };

        {
            let mut stats = self.stats.write().await;
            stats.increment_password_changes();
        }

        info!("Changed password for user: {}", updated.username);
        Ok(updated)
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    fn validate_password(&self, password: &str) -> AuthResult<()> {
        if password.chars().count() < self.config.min_password_length {
            return Err(AuthError::weak_password(format!(
                "Password must be at least {} characters",
                self.config.min_password_length
            )));
        }
        Ok(())
    }

    async fn verify_password(&self, password: &str, hash: &str) -> AuthResult<bool> {
        let valid = verify_password_hash(password.to_string(), hash.to_string()).await?;
        {
            let mut stats = self.stats.write().await;
            stats.increment_password_hash_checks();
        }
        Ok(valid)
    }

    /// Get user statistics
    pub async fn get_stats(&self) -> UserStats {
        self.stats.read().await.clone()
    }
}

const DUMMY_PASSWORD: &str = "kafka-console-dummy-password";

fn argon2_params(config: &UserConfig) -> AuthResult<Params> {
    Params::new(
        config.argon2_memory_kib,
        config.argon2_iterations,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| AuthError::internal(format!("Invalid argon2 parameters: {}", e)))
}

/// Hash on the blocking pool; argon2 is memory hard and would stall a worker
async fn hash_password(params: Params, password: String) -> AuthResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::internal(format!("Failed to hash password: {}", e)))
    })
    .await
    .map_err(|e| AuthError::internal(format!("Password hashing task failed: {}", e)))?
}

async fn verify_password_hash(password: String, hash: String) -> AuthResult<bool> {
    tokio::task::spawn_blocking(move || match PasswordHash::new(&hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    })
    .await
    .map_err(|e| AuthError::internal(format!("Password verification task failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn manager() -> UserManager {
        UserManager::new(UserConfig::lightweight()).await.unwrap()
    }

    #[tokio::test]
    async fn test_admin_is_seeded() {
        let users = manager().await;
        let admin = users.get_user_by_username("admin").await.unwrap();
        assert_eq!(admin.id, 1);
        assert_eq!(admin.email, "admin@kafka-ui.com");
        assert!(admin.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_seeding_can_be_disabled() {
        let config = UserConfig {
            seed_admin: false,
            ..UserConfig::lightweight()
        };
        let users = UserManager::new(config).await.unwrap();
        assert_eq!(users.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_user_creation_assigns_sequential_ids() {
        let users = manager().await;
        let alice = users
            .create_user("alice".into(), "alice@example.com".into(), "secret1".into())
            .await
            .unwrap();
        let bob = users
            .create_user("bob".into(), "bob@example.com".into(), "secret2".into())
            .await
            .unwrap();

        assert_eq!(alice.id, 2);
        assert_eq!(bob.id, 3);
        assert_eq!(users.get_stats().await.users_created, 3);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let users = manager().await;
        let result = users
            .create_user("admin".into(), "other@example.com".into(), "secret1".into())
            .await;
        match result {
            Err(AuthError::UserExists(msg)) => assert_eq!(msg, "Username already exists"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let users = manager().await;
        let result = users
            .create_user("admin2".into(), "ADMIN@kafka-ui.com".into(), "secret1".into())
            .await;
        assert!(matches!(result, Err(AuthError::UserExists(_))));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let users = manager().await;
        let result = users
            .create_user("carol".into(), "carol@example.com".into(), "12345".into())
            .await;
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let users = manager().await;
        assert!(users.authenticate("admin", "admin123").await.is_ok());
        assert!(matches!(
            users.authenticate("admin", "wrong").await,
            Err(AuthError::InvalidCredentials(_))
        ));
        assert!(matches!(
            users.authenticate("ghost", "admin123").await,
            Err(AuthError::InvalidCredentials(_))
        ));

        let stats = users.get_stats().await;
        assert_eq!(stats.password_verifications, 1);
        assert_eq!(stats.failed_login_attempts, 2);
    }

    #[tokio::test]
    async fn test_unknown_user_runs_argon2() {
        let users = manager().await;
        assert!(users.authenticate("ghost", "admin123").await.is_err());
        assert!(users.authenticate("admin", "wrong").await.is_err());

        // Both rejections pay for one verification each
        assert_eq!(users.get_stats().await.password_hash_checks, 2);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_hashing_does_not_block_runtime() {
        let users = manager().await;

        let ticks = Arc::new(AtomicU64::new(0));
        let ticker = {
            let ticks = ticks.clone();
            tokio::spawn(async move {
                loop {
                    ticks.fetch_add(1, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                }
            })
        };

        users.authenticate("admin", "admin123").await.unwrap();
        users
            .create_user("erin".into(), "erin@example.com".into(), "secret1".into())
            .await
            .unwrap();
        ticker.abort();

        assert!(ticks.load(Ordering::SeqCst) > 0);
    }

    #[tokio::test]
    async fn test_change_password() {
        let users = manager().await;
        let before = users.get_user_by_id(1).await.unwrap();

        assert!(matches!(
            users.change_password(1, "wrong", "newsecret").await,
            Err(AuthError::InvalidCredentials(_))
        ));

        let updated = users.change_password(1, "admin123", "newsecret").await.unwrap();
        assert!(updated.updated_at >= before.updated_at);
        assert!(users.authenticate("admin", "admin123").await.is_err());
        assert!(users.authenticate("admin", "newsecret").await.is_ok());

        assert!(matches!(
            users.change_password(99, "x", "newsecret").await,
            Err(AuthError::UserNotFound(_))
        ));
    }
}
