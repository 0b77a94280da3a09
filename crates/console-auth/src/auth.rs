//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Session authentication service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::AuthConfig;
use crate::jwt::{JwtClaims, JwtManager};
use crate::users::{User, UserManager};

/// Authentication result type
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication error
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    #[error("Token validation failed: {0}")]
    TokenValidation(String),

    #[error("Token expired: {0}")]
    TokenExpired(String),

    #[error("Token not yet valid: {0}")]
    TokenNotYetValid(String),

    #[error("Token blacklisted: {0}")]
    TokenBlacklisted(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User exists: {0}")]
    UserExists(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn authentication_failed(msg: String) -> Self {
        Self::AuthenticationFailed(msg)
    }

    pub fn token_generation(msg: String) -> Self {
        Self::TokenGeneration(msg)
    }

    pub fn token_validation(msg: String) -> Self {
        Self::TokenValidation(msg)
    }

    pub fn token_expired(msg: String) -> Self {
        Self::TokenExpired(msg)
    }

    pub fn token_not_yet_valid(msg: String) -> Self {
        Self::TokenNotYetValid(msg)
    }

    pub fn token_blacklisted(msg: String) -> Self {
        Self::TokenBlacklisted(msg)
    }

    pub fn user_not_found(msg: String) -> Self {
        Self::UserNotFound(msg)
    }

    pub fn user_exists(msg: String) -> Self {
        Self::UserExists(msg)
    }

    pub fn invalid_credentials(msg: String) -> Self {
        Self::InvalidCredentials(msg)
    }

    pub fn weak_password(msg: String) -> Self {
        Self::WeakPassword(msg)
    }

    pub fn internal(msg: String) -> Self {
        Self::Internal(msg)
    }

    /// True for failures caused by a bad or stale token
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            AuthError::TokenValidation(_)
                | AuthError::TokenExpired(_)
                | AuthError::TokenNotYetValid(_)
                | AuthError::TokenBlacklisted(_)
        )
    }
}

/// Body returned by register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
}

/// Authentication statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuthStats {
    pub registrations: u64,
    pub successful_logins: u64,
    pub failed_logins: u64,
    pub logouts: u64,
    pub last_login: Option<DateTime<Utc>>,
}

/// Registration, login and session checks over the user store
#[derive(Debug, Clone)]
pub struct AuthService {
    jwt: Arc<JwtManager>,
    users: Arc<UserManager>,
    stats: Arc<RwLock<AuthStats>>,
}

impl AuthService {
    /// Build the service from configuration
    pub async fn new(config: AuthConfig) -> AuthResult<Self> {
        let jwt = JwtManager::new(config.jwt)?;
        let users = UserManager::new(config.users).await?;
        Ok(Self::from_parts(Arc::new(jwt), Arc::new(users)))
    }

    pub fn from_parts(jwt: Arc<JwtManager>, users: Arc<UserManager>) -> Self {
        Self {
            jwt,
            users,
            stats: Arc::new(RwLock::new(AuthStats::default())),
        }
    }

    pub fn jwt_manager(&self) -> &JwtManager {
        &self.jwt
    }

    pub fn user_manager(&self) -> &UserManager {
        &self.users
    }

    /// Create an account and open a session for it
    pub async fn register(&self, username: &str, email: &str, password: &str) -> AuthResult<AuthResponse> {
        let user = self
            .users
            .create_user(username.to_string(), email.to_string(), password.to_string())
            .await?;
        let response = self.issue(user).await?;

        {
            let mut stats = self.stats.write().await;
            stats.registrations += 1;
        }

        Ok(response)
    }

    /// Verify credentials and open a session
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<AuthResponse> {
        let user = match self.users.authenticate(username, password).await {
            Ok(user) => user,
            Err(e) => {
                let mut stats = self.stats.write().await;
                stats.failed_logins += 1;
                return Err(e);
            }
        };

        let response = self.issue(user).await?;

        {
            let mut stats = self.stats.write().await;
            stats.successful_logins += 1;
            stats.last_login = Some(Utc::now());
        }

        info!("User logged in: {}", response.user.username);
        Ok(response)
    }

    /// Validate a bearer token
    pub async fn validate(&self, token: &str) -> AuthResult<JwtClaims> {
        self.jwt.validate_token(token).await
    }

    /// Revoke a bearer token
    pub async fn logout(&self, token: &str) -> AuthResult<()> {
        self.jwt.blacklist_token(token.to_string()).await?;

        let mut stats = self.stats.write().await;
        stats.logouts += 1;
        Ok(())
    }

    /// Look up the user a token's subject refers to
    pub async fn profile(&self, user_id: &str) -> AuthResult<User> {
        let id = parse_user_id(user_id)?;
        debug!("Fetching profile for user id {}", id);
        self.users
            .get_user_by_id(id)
            .await
            .ok_or_else(|| AuthError::user_not_found("User not found".to_string()))
    }

    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> AuthResult<User> {
        let id = parse_user_id(user_id)?;
        self.users
            .change_password(id, current_password, new_password)
            .await
    }

    pub async fn get_stats(&self) -> AuthStats {
        self.stats.read().await.clone()
    }

    async fn issue(&self, user: User) -> AuthResult<AuthResponse> {
        let (token, expires_at) = self
            .jwt
            .generate_token(user.token_subject(), user.username.clone())
            .await?;
        Ok(AuthResponse {
            token,
            user,
            expires_at,
        })
    }
}

fn parse_user_id(user_id: &str) -> AuthResult<u64> {
    user_id
        .parse::<u64>()
        .map_err(|_| AuthError::user_not_found("User not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{JwtConfig, UserConfig};

    async fn service() -> AuthService {
        AuthService::new(AuthConfig {
            jwt: JwtConfig::default(),
            users: UserConfig::lightweight(),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_login_issues_valid_token() {
        let auth = service().await;
        let response = auth.login("admin", "admin123").await.unwrap();

        assert_eq!(response.user.id, 1);
        assert!(response.expires_at > Utc::now().timestamp());

        let claims = auth.validate(&response.token).await.unwrap();
        assert_eq!(claims.user_id, "1");
        assert_eq!(claims.username, "admin");
    }

    #[tokio::test]
    async fn test_login_failure_counts() {
        let auth = service().await;
        assert!(matches!(
            auth.login("admin", "nope").await,
            Err(AuthError::InvalidCredentials(_))
        ));
        assert_eq!(auth.get_stats().await.failed_logins, 1);
    }

    #[tokio::test]
    async fn test_register_then_profile() {
        let auth = service().await;
        let response = auth
            .register("newuser", "new@example.com", "password1")
            .await
            .unwrap();

        let claims = auth.validate(&response.token).await.unwrap();
        let profile = auth.profile(&claims.user_id).await.unwrap();
        assert_eq!(profile.username, "newuser");
        assert_eq!(profile.email, "new@example.com");

        // Registered users can log in afterwards
        assert!(auth.login("newuser", "password1").await.is_ok());
    }

    #[tokio::test]
    async fn test_profile_unknown_user() {
        let auth = service().await;
        assert!(matches!(auth.profile("42").await, Err(AuthError::UserNotFound(_))));
        assert!(matches!(auth.profile("abc").await, Err(AuthError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let auth = service().await;
        let response = auth.login("admin", "admin123").await.unwrap();
        auth.logout(&response.token).await.unwrap();

        let err = auth.validate(&response.token).await.unwrap_err();
        assert!(err.is_token_error());
        assert_eq!(auth.get_stats().await.logouts, 1);
    }
}
