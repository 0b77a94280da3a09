//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Authentication configuration

use serde::{Deserialize, Serialize};

/// Authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT settings
    #[serde(default)]
    pub jwt: JwtConfig,

    /// User store settings
    #[serde(default)]
    pub users: UserConfig,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// HMAC secret used for HS256 signing
    pub secret: String,

    /// Token lifetime in seconds
    pub expiration_secs: u64,

    /// Issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: crate::DEFAULT_JWT_SECRET.to_string(),
            expiration_secs: crate::DEFAULT_JWT_EXPIRATION_SECS,
            issuer: "kafka-console".to_string(),
        }
    }
}

impl JwtConfig {
    /// Whether the placeholder secret is still in use
    pub fn uses_default_secret(&self) -> bool {
        self.secret == crate::DEFAULT_JWT_SECRET
    }
}

/// User store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Minimum password length for new and changed passwords
    pub min_password_length: usize,

    /// Seed the built-in administrator account on startup
    pub seed_admin: bool,

    /// Administrator username
    pub admin_username: String,

    /// Administrator password
    pub admin_password: String,

    /// Administrator email
    pub admin_email: String,

    /// Argon2 memory cost in KiB
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count
    pub argon2_iterations: u32,

    /// Argon2 lanes
    pub argon2_parallelism: u32,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            min_password_length: crate::DEFAULT_MIN_PASSWORD_LENGTH,
            seed_admin: true,
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            admin_email: "admin@kafka-ui.com".to_string(),
            argon2_memory_kib: 19 * 1024,
            argon2_iterations: 2,
            argon2_parallelism: 1,
        }
    }
}

impl UserConfig {
    /// Cheap hashing parameters for tests
    pub fn lightweight() -> Self {
        Self {
            argon2_memory_kib: 64,
            argon2_iterations: 1,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert!(!config.secret.is_empty());
        assert_eq!(config.expiration_secs, crate::DEFAULT_JWT_EXPIRATION_SECS);
        assert_eq!(config.issuer, "kafka-console");
        assert!(config.uses_default_secret());

        let custom = JwtConfig {
            secret: "s3cr3t".to_string(),
            ..JwtConfig::default()
        };
        assert!(!custom.uses_default_secret());
    }

    #[test]
    fn test_user_config_default_seeds_admin() {
        let config = UserConfig::default();
        assert!(config.seed_admin);
        assert_eq!(config.admin_username, "admin");
        assert_eq!(config.admin_email, "admin@kafka-ui.com");
        assert_eq!(config.min_password_length, 6);
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: AuthConfig =
            serde_json::from_str(r#"{"jwt": {"secret": "s3cret"}}"#).unwrap();
        assert_eq!(config.jwt.secret, "s3cret");
        assert_eq!(config.jwt.issuer, "kafka-console");
        assert!(config.users.seed_admin);
    }
}
