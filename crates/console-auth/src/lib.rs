//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Authentication for the Kafka console
//!
//! Session tokens are HS256 JWTs carrying the user id and username. Users live in an
//! in-memory store with argon2 password hashes; the administrator account is seeded on
//! startup unless disabled.
//!
//! ```rust,no_run
//! use console_auth::{AuthConfig, AuthService};
//!
//! # async fn run() -> Result<(), console_auth::AuthError> {
//! let auth = AuthService::new(AuthConfig::default()).await?;
//! let session = auth.login("admin", "admin123").await?;
//! let claims = auth.validate(&session.token).await?;
//! assert_eq!(claims.username, "admin");
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod jwt;
pub mod users;

pub use auth::{AuthError, AuthResponse, AuthResult, AuthService, AuthStats};
pub use config::{AuthConfig, JwtConfig, UserConfig};
pub use jwt::{JwtClaims, JwtManager, JwtStats};
pub use users::{User, UserManager, UserStats};

/// Authentication crate version
pub const AUTH_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Placeholder signing secret shipped in the default configuration
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";

/// Default JWT expiration time in seconds (24 hours)
pub const DEFAULT_JWT_EXPIRATION_SECS: u64 = 24 * 60 * 60;

/// Default minimum password length
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// Initialize the authentication service
pub async fn init_auth_system(config: AuthConfig) -> AuthResult<AuthService> {
    tracing::info!("Initializing authentication system v{}", AUTH_VERSION);

    let service = AuthService::new(config).await?;

    tracing::info!("Authentication system initialization completed");
    Ok(service)
}
