//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Middleware for the console API

pub mod auth;
pub mod logging;
pub mod rate_limit;
pub mod security;
pub mod utils;

pub use auth::{auth_middleware, AuthToken};
pub use logging::logging_middleware;
pub use rate_limit::{client_identifier, rate_limit_middleware, RateLimiter};
pub use security::{cors_middleware, security_headers_middleware};
pub use utils::{request_id_middleware, sanitize_string, truncate_string, RequestContext};
