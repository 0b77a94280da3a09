//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Client library for the Kafka console
//!
//! [`ConsoleClient`] wraps every REST route. [`SessionContext`] tracks the
//! logged-in user and token, and [`ClusterContext`] tracks the known clusters
//! and the selected one.
//!
//! ```rust,no_run
//! use console_client::{ClusterContext, ConsoleClient, MemoryTokenStore, SessionContext};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), console_client::ClientError> {
//! let client = ConsoleClient::with_base_url("http://localhost:8080/api")?;
//! let session = SessionContext::new(client, Arc::new(MemoryTokenStore::new()));
//! session.restore().await?;
//! session.login("admin", "admin123").await;
//!
//! let clusters = ClusterContext::new(session.clone());
//! clusters.refresh().await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod cluster;
pub mod constants;
pub mod error;
pub mod session;
pub mod store;
pub mod types;

pub use client::{ClientConfig, ConsoleClient};
pub use cluster::ClusterContext;
pub use error::{ClientError, ClientResult};
pub use session::SessionContext;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::{ActionOutcome, HealthResponse, NamedResource, ReplayResult};

/// Client crate version
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");
