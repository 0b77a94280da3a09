//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Request handlers for the console API

pub mod auth;
pub mod brokers;
pub mod clusters;
pub mod consumer_groups;
pub mod health;
pub mod messages;
pub mod metrics;
pub mod topics;

pub use auth::*;
pub use brokers::*;
pub use clusters::*;
pub use consumer_groups::*;
pub use health::*;
pub use messages::*;
pub use metrics::*;
pub use topics::*;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query};

use crate::error::{validation_error, ApiResult};

/// Unwrap a JSON body, reporting rejections with `prefix`
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>, prefix: &str) -> ApiResult<T> {
    body.map(|Json(value)| value)
        .map_err(|e| validation_error(format!("{}{}", prefix, e.body_text())))
}

/// Unwrap a query string, reporting rejections with `prefix`
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>, prefix: &str) -> ApiResult<T> {
    query
        .map(|Query(value)| value)
        .map_err(|e| validation_error(format!("{}{}", prefix, e.body_text())))
}
