//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Broker handlers

use axum::extract::{Path, State};
use console_kafka::Broker;

use crate::{
    constants::{MSG_BROKERS_RETRIEVED, MSG_FAILED_TO_GET_BROKERS},
    error::{kafka_error, ApiResult},
    rest::AppState,
    types::ApiResponse,
};

pub async fn list_brokers_handler(
    State(state): State<AppState>,
    Path(cluster): Path<String>,
) -> ApiResult<ApiResponse<Vec<Broker>>> {
    let brokers = state
        .services
        .brokers
        .get_brokers(&cluster)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_GET_BROKERS, e))?;

    Ok(ApiResponse::success(brokers, MSG_BROKERS_RETRIEVED))
}
