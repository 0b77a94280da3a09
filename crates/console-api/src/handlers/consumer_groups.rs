//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Consumer group handlers

use axum::extract::{Path, State};
use console_kafka::{ConsumerGroupDetails, ConsumerGroupSummary};

use crate::{
    constants::*,
    error::{kafka_error, ApiResult},
    rest::AppState,
    types::ApiResponse,
};

pub async fn list_consumer_groups_handler(
    State(state): State<AppState>,
    Path(cluster): Path<String>,
) -> ApiResult<ApiResponse<Vec<ConsumerGroupSummary>>> {
    let groups = state
        .services
        .consumer_groups
        .get_consumer_groups(&cluster)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_GET_CONSUMER_GROUPS, e))?;

    Ok(ApiResponse::success(groups, MSG_CONSUMER_GROUPS_RETRIEVED))
}

pub async fn consumer_group_details_handler(
    State(state): State<AppState>,
    Path((cluster, group)): Path<(String, String)>,
) -> ApiResult<ApiResponse<ConsumerGroupDetails>> {
    let details = state
        .services
        .consumer_groups
        .get_consumer_group_details(&cluster, &group)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_GET_CONSUMER_GROUP_DETAILS, e))?;

    Ok(ApiResponse::success(details, MSG_CONSUMER_GROUP_DETAILS_RETRIEVED))
}
