//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Cluster registry handlers

use axum::extract::{rejection::JsonRejection, Json, Path, State};

use super::json_body;
use crate::{
    constants::*,
    error::{kafka_error, ApiResult},
    middleware::sanitize_string,
    rest::AppState,
    types::{AddClusterRequest, ApiResponse, NamedResource},
};

pub async fn list_clusters_handler(State(state): State<AppState>) -> ApiResponse<Vec<String>> {
    ApiResponse::success(state.registry.list_clusters().await, MSG_CLUSTERS_RETRIEVED)
}

pub async fn add_cluster_handler(
    State(state): State<AppState>,
    body: Result<Json<AddClusterRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<NamedResource>> {
    let request = json_body(body, MSG_INVALID_REQUEST)?;
    let name = sanitize_string(request.name.trim());
    let brokers: Vec<String> = request.brokers.iter().map(|b| b.trim().to_string()).collect();

    state
        .registry
        .add_cluster(&name, brokers)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_ADD_CLUSTER, e))?;

    Ok(ApiResponse::success(NamedResource::new(name), MSG_CLUSTER_ADDED))
}

pub async fn remove_cluster_handler(
    State(state): State<AppState>,
    Path(cluster): Path<String>,
) -> ApiResult<ApiResponse<NamedResource>> {
    state
        .registry
        .remove_cluster(&cluster)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_REMOVE_CLUSTER, e))?;

    Ok(ApiResponse::success(NamedResource::new(cluster), MSG_CLUSTER_REMOVED))
}
