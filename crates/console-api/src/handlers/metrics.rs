//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Cluster metrics handlers

use axum::extract::{Path, State};
use console_kafka::{BrokerMetrics, ClusterHealth, ConsumerGroupLag, ConsumerGroupMetrics, TopicMetrics};

use crate::{
    constants::*,
    error::{kafka_error, ApiResult},
    rest::AppState,
    types::ApiResponse,
};

pub async fn consumer_lag_handler(
    State(state): State<AppState>,
    Path(cluster): Path<String>,
) -> ApiResult<ApiResponse<Vec<ConsumerGroupLag>>> {
    let lag = state
        .services
        .metrics
        .get_consumer_groups_lag(&cluster)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_GET_CONSUMER_LAG, e))?;

    Ok(ApiResponse::success(lag, MSG_CONSUMER_LAG_RETRIEVED))
}

pub async fn cluster_health_handler(
    State(state): State<AppState>,
    Path(cluster): Path<String>,
) -> ApiResult<ApiResponse<ClusterHealth>> {
    let health = state
        .services
        .metrics
        .get_cluster_health(&cluster)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_GET_CLUSTER_HEALTH, e))?;

    Ok(ApiResponse::success(health, MSG_CLUSTER_HEALTH_RETRIEVED))
}

pub async fn broker_metrics_handler(
    State(state): State<AppState>,
    Path(cluster): Path<String>,
) -> ApiResult<ApiResponse<Vec<BrokerMetrics>>> {
    let metrics = state
        .services
        .metrics
        .get_broker_metrics(&cluster)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_GET_BROKER_METRICS, e))?;

    Ok(ApiResponse::success(metrics, MSG_BROKER_METRICS_RETRIEVED))
}

pub async fn topic_metrics_handler(
    State(state): State<AppState>,
    Path(cluster): Path<String>,
) -> ApiResult<ApiResponse<Vec<TopicMetrics>>> {
    let metrics = state
        .services
        .metrics
        .get_topic_metrics(&cluster)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_GET_TOPIC_METRICS, e))?;

    Ok(ApiResponse::success(metrics, MSG_TOPIC_METRICS_RETRIEVED))
}

pub async fn consumer_group_metrics_handler(
    State(state): State<AppState>,
    Path(cluster): Path<String>,
) -> ApiResult<ApiResponse<Vec<ConsumerGroupMetrics>>> {
    let metrics = state
        .services
        .metrics
        .get_consumer_group_metrics(&cluster)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_GET_CONSUMER_GROUP_METRICS, e))?;

    Ok(ApiResponse::success(metrics, MSG_CONSUMER_GROUP_METRICS_RETRIEVED))
}
