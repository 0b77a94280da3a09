//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Topic handlers

use axum::extract::{rejection::JsonRejection, Json, Path, State};
use console_kafka::{CreateTopicRequest, TopicDetails, TopicSummary};

use super::json_body;
use crate::{
    constants::*,
    error::{kafka_error, ApiResult},
    rest::AppState,
    types::{ApiResponse, NamedResource},
};

pub async fn list_topics_handler(
    State(state): State<AppState>,
    Path(cluster): Path<String>,
) -> ApiResult<ApiResponse<Vec<TopicSummary>>> {
    let topics = state
        .services
        .topics
        .get_topics(&cluster)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_GET_TOPICS, e))?;

    Ok(ApiResponse::success(topics, MSG_TOPICS_RETRIEVED))
}

pub async fn topic_details_handler(
    State(state): State<AppState>,
    Path((cluster, topic)): Path<(String, String)>,
) -> ApiResult<ApiResponse<TopicDetails>> {
    let details = state
        .services
        .topics
        .get_topic_details(&cluster, &topic)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_GET_TOPIC_DETAILS, e))?;

    Ok(ApiResponse::success(details, MSG_TOPIC_DETAILS_RETRIEVED))
}

pub async fn create_topic_handler(
    State(state): State<AppState>,
    Path(cluster): Path<String>,
    body: Result<Json<CreateTopicRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<NamedResource>> {
    let request = json_body(body, MSG_INVALID_REQUEST)?;

    state
        .services
        .topics
        .create_topic(&cluster, &request)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_CREATE_TOPIC, e))?;

    let message = format!("Topic {} created successfully", request.name);
    Ok(ApiResponse::success(NamedResource::new(request.name), message))
}

pub async fn delete_topic_handler(
    State(state): State<AppState>,
    Path((cluster, topic)): Path<(String, String)>,
) -> ApiResult<ApiResponse<NamedResource>> {
    state
        .services
        .topics
        .delete_topic(&cluster, &topic)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_DELETE_TOPIC, e))?;

    let message = format!("Topic {} deleted successfully", topic);
    Ok(ApiResponse::success(NamedResource::new(topic), message))
}
