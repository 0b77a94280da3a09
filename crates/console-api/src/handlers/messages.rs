//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Message browse, produce, replay, search and validation handlers

use axum::extract::{
    rejection::{JsonRejection, QueryRejection},
    Json, Path, Query, State,
};
use console_kafka::{Message, MessageFilter, MessageFormat, MessageSearch, ProduceRequest, ProduceResult};
use tracing::debug;

use super::{json_body, query_params};
use crate::{
    constants::*,
    error::{kafka_error, validation_error, ApiResult},
    middleware::{sanitize_string, truncate_string},
    rest::AppState,
    types::{ApiResponse, MessageQuery, ReplayQuery, ReplayResult, ValidateMessageRequest},
};

/// Longest key written to debug logs
const MAX_LOGGED_KEY_LEN: usize = 64;

impl TryFrom<MessageQuery> for MessageFilter {
    type Error = console_kafka::KafkaError;

    fn try_from(query: MessageQuery) -> Result<Self, Self::Error> {
        let format = query
            .format
            .as_deref()
            .filter(|f| !f.is_empty())
            .map(str::parse::<MessageFormat>)
            .transpose()?;

        Ok(MessageFilter {
            key: query.key.map(|k| sanitize_string(&k)),
            value: query.value.map(|v| sanitize_string(&v)),
            start_time: query.start_time,
            end_time: query.end_time,
            format,
        })
    }
}

pub async fn get_messages_handler(
    State(state): State<AppState>,
    Path((cluster, topic)): Path<(String, String)>,
    query: Result<Query<MessageQuery>, QueryRejection>,
) -> ApiResult<ApiResponse<Vec<Message>>> {
    let query = query_params(query, MSG_INVALID_REQUEST)?;
    let filter = MessageFilter::try_from(query).map_err(|e| kafka_error(MSG_INVALID_REQUEST, e))?;

    let messages = state
        .services
        .messages
        .get_messages(&cluster, &topic, &filter)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_GET_MESSAGES, e))?;

    Ok(ApiResponse::success(messages, MSG_MESSAGES_RETRIEVED))
}

pub async fn produce_message_handler(
    State(state): State<AppState>,
    Path((cluster, topic)): Path<(String, String)>,
    body: Result<Json<ProduceRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<ProduceResult>> {
    let request = json_body(body, MSG_INVALID_REQUEST)?;
    debug!(
        "Producing to {} on {} with key {:?}",
        topic,
        cluster,
        request.key.as_deref().map(|k| truncate_string(k, MAX_LOGGED_KEY_LEN))
    );

    let result = state
        .services
        .messages
        .produce_message(&cluster, &topic, &request)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_PRODUCE_MESSAGE, e))?;

    Ok(ApiResponse::success(result, MSG_MESSAGE_PRODUCED))
}

pub async fn replay_messages_handler(
    State(state): State<AppState>,
    Path((cluster, topic)): Path<(String, String)>,
    query: Result<Query<ReplayQuery>, QueryRejection>,
) -> ApiResult<ApiResponse<ReplayResult>> {
    let query = query_params(query, MSG_INVALID_REQUEST)?;

    let replayed = state
        .services
        .messages
        .replay_messages(&cluster, &topic, query.start_offset, query.end_offset)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_REPLAY_MESSAGES, e))?;

    Ok(ApiResponse::success(
        ReplayResult { topic, replayed },
        MSG_MESSAGES_REPLAYED,
    ))
}

pub async fn search_messages_handler(
    State(state): State<AppState>,
    Path((cluster, topic)): Path<(String, String)>,
    query: Result<Query<MessageSearch>, QueryRejection>,
) -> ApiResult<ApiResponse<Vec<Message>>> {
    let mut search = query_params(query, MSG_INVALID_REQUEST)?;
    search.query = sanitize_string(&search.query);
    if search.query.is_empty() {
        return Err(validation_error(MSG_SEARCH_QUERY_REQUIRED));
    }

    let messages = state
        .services
        .messages
        .search_messages(&cluster, &topic, &search)
        .await
        .map_err(|e| kafka_error(MSG_FAILED_TO_SEARCH_MESSAGES, e))?;

    Ok(ApiResponse::success(messages, MSG_MESSAGES_RETRIEVED))
}

pub async fn validate_message_handler(
    State(state): State<AppState>,
    Path(cluster): Path<String>,
    body: Result<Json<ValidateMessageRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<()>> {
    let request = json_body(body, MSG_INVALID_REQUEST)?;
    state.registry.get(&cluster).await?;

    state
        .services
        .messages
        .validate_message(&request.format, &request.value)?;

    Ok(ApiResponse::success((), MSG_MESSAGE_VALID))
}
