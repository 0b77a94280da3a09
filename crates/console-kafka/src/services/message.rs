//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Message browsing, search, produce and replay

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::admin::{ClusterAdmin, RawMessage, TopicMetadata};
use crate::cluster::ClusterRegistry;
use crate::constants::{MAX_MESSAGES_PER_PARTITION, MAX_SEARCH_SCAN_PER_PARTITION, MESSAGE_READ_DEADLINE_MS};
use crate::error::{KafkaError, KafkaResult};

const REPLAY_BATCH_SIZE: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
    Json,
    String,
    Avro,
    Protobuf,
}

impl fmt::Display for MessageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageFormat::Json => "json",
            MessageFormat::String => "string",
            MessageFormat::Avro => "avro",
            MessageFormat::Protobuf => "protobuf",
        };
        f.write_str(name)
    }
}

impl FromStr for MessageFormat {
    type Err = KafkaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(MessageFormat::Json),
            "string" => Ok(MessageFormat::String),
            "avro" => Ok(MessageFormat::Avro),
            "protobuf" => Ok(MessageFormat::Protobuf),
            other => Err(KafkaError::validation(&format!("unsupported message format: {}", other))),
        }
    }
}

/// Decoded message as shown by the console
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: String,
    pub value: Value,
    pub timestamp: Option<DateTime<Utc>>,
    pub format: MessageFormat,
}

impl From<RawMessage> for Message {
    fn from(raw: RawMessage) -> Self {
        let (value, format) = decode_value(raw.value.as_deref());
        Self {
            topic: raw.topic,
            partition: raw.partition,
            offset: raw.offset,
            key: raw
                .key
                .as_deref()
                .map(|k| String::from_utf8_lossy(k).into_owned())
                .unwrap_or_default(),
            value,
            timestamp: raw.timestamp,
            format,
        }
    }
}

/// JSON when the payload parses, otherwise a lossy UTF-8 string
pub fn decode_value(payload: Option<&[u8]>) -> (Value, MessageFormat) {
    let payload = payload.unwrap_or_default();
    match serde_json::from_slice::<Value>(payload) {
        Ok(value) => (value, MessageFormat::Json),
        Err(_) => (
            Value::String(String::from_utf8_lossy(payload).into_owned()),
            MessageFormat::String,
        ),
    }
}

fn within(timestamp: Option<DateTime<Utc>>, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    match timestamp {
        Some(ts) => start.map_or(true, |s| ts >= s) && end.map_or(true, |e| ts <= e),
        None => false,
    }
}

fn is_after(timestamp: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
    matches!((timestamp, end), (Some(ts), Some(end)) if ts > end)
}

/// Browse filter; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Keep only messages decoded in this format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<MessageFormat>,
}

impl MessageFilter {
    fn matches(&self, raw: &RawMessage) -> bool {
        if let Some(key) = self.key.as_deref().filter(|k| !k.is_empty()) {
            if raw.key.as_deref() != Some(key.as_bytes()) {
                return false;
            }
        }
        if let Some(value) = self.value.as_deref().filter(|v| !v.is_empty()) {
            if raw.value.as_deref().unwrap_or_default() != value.as_bytes() {
                return false;
            }
        }
        within(raw.timestamp, self.start_time, self.end_time)
    }
}

/// Search criteria
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageSearch {
    #[serde(default)]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl MessageSearch {
    fn matches(&self, raw: &RawMessage) -> bool {
        if !within(raw.timestamp, self.start_time, self.end_time) {
            return false;
        }
        if self.query.is_empty() {
            return true;
        }
        let contains = |bytes: Option<&[u8]>| {
            bytes
                .map(|b| String::from_utf8_lossy(b).contains(self.query.as_str()))
                .unwrap_or(false)
        };
        contains(raw.key.as_deref()) || contains(raw.value.as_deref())
    }
}

/// Produce request body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProduceRequest {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub format: Option<MessageFormat>,
}

impl ProduceRequest {
    /// Payload bytes: JSON for the json format, text otherwise
    pub fn encode_value(&self) -> KafkaResult<Vec<u8>> {
        if self.value.is_null() {
            return Err(KafkaError::validation("Message value is required"));
        }
        match (self.format, &self.value) {
            (Some(MessageFormat::Json), value) => serde_json::to_vec(value)
                .map_err(|e| KafkaError::serialization(&format!("Failed to marshal JSON: {}", e))),
            (_, Value::String(s)) => Ok(s.clone().into_bytes()),
            (_, value) => Ok(value.to_string().into_bytes()),
        }
    }

    fn encode_key(&self) -> Option<Vec<u8>> {
        self.key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(|k| k.as_bytes().to_vec())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProduceResult {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
}

#[derive(Debug, Clone)]
pub struct MessageService {
    registry: ClusterRegistry,
    read_deadline: Duration,
}

impl MessageService {
    pub fn new(registry: ClusterRegistry) -> Self {
        Self {
            registry,
            read_deadline: Duration::from_millis(MESSAGE_READ_DEADLINE_MS),
        }
    }

    /// Override the overall browse and search deadline
    pub fn with_read_deadline(mut self, deadline: Duration) -> Self {
        self.read_deadline = deadline;
        self
    }

    async fn resolve(&self, cluster: &str, topic: &str) -> KafkaResult<(std::sync::Arc<dyn ClusterAdmin>, TopicMetadata)> {
        let admin = self.registry.admin(cluster).await?;
        let metadata = admin.metadata().await?;
        let topic = metadata
            .topic(topic)
            .cloned()
            .ok_or_else(|| KafkaError::topic_not_found(topic))?;
        Ok((admin, topic))
    }

    /// Scan every partition from its low watermark, keeping matches
    ///
    /// Partitions are read in id order. Reading stops, returning what was
    /// collected, once the deadline passes.
    async fn scan<F>(
        &self,
        admin: &dyn ClusterAdmin,
        topic: &TopicMetadata,
        per_partition: usize,
        end_time: Option<DateTime<Utc>>,
        mut keep: F,
    ) -> KafkaResult<Vec<Message>>
    where
        F: FnMut(&RawMessage) -> bool,
    {
        let deadline = Instant::now() + self.read_deadline;
        let mut ids: Vec<i32> = topic.partitions.iter().map(|p| p.id).collect();
        ids.sort_unstable();

        let mut messages = Vec::new();
        for partition in ids {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                debug!("Read deadline reached for topic {}", topic.name);
                break;
            }

            let (low, _) = admin.watermarks(&topic.name, partition).await?;
            let fetch = admin.fetch_messages(&topic.name, partition, low, per_partition, remaining);
            let records = match tokio::time::timeout(remaining, fetch).await {
                Ok(records) => records?,
                Err(_) => {
                    debug!("Read deadline reached on {}[{}]", topic.name, partition);
                    break;
                }
            };

            for raw in records {
                if is_after(raw.timestamp, end_time) {
                    break;
                }
                if keep(&raw) {
                    messages.push(Message::from(raw));
                }
            }
        }

        Ok(messages)
    }

    /// Browse a topic with optional key, value, time and format filters
    pub async fn get_messages(&self, cluster: &str, topic: &str, filter: &MessageFilter) -> KafkaResult<Vec<Message>> {
        let (admin, metadata) = self.resolve(cluster, topic).await?;
        let messages = self
            .scan(
                admin.as_ref(),
                &metadata,
                MAX_MESSAGES_PER_PARTITION,
                filter.end_time,
                |raw| filter.matches(raw),
            )
            .await?;

        Ok(match filter.format {
            Some(format) => messages.into_iter().filter(|m| m.format == format).collect(),
            None => messages,
        })
    }

    /// Substring search over keys and values within a time range
    pub async fn search_messages(&self, cluster: &str, topic: &str, search: &MessageSearch) -> KafkaResult<Vec<Message>> {
        let (admin, metadata) = self.resolve(cluster, topic).await?;
        self.scan(
            admin.as_ref(),
            &metadata,
            MAX_SEARCH_SCAN_PER_PARTITION,
            search.end_time,
            |raw| search.matches(raw),
        )
        .await
    }

    pub async fn produce_message(&self, cluster: &str, topic: &str, request: &ProduceRequest) -> KafkaResult<ProduceResult> {
        let value = request.encode_value()?;
        let admin = self.registry.admin(cluster).await?;
        let (partition, offset) = admin.produce(topic, None, request.encode_key(), value).await?;

        debug!("Produced message to {}[{}] at offset {}", topic, partition, offset);
        Ok(ProduceResult {
            topic: topic.to_string(),
            partition,
            offset,
        })
    }

    /// Re-produce partition 0 records in `[start_offset, end_offset)`
    pub async fn replay_messages(&self, cluster: &str, topic: &str, start_offset: i64, end_offset: i64) -> KafkaResult<usize> {
        if start_offset < 0 || end_offset < 0 {
            return Err(KafkaError::validation("Offsets must not be negative"));
        }
        if start_offset > end_offset {
            return Err(KafkaError::validation("start_offset must not be greater than end_offset"));
        }

        let (admin, _) = self.resolve(cluster, topic).await?;
        let (_, high) = admin.watermarks(topic, 0).await?;
        // Records appended by the replay itself are never replayed
        let end = end_offset.min(high);

        let mut cursor = start_offset;
        let mut replayed = 0;
        while cursor < end {
            let batch = admin
                .fetch_messages(topic, 0, cursor, REPLAY_BATCH_SIZE, self.read_deadline)
                .await?;
            if batch.is_empty() {
                warn!("Replay of {} stopped early at offset {}", topic, cursor);
                break;
            }

            for raw in batch {
                if raw.offset >= end {
                    cursor = end;
                    break;
                }
                admin
                    .produce(topic, None, raw.key, raw.value.unwrap_or_default())
                    .await?;
                replayed += 1;
                cursor = raw.offset + 1;
            }
        }

        info!("Replayed {} messages on {} from offset {} to {}", replayed, topic, start_offset, end);
        Ok(replayed)
    }

    /// Check a payload against a named format
    pub fn validate_message(&self, format: &str, value: &Value) -> KafkaResult<()> {
        match format.parse::<MessageFormat>() {
            Ok(MessageFormat::Json) => serde_json::to_vec(value)
                .map(|_| ())
                .map_err(|e| KafkaError::validation(&format!("invalid JSON: {}", e))),
            // No schema registry, so binary formats are accepted as is
            Ok(MessageFormat::Avro) | Ok(MessageFormat::Protobuf) => Ok(()),
            Ok(MessageFormat::String) | Err(_) => Err(KafkaError::validation(&format!(
                "unsupported message format: {}",
                format
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::admin::InMemoryAdmin;
    use crate::services::testing::registry_with;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    async fn seeded() -> (Arc<InMemoryAdmin>, MessageService) {
        let admin = Arc::new(InMemoryAdmin::new());
        admin.create_topic("events", 2, 1).await.unwrap();

        admin
            .append("events", 0, Some(b"user-1".to_vec()), br#"{"action":"login"}"#.to_vec(), at(0))
            .await
            .unwrap();
        admin
            .append("events", 0, Some(b"user-2".to_vec()), b"plain text".to_vec(), at(10))
            .await
            .unwrap();
        admin
            .append("events", 0, Some(b"user-1".to_vec()), br#"{"action":"logout"}"#.to_vec(), at(20))
            .await
            .unwrap();
        admin
            .append("events", 1, None, b"42".to_vec(), at(5))
            .await
            .unwrap();

        let service = MessageService::new(registry_with(admin.clone()).await);
        (admin, service)
    }

    #[tokio::test]
    async fn test_get_messages_decodes_values() {
        let (_, service) = seeded().await;
        let messages = service
            .get_messages("local", "events", &MessageFilter::default())
            .await
            .unwrap();

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].value, json!({"action": "login"}));
        assert_eq!(messages[0].format, MessageFormat::Json);
        assert_eq!(messages[1].value, json!("plain text"));
        assert_eq!(messages[1].format, MessageFormat::String);
        assert_eq!(messages[3].partition, 1);
        assert_eq!(messages[3].key, "");
        assert_eq!(messages[3].value, json!(42));
    }

    #[tokio::test]
    async fn test_get_messages_filters() {
        let (_, service) = seeded().await;

        let by_key = MessageFilter {
            key: Some("user-1".to_string()),
            ..MessageFilter::default()
        };
        let messages = service.get_messages("local", "events", &by_key).await.unwrap();
        assert_eq!(messages.iter().map(|m| m.offset).collect::<Vec<_>>(), vec![0, 2]);

        let by_value = MessageFilter {
            value: Some("plain text".to_string()),
            ..MessageFilter::default()
        };
        assert_eq!(service.get_messages("local", "events", &by_value).await.unwrap().len(), 1);

        let by_format = MessageFilter {
            format: Some(MessageFormat::String),
            ..MessageFilter::default()
        };
        assert_eq!(service.get_messages("local", "events", &by_format).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_time_range_stops_partition_scan() {
        let (_, service) = seeded().await;
        let filter = MessageFilter {
            start_time: Some(at(5)),
            end_time: Some(at(10)),
            ..MessageFilter::default()
        };

        let messages = service.get_messages("local", "events", &filter).await.unwrap();
        let found: Vec<(i32, i64)> = messages.iter().map(|m| (m.partition, m.offset)).collect();
        assert_eq!(found, vec![(0, 1), (1, 0)]);
    }

    #[tokio::test]
    async fn test_unknown_topic() {
        let (_, service) = seeded().await;
        let result = service.get_messages("local", "missing", &MessageFilter::default()).await;
        assert!(matches!(result, Err(KafkaError::TopicNotFound(_))));
    }

    #[tokio::test]
    async fn test_search_messages() {
        let (_, service) = seeded().await;

        let search = MessageSearch {
            query: "log".to_string(),
            ..MessageSearch::default()
        };
        let found = service.search_messages("local", "events", &search).await.unwrap();
        assert_eq!(found.len(), 2);

        let search = MessageSearch {
            query: "user-2".to_string(),
            ..MessageSearch::default()
        };
        let found = service.search_messages("local", "events", &search).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].offset, 1);

        let search = MessageSearch {
            query: "log".to_string(),
            start_time: Some(at(15)),
            end_time: None,
        };
        assert_eq!(service.search_messages("local", "events", &search).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_produce_message_formats() {
        let (admin, service) = seeded().await;

        let request = ProduceRequest {
            key: Some("k".to_string()),
            value: json!({"a": 1}),
            format: Some(MessageFormat::Json),
        };
        let result = service.produce_message("local", "events", &request).await.unwrap();
        assert_eq!(result.topic, "events");

        let stored = admin
            .fetch_messages("events", result.partition, result.offset, 1, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(stored[0].value.as_deref(), Some(&br#"{"a":1}"#[..]));
        assert_eq!(stored[0].key.as_deref(), Some(&b"k"[..]));

        let text = ProduceRequest {
            key: None,
            value: json!("hello"),
            format: Some(MessageFormat::String),
        };
        let result = service.produce_message("local", "events", &text).await.unwrap();
        let stored = admin
            .fetch_messages("events", result.partition, result.offset, 1, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(stored[0].value.as_deref(), Some(&b"hello"[..]));
        assert!(stored[0].key.is_none());

        let missing = ProduceRequest::default();
        let err = service.produce_message("local", "events", &missing).await.unwrap_err();
        assert_eq!(err.to_string(), "Message value is required");
    }

    #[tokio::test]
    async fn test_replay_messages() {
        let (admin, service) = seeded().await;

        let count = service.replay_messages("local", "events", 1, 3).await.unwrap();
        assert_eq!(count, 2);

        let (_, high0) = admin.watermarks("events", 0).await.unwrap();
        let (_, high1) = admin.watermarks("events", 1).await.unwrap();
        assert_eq!(high0 + high1, 6);

        // End past the log is clamped to the high watermark at start
        let (_, before) = admin.watermarks("events", 0).await.unwrap();
        let count = service.replay_messages("local", "events", 0, 1_000).await.unwrap();
        assert_eq!(count as i64, before);

        assert!(matches!(
            service.replay_messages("local", "events", 3, 1).await,
            Err(KafkaError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_validate_message() {
        let (_, service) = seeded().await;
        assert!(service.validate_message("json", &json!({"a": [1, 2]})).is_ok());
        assert!(service.validate_message("avro", &json!({})).is_ok());
        assert!(service.validate_message("protobuf", &json!("x")).is_ok());

        let err = service.validate_message("xml", &json!("<a/>")).unwrap_err();
        assert_eq!(err.to_string(), "unsupported message format: xml");
        assert!(service.validate_message("string", &json!("x")).is_err());
    }
}
