//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Typed HTTP client for the console REST API
//!
//! Every call unwraps the `{"success", "data", "message"}` envelope. Failure
//! envelopes become [`ClientError::Api`] carrying the server's error type, the
//! most specific message available and the HTTP status.

use std::sync::Arc;
use std::time::Duration;

use console_auth::{AuthResponse, User};
use console_kafka::{
    Broker, BrokerMetrics, ClusterHealth, ConsumerGroupDetails, ConsumerGroupLag, ConsumerGroupMetrics,
    ConsumerGroupSummary, CreateTopicRequest, Message, MessageFilter, MessageSearch, ProduceRequest,
    ProduceResult, TopicDetails, TopicMetrics, TopicSummary,
};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::{
    constants::*,
    error::{ClientError, ClientResult},
    types::{HealthResponse, NamedResource, ReplayResult},
};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, including the `/api` prefix
    pub base_url: String,

    pub timeout: Duration,

    /// Attempts for GET requests that fail in transport
    pub retry_attempts: u32,

    pub retry_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(API_TIMEOUT_MS),
            retry_attempts: RETRY_ATTEMPTS,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults with the base URL taken from `KAFKA_CONSOLE_API_URL` when set
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }
}

/// Console REST client
///
/// Clones share the bearer token.
#[derive(Debug, Clone)]
pub struct ConsoleClient {
    http: reqwest::Client,
    base_url: Url,
    config: ClientConfig,
    token: Arc<RwLock<Option<String>>>,
}

impl ConsoleClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::configuration(format!("Invalid base URL {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::configuration(format!(
                "Invalid base URL {}",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            config,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn with_base_url(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::new(ClientConfig::new(base_url))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    // Health

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        self.get(&["health"]).await
    }

    // Authentication

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<AuthResponse> {
        let body = json!({ "username": username, "password": password });
        self.send(Method::POST, &["auth", "login"], &body).await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let body = json!({ "username": username, "email": email, "password": password });
        self.send(Method::POST, &["auth", "register"], &body).await
    }

    pub async fn get_profile(&self) -> ClientResult<User> {
        self.get(&["auth", "profile"]).await
    }

    pub async fn change_password(&self, current_password: &str, new_password: &str) -> ClientResult<User> {
        let body = json!({
            "current_password": current_password,
            "new_password": new_password,
        });
        self.send(Method::PUT, &["auth", "change-password"], &body).await
    }

    /// Revoke the current token on the server
    pub async fn logout(&self) -> ClientResult<()> {
        self.send(Method::POST, &["auth", "logout"], &Value::Null).await
    }

    // Clusters

    pub async fn get_clusters(&self) -> ClientResult<Vec<String>> {
        self.get(&["clusters"]).await
    }

    pub async fn add_cluster(&self, name: &str, brokers: &[String]) -> ClientResult<NamedResource> {
        let body = json!({ "name": name, "brokers": brokers });
        self.send(Method::POST, &["clusters"], &body).await
    }

    pub async fn remove_cluster(&self, name: &str) -> ClientResult<NamedResource> {
        self.delete(&["clusters", name]).await
    }

    // Topics

    pub async fn get_topics(&self, cluster: &str) -> ClientResult<Vec<TopicSummary>> {
        self.get(&["clusters", cluster, "topics"]).await
    }

    pub async fn create_topic(&self, cluster: &str, request: &CreateTopicRequest) -> ClientResult<NamedResource> {
        let body = serde_json::to_value(request)?;
        self.send(Method::POST, &["clusters", cluster, "topics"], &body).await
    }

    pub async fn get_topic_details(&self, cluster: &str, topic: &str) -> ClientResult<TopicDetails> {
        self.get(&["clusters", cluster, "topics", topic]).await
    }

    pub async fn delete_topic(&self, cluster: &str, topic: &str) -> ClientResult<NamedResource> {
        self.delete(&["clusters", cluster, "topics", topic]).await
    }

    // Brokers and consumer groups

    pub async fn get_brokers(&self, cluster: &str) -> ClientResult<Vec<Broker>> {
        self.get(&["clusters", cluster, "brokers"]).await
    }

    pub async fn get_consumer_groups(&self, cluster: &str) -> ClientResult<Vec<ConsumerGroupSummary>> {
        self.get(&["clusters", cluster, "consumer-groups"]).await
    }

    pub async fn get_consumer_group_details(&self, cluster: &str, group_id: &str) -> ClientResult<ConsumerGroupDetails> {
        self.get(&["clusters", cluster, "consumer-groups", group_id]).await
    }

    // Messages

    pub async fn get_messages(&self, cluster: &str, topic: &str, filter: &MessageFilter) -> ClientResult<Vec<Message>> {
        let url = self.url(&["clusters", cluster, "topics", topic, "messages"])?;
        let request = self.http.get(url).query(filter);
        self.execute(request, true).await
    }

    pub async fn produce_message(&self, cluster: &str, topic: &str, request: &ProduceRequest) -> ClientResult<ProduceResult> {
        let body = serde_json::to_value(request)?;
        self.send(Method::POST, &["clusters", cluster, "topics", topic, "messages"], &body)
            .await
    }

    pub async fn replay_messages(
        &self,
        cluster: &str,
        topic: &str,
        start_offset: i64,
        end_offset: i64,
    ) -> ClientResult<ReplayResult> {
        let url = self.url(&["clusters", cluster, "topics", topic, "messages", "replay"])?;
        let request = self
            .http
            .post(url)
            .query(&[("start_offset", start_offset), ("end_offset", end_offset)]);
        self.execute(request, false).await
    }

    pub async fn search_messages(&self, cluster: &str, topic: &str, search: &MessageSearch) -> ClientResult<Vec<Message>> {
        let url = self.url(&["clusters", cluster, "topics", topic, "messages", "search"])?;
        let request = self.http.get(url).query(search);
        self.execute(request, true).await
    }

    pub async fn validate_message(&self, cluster: &str, format: &str, value: &Value) -> ClientResult<()> {
        let body = json!({ "format": format, "value": value });
        self.send(Method::POST, &["clusters", cluster, "messages", "validate"], &body)
            .await
    }

    // Metrics

    pub async fn get_consumer_lag(&self, cluster: &str) -> ClientResult<Vec<ConsumerGroupLag>> {
        self.get(&["clusters", cluster, "metrics", "consumer-lag"]).await
    }

    pub async fn get_cluster_health(&self, cluster: &str) -> ClientResult<ClusterHealth> {
        self.get(&["clusters", cluster, "metrics", "cluster-health"]).await
    }

    pub async fn get_broker_metrics(&self, cluster: &str) -> ClientResult<Vec<BrokerMetrics>> {
        self.get(&["clusters", cluster, "metrics", "brokers"]).await
    }

    pub async fn get_topic_metrics(&self, cluster: &str) -> ClientResult<Vec<TopicMetrics>> {
        self.get(&["clusters", cluster, "metrics", "topics"]).await
    }

    pub async fn get_consumer_group_metrics(&self, cluster: &str) -> ClientResult<Vec<ConsumerGroupMetrics>> {
        self.get(&["clusters", cluster, "metrics", "consumer-groups"]).await
    }

    /// Base URL joined with percent-encoded path segments
    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::configuration("Base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        let request = self.http.get(self.url(segments)?);
        self.execute(request, true).await
    }

    async fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        let request = self.http.delete(self.url(segments)?);
        self.execute(request, false).await
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, segments: &[&str], body: &Value) -> ClientResult<T> {
        let mut request = self.http.request(method, self.url(segments)?);
        if !body.is_null() {
            request = request.json(body);
        }
        self.execute(request, false).await
    }

    /// Send with the bearer token, retrying transport failures when idempotent
    async fn execute<T: DeserializeOwned>(&self, mut request: RequestBuilder, idempotent: bool) -> ClientResult<T> {
        if let Some(token) = self.token().await {
            request = request.bearer_auth(token);
        }

        let attempts = if idempotent {
            self.config.retry_attempts.max(1)
        } else {
            1
        };

        let mut last_error = None;
        for attempt in 1..=attempts {
            let req = request
                .try_clone()
                .ok_or_else(|| ClientError::http("Request cannot be cloned for sending"))?;

            match req.send().await {
                Ok(response) => return decode_response(response).await,
                Err(e) => {
                    let err = ClientError::from(e);
                    if attempt < attempts && err.is_transient() {
                        warn!(attempt, "Request failed, retrying: {}", err);
                        tokio::time::sleep(self.config.retry_delay).await;
                        last_error = Some(err);
                    } else {
                        return Err(err);
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ClientError::http(MSG_REQUEST_FAILED)))
    }
}

async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    let bytes = response.bytes().await?;
    debug!(status = status.as_u16(), bytes = bytes.len(), "Response received");

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(ClientError::api("HTTP_ERROR", MSG_REQUEST_FAILED, status.as_u16()))
            }
            Err(e) => return Err(ClientError::decode(format!("Invalid response body: {}", e))),
        }
    };

    unwrap_envelope(status.as_u16(), body)
}

/// Extract `data` from a success envelope or build the error from a failure
pub(crate) fn unwrap_envelope<T: DeserializeOwned>(status: u16, body: Value) -> ClientResult<T> {
    let success = (200..300).contains(&status);

    match body.get("success").and_then(Value::as_bool) {
        Some(true) => {
            let data = body.get("data").cloned().unwrap_or(Value::Null);
            Ok(serde_json::from_value(data)?)
        }
        Some(false) => Err(envelope_error(status, &body)),
        // Bodies without an envelope pass through untouched
        None if success => Ok(serde_json::from_value(body)?),
        None => Err(envelope_error(status, &body)),
    }
}

fn envelope_error(status: u16, body: &Value) -> ClientError {
    let error = body.get("error");
    let non_empty = |v: &Value| v.as_str().filter(|s| !s.is_empty()).map(str::to_string);

    let message = error
        .and_then(|e| e.get("message"))
        .and_then(non_empty)
        .or_else(|| body.get("message").and_then(non_empty))
        .unwrap_or_else(|| MSG_REQUEST_FAILED.to_string());

    let error_type = error
        .and_then(|e| e.get("type"))
        .and_then(non_empty)
        .unwrap_or_else(|| "UNKNOWN".to_string());

    ClientError::api(error_type, message, status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_success_envelope() {
        let body = json!({"success": true, "data": ["local", "prod"], "message": "ok"});
        let clusters: Vec<String> = unwrap_envelope(200, body).unwrap();
        assert_eq!(clusters, vec!["local", "prod"]);

        let body = json!({"success": true, "data": null, "message": "Logged out successfully"});
        unwrap_envelope::<()>(200, body).unwrap();
    }

    #[test]
    fn test_error_message_fallbacks() {
        let body = json!({"success": false, "error": {"type": "NOT_FOUND", "message": "cluster 'x' not found", "code": 404}});
        match unwrap_envelope::<Value>(404, body).unwrap_err() {
            ClientError::Api { error_type, message, status } => {
                assert_eq!(error_type, "NOT_FOUND");
                assert_eq!(message, "cluster 'x' not found");
                assert_eq!(status, 404);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let body = json!({"success": false, "message": "Something broke"});
        let err = unwrap_envelope::<Value>(200, body).unwrap_err();
        assert_eq!(err.to_string(), "Something broke");

        let err = unwrap_envelope::<Value>(500, json!({"success": false})).unwrap_err();
        assert_eq!(err.to_string(), "Request failed");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_plain_bodies_pass_through() {
        let value: Vec<i32> = unwrap_envelope(200, json!([1, 2])).unwrap();
        assert_eq!(value, vec![1, 2]);
        assert!(unwrap_envelope::<Value>(502, json!("bad gateway")).is_err());
    }

    #[test]
    fn test_url_encodes_segments() {
        let client = ConsoleClient::with_base_url("http://localhost:8080/api").unwrap();
        let url = client.url(&["clusters", "my cluster", "topics"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/clusters/my%20cluster/topics");

        let client = ConsoleClient::with_base_url("http://localhost:8080/api/").unwrap();
        let url = client.url(&["health"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/health");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ConsoleClient::with_base_url("not a url"),
            Err(ClientError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_routes_against_server() {
        let server = crate::test_support::spawn_server().await;
        let client = ConsoleClient::with_base_url(&server.base_url).unwrap();

        let health = client.health().await.unwrap();
        assert_eq!(health.status, "healthy");

        let err = client.get_clusters().await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message(), "Authorization header required");

        let session = client.login("admin", "admin123").await.unwrap();
        client.set_token(Some(session.token)).await;
        assert_eq!(client.get_profile().await.unwrap().username, "admin");
        assert_eq!(client.get_clusters().await.unwrap(), vec!["local"]);

        let request = CreateTopicRequest {
            name: "orders".to_string(),
            partitions: 2,
            replicas: 1,
        };
        assert_eq!(client.create_topic("local", &request).await.unwrap().name, "orders");
        let topics = client.get_topics("local").await.unwrap();
        assert_eq!(topics[0].name, "orders");
        assert_eq!(client.get_topic_details("local", "orders").await.unwrap().partitions.len(), 2);

        let produce = ProduceRequest {
            key: Some("order-1".to_string()),
            value: json!({"id": 1}),
            format: None,
        };
        let produced = client.produce_message("local", "orders", &produce).await.unwrap();
        assert_eq!(produced.topic, "orders");

        let filter = MessageFilter {
            key: Some("order-1".to_string()),
            ..MessageFilter::default()
        };
        let messages = client.get_messages("local", "orders", &filter).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].value, json!({"id": 1}));

        let search = MessageSearch {
            query: "order".to_string(),
            ..MessageSearch::default()
        };
        assert_eq!(client.search_messages("local", "orders", &search).await.unwrap().len(), 1);

        let replay = client.replay_messages("local", "orders", 0, 0).await.unwrap();
        assert_eq!(replay, ReplayResult { topic: "orders".to_string(), replayed: 0 });

        client.validate_message("local", "json", &json!({"a": 1})).await.unwrap();
        let err = client.validate_message("local", "xml", &json!("x")).await.unwrap_err();
        assert_eq!(err.status(), Some(400));

        assert_eq!(client.get_brokers("local").await.unwrap().len(), 1);
        assert!(client.get_consumer_groups("local").await.unwrap().is_empty());
        assert_eq!(client.get_cluster_health("local").await.unwrap().total_topics, 1);
        assert_eq!(client.get_topic_metrics("local").await.unwrap().len(), 1);
        client.get_broker_metrics("local").await.unwrap();
        client.get_consumer_lag("local").await.unwrap();
        client.get_consumer_group_metrics("local").await.unwrap();

        let err = client.get_consumer_group_details("local", "missing").await.unwrap_err();
        assert_eq!(err.status(), Some(404));

        client.delete_topic("local", "orders").await.unwrap();
        let err = client.get_topic_details("local", "orders").await.unwrap_err();
        assert!(matches!(err, ClientError::Api { ref error_type, status: 404, .. } if error_type == "NOT_FOUND"));

        client.logout().await.unwrap();
        assert_eq!(client.get_profile().await.unwrap_err().status(), Some(401));
    }

    #[tokio::test]
    async fn test_transport_failure_after_retries() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ClientConfig {
            base_url: format!("http://{}/api", addr),
            retry_attempts: 2,
            retry_delay: Duration::from_millis(10),
            ..ClientConfig::default()
        };
        let client = ConsoleClient::new(config).unwrap();

        let err = client.health().await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
