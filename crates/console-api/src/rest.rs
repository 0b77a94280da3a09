//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! REST API routing for the console

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use console_auth::AuthService;
use console_kafka::{ClusterRegistry, KafkaServices};
use tower_http::trace::TraceLayer;

use crate::{
    config::ConsoleConfig,
    handlers::*,
    middleware::{
        auth_middleware, cors_middleware, logging_middleware, rate_limit_middleware,
        request_id_middleware, security_headers_middleware, RateLimiter,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConsoleConfig>,
    pub auth: AuthService,
    pub registry: ClusterRegistry,
    pub services: KafkaServices,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(
        config: ConsoleConfig,
        auth: AuthService,
        registry: ClusterRegistry,
        services: KafkaServices,
    ) -> Self {
        let rate_limiter = RateLimiter::per_minute(config.rate_limit.requests_per_minute);
        Self {
            config: Arc::new(config),
            auth,
            registry,
            services,
            rate_limiter,
        }
    }
}

/// Create the REST API router
pub fn create_rest_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Authentication runs before rate limiting so buckets key on the user
    let protected = create_protected_router()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api", public.merge(protected))
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            logging_middleware,
        ))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors_middleware(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Routes behind bearer authentication
fn create_protected_router() -> Router<AppState> {
    Router::new()
        // Session
        .route("/auth/profile", get(profile_handler))
        .route("/auth/change-password", put(change_password_handler))
        .route("/auth/logout", post(logout_handler))
        // Clusters
        .route("/clusters", get(list_clusters_handler).post(add_cluster_handler))
        .route("/clusters/:cluster", delete(remove_cluster_handler))
        // Topics
        .route(
            "/clusters/:cluster/topics",
            get(list_topics_handler).post(create_topic_handler),
        )
        .route(
            "/clusters/:cluster/topics/:topic",
            get(topic_details_handler).delete(delete_topic_handler),
        )
        // Brokers and consumer groups
        .route("/clusters/:cluster/brokers", get(list_brokers_handler))
        .route(
            "/clusters/:cluster/consumer-groups",
            get(list_consumer_groups_handler),
        )
        .route(
            "/clusters/:cluster/consumer-groups/:group",
            get(consumer_group_details_handler),
        )
        // Messages
        .route(
            "/clusters/:cluster/topics/:topic/messages",
            get(get_messages_handler).post(produce_message_handler),
        )
        .route(
            "/clusters/:cluster/topics/:topic/messages/replay",
            post(replay_messages_handler),
        )
        .route(
            "/clusters/:cluster/topics/:topic/messages/search",
            get(search_messages_handler),
        )
        .route(
            "/clusters/:cluster/messages/validate",
            post(validate_message_handler),
        )
        // Metrics
        .route(
            "/clusters/:cluster/metrics/consumer-lag",
            get(consumer_lag_handler),
        )
        .route(
            "/clusters/:cluster/metrics/cluster-health",
            get(cluster_health_handler),
        )
        .route("/clusters/:cluster/metrics/brokers", get(broker_metrics_handler))
        .route("/clusters/:cluster/metrics/topics", get(topic_metrics_handler))
        .route(
            "/clusters/:cluster/metrics/consumer-groups",
            get(consumer_group_metrics_handler),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, HeaderMap, Request, StatusCode},
    };
    use console_auth::UserConfig;
    use console_kafka::{AdminBackend, ClusterConfig};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_router(requests_per_minute: u32) -> Router {
        let mut config = ConsoleConfig::default();
        config.kafka.backend = AdminBackend::Memory;
        config
            .kafka
            .clusters
            .push(ClusterConfig::new("local", vec!["localhost:9092".to_string()]));
        config.auth.users = UserConfig::lightweight();
        config.rate_limit.requests_per_minute = requests_per_minute;
        config.logging.enable_request_logging = false;

        create_rest_router(crate::build_state(config).await.unwrap())
    }

    async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, body)
    }

    async fn login(router: &Router) -> String {
        let (status, _, body) = send(
            router,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "admin", "password": "admin123"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let router = test_router(100).await;
        let (status, headers, body) = send(&router, "GET", "/api/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "healthy");
        assert_eq!(body["data"]["clusters"], 1);
        assert_eq!(body["message"], "Service is healthy");
        assert!(headers.contains_key("x-request-id"));
        assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let router = test_router(100).await;

        let (status, _, body) = send(&router, "GET", "/api/clusters", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["type"], "UNAUTHORIZED");
        assert_eq!(body["error"]["message"], "Authorization header required");

        let (status, _, body) = send(&router, "GET", "/api/clusters", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Invalid token");
    }

    #[tokio::test]
    async fn test_login_profile_and_logout() {
        let router = test_router(100).await;

        let (status, _, body) = send(
            &router,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "admin", "password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Invalid credentials");

        let token = login(&router).await;
        let (status, _, body) = send(&router, "GET", "/api/auth/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["username"], "admin");
        assert!(body["data"].get("password_hash").is_none());

        let (status, _, _) = send(&router, "POST", "/api/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, _) = send(&router, "GET", "/api/auth/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let router = test_router(100).await;

        let (status, _, body) = send(
            &router,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"username": "ab", "email": "ab@example.com", "password": "secret1"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Username must be between 3 and 50 characters");

        let (status, _, body) = send(
            &router,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"username": "alice", "email": "alice@example.com", "password": "secret1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["user"]["username"], "alice");

        let (status, _, body) = send(
            &router,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"username": "alice", "email": "other@example.com", "password": "secret1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["message"], "Username already exists");
    }

    #[tokio::test]
    async fn test_cluster_lifecycle() {
        let router = test_router(100).await;
        let token = login(&router).await;

        let staging = json!({"name": "staging", "brokers": ["kafka-1:9092"]});
        let (status, _, body) = send(&router, "POST", "/api/clusters", Some(&token), Some(staging.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "staging");

        let (status, _, _) = send(&router, "POST", "/api/clusters", Some(&token), Some(staging)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, _, body) = send(&router, "GET", "/api/clusters", Some(&token), None).await;
        let mut names: Vec<String> = serde_json::from_value(body["data"].clone()).unwrap();
        names.sort();
        assert_eq!(names, vec!["local", "staging"]);

        let (status, _, _) = send(&router, "DELETE", "/api/clusters/staging", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, body) = send(&router, "DELETE", "/api/clusters/staging", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_topics_and_messages() {
        let router = test_router(100).await;
        let token = login(&router).await;

        let (status, _, body) = send(
            &router,
            "POST",
            "/api/clusters/local/topics",
            Some(&token),
            Some(json!({"name": "orders", "partitions": 3, "replicas": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Topic orders created successfully");

        let (_, _, body) = send(&router, "GET", "/api/clusters/local/topics", Some(&token), None).await;
        assert_eq!(body["data"][0]["name"], "orders");
        assert_eq!(body["data"][0]["partitionCount"], 3);

        let (status, _, body) = send(
            &router,
            "POST",
            "/api/clusters/local/topics/orders/messages",
            Some(&token),
            Some(json!({"key": "order-1", "value": {"id": 1}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["offset"], 0);

        let (status, _, body) = send(
            &router,
            "GET",
            "/api/clusters/local/topics/orders/messages?key=order-1",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let messages = body["data"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["key"], "order-1");
        assert_eq!(messages[0]["value"]["id"], 1);

        let (status, _, body) = send(
            &router,
            "GET",
            "/api/clusters/local/topics/orders/messages/search?query=",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Search query is required");
    }

    #[tokio::test]
    async fn test_unknown_cluster_is_not_found() {
        let router = test_router(100).await;
        let token = login(&router).await;

        let (status, _, body) = send(&router, "GET", "/api/clusters/prod/topics", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], 404);

        let (status, _, _) = send(
            &router,
            "POST",
            "/api/clusters/prod/messages/validate",
            Some(&token),
            Some(json!({"format": "json", "value": {"a": 1}})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_metrics_routes() {
        let router = test_router(100).await;
        let token = login(&router).await;

        let (status, _, body) = send(
            &router,
            "GET",
            "/api/clusters/local/metrics/cluster-health",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_brokers"], 1);

        for route in ["consumer-lag", "brokers", "topics", "consumer-groups"] {
            let uri = format!("/api/clusters/local/metrics/{}", route);
            let (status, _, body) = send(&router, "GET", &uri, Some(&token), None).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert!(body["data"].is_array(), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_rate_limit_rejects_excess_requests() {
        let router = test_router(2).await;

        for _ in 0..2 {
            let (status, _, _) = send(&router, "GET", "/api/health", None, None).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, headers, body) = send(&router, "GET", "/api/health", None, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["message"], "Rate limit exceeded");
        assert_eq!(headers.get("x-ratelimit-remaining").unwrap(), "0");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let router = test_router(100).await;
        let (status, _, body) = send(&router, "GET", "/api/nope", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Route not found");
    }
}
