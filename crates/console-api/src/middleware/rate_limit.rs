//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Token bucket rate limiting per client

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::utils::RequestContext;
use crate::{constants::MSG_RATE_LIMIT_EXCEEDED, error::forbidden, rest::AppState};

/// Token bucket of one client
#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

/// Shared token buckets keyed by client identifier
#[derive(Debug, Clone)]
pub struct RateLimiter {
    buckets: Arc<DashMap<String, TokenBucket>>,
    capacity: f64,
    refill_per_sec: f64,

    /// Last time idle buckets were evicted
    last_sweep: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Allow `requests` per minute with bursts up to the same amount
    pub fn per_minute(requests: u32) -> Self {
        Self {
            buckets: Arc::new(DashMap::new()),
            capacity: requests as f64,
            refill_per_sec: requests as f64 / 60.0,
            last_sweep: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Time for an empty bucket to refill completely
    fn refill_window(&self) -> Duration {
        if self.refill_per_sec > 0.0 {
            Duration::from_secs_f64(self.capacity / self.refill_per_sec)
        } else {
            Duration::from_secs(60)
        }
    }

    pub fn limit(&self) -> u32 {
        self.capacity as u32
    }

    /// Take a token for `client`, returning the tokens left or `None` when empty
    pub fn try_acquire(&self, client: &str) -> Option<u32> {
        self.try_acquire_at(client, Instant::now())
    }

    fn try_acquire_at(&self, client: &str, now: Instant) -> Option<u32> {
        self.maybe_sweep(now);

        let mut bucket = self
            .buckets
            .entry(client.to_string())
            .or_insert_with(|| TokenBucket {
                tokens: self.capacity,
                last_refill: now,
            });

        let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Some(bucket.tokens as u32)
        } else {
            None
        }
    }

    /// Evict idle buckets at most once per refill window
    fn maybe_sweep(&self, now: Instant) {
        let window = self.refill_window();
        let due = match self.last_sweep.try_lock() {
            Ok(mut last) if now.saturating_duration_since(*last) >= window => {
                *last = now;
                true
            }
            _ => false,
        };

        if due {
            let evicted = self.evict_idle_at(now);
            if evicted > 0 {
                tracing::debug!(evicted, "Evicted idle rate limit buckets");
            }
        }
    }

    /// Drop buckets that have sat idle long enough to be full again
    fn evict_idle_at(&self, now: Instant) -> usize {
        let window = self.refill_window();
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| now.saturating_duration_since(bucket.last_refill) < window);
        before.saturating_sub(self.buckets.len())
    }

    /// Number of tracked clients
    pub fn client_count(&self) -> usize {
        self.buckets.len()
    }
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.rate_limit.enabled {
        return next.run(request).await;
    }

    let client_id = client_identifier(&request);
    let limiter = &state.rate_limiter;

    let remaining = match limiter.try_acquire(&client_id) {
        Some(remaining) => remaining,
        None => {
            tracing::warn!(client = %client_id, "Rate limit exceeded");
            let mut response = forbidden(MSG_RATE_LIMIT_EXCEEDED).into_response();
            set_limit_headers(&mut response, limiter.limit(), 0);
            return response;
        }
    };

    let mut response = next.run(request).await;
    set_limit_headers(&mut response, limiter.limit(), remaining);
    response
}

fn set_limit_headers(response: &mut Response, limit: u32, remaining: u32) {
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(limit));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(remaining));
}

/// Get client identifier for rate limiting
pub fn client_identifier(request: &Request) -> String {
    if let Some(user_id) = request
        .extensions()
        .get::<RequestContext>()
        .and_then(|ctx| ctx.user_id.as_ref())
    {
        return format!("user:{}", user_id);
    }

    format!("ip:{}", client_ip(request))
}

/// Client address from proxy headers, then the socket, else `unknown`
pub fn client_ip(request: &Request) -> String {
    let headers = request.headers();

    if let Some(forwarded) = headers.get("X-Forwarded-For").and_then(|h| h.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next().map(str::trim).filter(|ip| !ip.is_empty()) {
            return first.to_string();
        }
    }

    if let Some(real_ip) = headers
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return real_ip.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_bucket_exhausts_and_refills() {
        let limiter = RateLimiter::per_minute(60);
        let start = Instant::now();

        for expected in (0..60).rev() {
            assert_eq!(limiter.try_acquire_at("ip:1.2.3.4", start), Some(expected));
        }
        assert_eq!(limiter.try_acquire_at("ip:1.2.3.4", start), None);

        // Other clients have their own bucket
        assert_eq!(limiter.try_acquire_at("ip:5.6.7.8", start), Some(59));

        // Sixty per minute refills one token per second
        let later = start + Duration::from_secs(1);
        assert_eq!(limiter.try_acquire_at("ip:1.2.3.4", later), Some(0));
        assert_eq!(limiter.try_acquire_at("ip:1.2.3.4", later), None);
        assert_eq!(limiter.client_count(), 2);
    }

    #[test]
    fn test_idle_buckets_evicted() {
        let limiter = RateLimiter::per_minute(100);
        let start = Instant::now();

        for i in 0..10_000 {
            limiter.try_acquire_at(&format!("ip:10.0.{}.{}", i / 256, i % 256), start);
        }
        assert_eq!(limiter.client_count(), 10_000);

        let later = start + Duration::from_secs(3600);
        assert_eq!(limiter.try_acquire_at("ip:192.168.0.1", later), Some(99));
        assert_eq!(limiter.client_count(), 1);
    }

    #[test]
    fn test_active_buckets_survive_sweep() {
        let limiter = RateLimiter::per_minute(60);
        let start = Instant::now();

        limiter.try_acquire_at("ip:idle", start);
        limiter.try_acquire_at("ip:busy", start + Duration::from_secs(30));

        // Evicting an idle bucket must not reset a throttled client
        assert_eq!(limiter.evict_idle_at(start + Duration::from_secs(61)), 1);
        assert_eq!(limiter.client_count(), 1);
        assert_eq!(
            limiter.try_acquire_at("ip:busy", start + Duration::from_secs(61)),
            Some(59)
        );
    }

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let request = Request::builder()
            .header("X-Forwarded-For", "10.0.0.1, 10.0.0.2")
            .header("X-Real-IP", "10.0.0.3")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&request), "10.0.0.1");
        assert_eq!(client_identifier(&request), "ip:10.0.0.1");
    }

    #[test]
    fn test_client_ip_fallbacks() {
        let request = Request::builder()
            .header("X-Real-IP", "10.0.0.3")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&request), "10.0.0.3");

        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_ip(&request), "unknown");
    }

    #[test]
    fn test_identifier_uses_authenticated_user() {
        let mut request = Request::builder()
            .header("X-Real-IP", "10.0.0.3")
            .body(Body::empty())
            .unwrap();
        let mut context = RequestContext::new();
        context.user_id = Some("7".to_string());
        request.extensions_mut().insert(context);

        assert_eq!(client_identifier(&request), "user:7");
    }
}
