//! Fixed-window rate limiter
//!
//! Counters live in process memory and reset on restart; separate
//! instances do not share quota.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::{sync::Mutex, task::JoinHandle};

use crate::error::AppError;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

pub struct FixedWindowLimiter {
    windows: Mutex<HashMap<String, Window>>,
    max_requests: u32,
    window: Duration,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub async fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now()).await
    }

    /// Count one request for `key` at `now`. Check and increment happen under one lock.
    pub async fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let mut windows = self.windows.lock().await;
        let entry = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        let elapsed = now.saturating_duration_since(entry.started);
        if elapsed >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.max_requests {
            let elapsed = now.saturating_duration_since(entry.started);
            return RateDecision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }

        entry.count += 1;
        RateDecision::Allowed {
            remaining: self.max_requests - entry.count,
        }
    }

    /// Drop windows that have fully elapsed. Returns how many were removed.
    pub async fn purge_expired(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, w| now.saturating_duration_since(w.started) < self.window);
        before - windows.len()
    }

    #[cfg(test)]
    pub async fn tracked_clients(&self) -> usize {
        self.windows.lock().await.len()
    }
}

/// Periodically purge expired windows so idle clients do not accumulate
pub fn spawn_sweeper(limiter: Arc<FixedWindowLimiter>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let purged = limiter.purge_expired(Instant::now()).await;
            if purged > 0 {
                tracing::debug!(purged, "Purged expired rate-limit windows");
            }
        }
    })
}

#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<FixedWindowLimiter>,
    pub trust_proxy: bool,
}

pub async fn rate_limit(
    State(state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request, state.trust_proxy);

    match state.limiter.check(&key).await {
        RateDecision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(
                HeaderName::from_static("ratelimit-limit"),
                HeaderValue::from(state.limiter.max_requests()),
            );
            headers.insert(
                HeaderName::from_static("ratelimit-remaining"),
                HeaderValue::from(remaining),
            );
            response
        }
        RateDecision::Limited { retry_after } => {
            tracing::warn!(client = %key, "Rate limit exceeded");
            AppError::TooManyRequests {
                retry_after_secs: ceil_secs(retry_after),
            }
            .into_response()
        }
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs() + u64::from(duration.subsec_nanos() > 0);
    secs.max(1)
}

fn client_key(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
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
    use axum::{body::Body, http};

    const WINDOW: Duration = Duration::from_secs(15 * 60);

    #[tokio::test]
    async fn test_hundred_and_first_request_is_limited() {
        let limiter = FixedWindowLimiter::new(100, WINDOW);
        let start = Instant::now();

        for i in 0..100 {
            let decision = limiter.check_at("10.0.0.1", start).await;
            assert_eq!(decision, RateDecision::Allowed { remaining: 99 - i });
        }

        let later = start + Duration::from_secs(60);
        assert_eq!(
            limiter.check_at("10.0.0.1", later).await,
            RateDecision::Limited {
                retry_after: WINDOW - Duration::from_secs(60)
            }
        );
    }

    #[tokio::test]
    async fn test_window_resets_after_expiry() {
        let limiter = FixedWindowLimiter::new(2, WINDOW);
        let start = Instant::now();

        limiter.check_at("a", start).await;
        limiter.check_at("a", start).await;
        assert!(matches!(
            limiter.check_at("a", start + WINDOW - Duration::from_millis(1)).await,
            RateDecision::Limited { .. }
        ));
        assert_eq!(
            limiter.check_at("a", start + WINDOW).await,
            RateDecision::Allowed { remaining: 1 }
        );
    }

    #[tokio::test]
    async fn test_clients_are_counted_separately() {
        let limiter = FixedWindowLimiter::new(1, WINDOW);
        let now = Instant::now();

        assert!(matches!(
            limiter.check_at("a", now).await,
            RateDecision::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check_at("b", now).await,
            RateDecision::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check_at("a", now).await,
            RateDecision::Limited { .. }
        ));
    }

    #[tokio::test]
    async fn test_concurrent_hits_are_not_undercounted() {
        let limiter = Arc::new(FixedWindowLimiter::new(100, WINDOW));

        let handles: Vec<_> = (0..250)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move { limiter.check("shared").await })
            })
            .collect();

        let mut allowed = 0;
        for handle in handles {
            if matches!(handle.await.unwrap(), RateDecision::Allowed { .. }) {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 100);
    }

    #[tokio::test]
    async fn test_purge_removes_only_expired_windows() {
        let limiter = FixedWindowLimiter::new(10, WINDOW);
        let start = Instant::now();

        limiter.check_at("old", start).await;
        limiter.check_at("fresh", start + Duration::from_secs(600)).await;

        let purged = limiter.purge_expired(start + WINDOW).await;
        assert_eq!(purged, 1);
        assert_eq!(limiter.tracked_clients().await, 1);
    }

    #[test]
    fn test_retry_after_rounds_up() {
        assert_eq!(ceil_secs(Duration::from_millis(1500)), 2);
        assert_eq!(ceil_secs(Duration::from_secs(3)), 3);
        assert_eq!(ceil_secs(Duration::ZERO), 1);
    }

    #[test]
    fn test_client_key_prefers_forwarded_for_only_when_trusted() {
        let mut request = http::Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 20], 5000))));

        assert_eq!(client_key(&request, true), "203.0.113.7");
        assert_eq!(client_key(&request, false), "192.168.1.20");
    }
}
