//! Fixed-window rate limiting per client.
//!
//! Each client key gets `max_requests` per window; the window starts with the
//! first request after the previous one expired. Bursts straddling a window
//! boundary can reach twice the limit. That is accepted at this scale.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::RateLimitConfig;
use crate::error::ApiError;

/// Rate limiter error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateLimitError {
    /// Quota for the current window is used up
    #[error("Rate limit exceeded, retry in {retry_after_secs}s")]
    Exceeded {
        /// Seconds until the window resets (at least 1)
        retry_after_secs: u64,
    },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// Expired windows are swept every this many checks
pub const PRUNE_EVERY: u32 = 256;

#[derive(Debug, Default)]
struct Windows {
    by_client: HashMap<String, Window>,
    checks: u32,
}

impl Windows {
    fn prune(&mut self, now: Instant) -> usize {
        let before = self.by_client.len();
        self.by_client.retain(|_, w| now <= w.reset_at);
        before - self.by_client.len()
    }
}

/// Fixed-window request counter keyed by client
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    windows: Mutex<Windows>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_requests` per `window`
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            windows: Mutex::new(Windows::default()),
        }
    }

    /// Create a limiter from configuration
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.window(), config.max_requests)
    }

    /// Requests allowed per window
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Count a request for `key` now
    pub fn check(&self, key: &str) -> Result<u32, RateLimitError> {
        self.check_at(key, Instant::now())
    }

    /// Count a request for `key` at `now`, returning requests left in the window
    pub fn check_at(&self, key: &str, now: Instant) -> Result<u32, RateLimitError> {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        windows.checks = windows.checks.wrapping_add(1);
        if windows.checks % PRUNE_EVERY == 0 {
            windows.prune(now);
        }

        let fresh = Window {
            count: 0,
            reset_at: now + self.window,
        };
        let window = windows.by_client.entry(key.to_string()).or_insert(fresh);
        if now > window.reset_at {
            *window = fresh;
        }

        if window.count >= self.max_requests {
            let wait = window.reset_at.saturating_duration_since(now);
            let retry_after_secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            return Err(RateLimitError::Exceeded {
                retry_after_secs: retry_after_secs.max(1),
            });
        }

        window.count += 1;
        Ok(self.max_requests - window.count)
    }

    /// Drop windows that have expired by `now`; returns how many were removed
    pub fn prune(&self, now: Instant) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .prune(now)
    }

    /// Number of clients with a live or expired window on record
    pub fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .by_client
            .len()
    }
}

/// Identify the client: peer IP, else first `x-forwarded-for` hop, else "unknown"
pub fn client_key(req: &Request) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware: reject over-quota clients before any handler runs
pub async fn enforce(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = client_key(&req);
    let remaining = limiter.check(&key)?;

    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(limiter.max_requests()));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_exactly_max_per_window(max in 1u32..50, extra in 1u32..20) {
            let limiter = RateLimiter::new(Duration::from_secs(60), max);
            let start = Instant::now();

            for i in 0..max {
                prop_assert_eq!(limiter.check_at("k", start), Ok(max - i - 1));
            }
            for _ in 0..extra {
                prop_assert!(limiter.check_at("k", start).is_err());
            }
            let next_window = start + Duration::from_secs(61);
            prop_assert_eq!(limiter.check_at("k", next_window), Ok(max - 1));
        }
    }

    #[test]
    fn test_exactly_max_requests_allowed() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3);
        let start = Instant::now();

        assert_eq!(limiter.check_at("a", start), Ok(2));
        assert_eq!(limiter.check_at("a", start), Ok(1));
        assert_eq!(limiter.check_at("a", start), Ok(0));
        assert!(limiter.check_at("a", start).is_err());
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();
        limiter.check_at("a", start).unwrap();

        let err = limiter
            .check_at("a", start + Duration::from_millis(30_500))
            .unwrap_err();
        assert_eq!(err, RateLimitError::Exceeded { retry_after_secs: 30 });

        let err = limiter
            .check_at("a", start + Duration::from_millis(59_999))
            .unwrap_err();
        assert_eq!(err, RateLimitError::Exceeded { retry_after_secs: 1 });
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();
        limiter.check_at("a", start).unwrap();

        // Still inside the window at exactly reset time.
        assert!(limiter.check_at("a", start + Duration::from_secs(60)).is_err());
        assert!(limiter
            .check_at("a", start + Duration::from_secs(60) + Duration::from_millis(1))
            .is_ok());
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();
        limiter.check_at("a", start).unwrap();
        assert!(limiter.check_at("a", start).is_err());
        assert!(limiter.check_at("b", start).is_ok());
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn test_boundary_burst_allows_double() {
        let limiter = RateLimiter::new(Duration::from_secs(10), 5);
        let start = Instant::now();
        let late = start + Duration::from_millis(9_999);
        let early_next = start + Duration::from_millis(10_001);

        limiter.check_at("a", start).unwrap();
        for _ in 0..4 {
            limiter.check_at("a", late).unwrap();
        }
        for _ in 0..5 {
            limiter.check_at("a", early_next).unwrap();
        }
        assert!(limiter.check_at("a", early_next).is_err());
    }

    #[test]
    fn test_checks_sweep_expired_windows() {
        let limiter = RateLimiter::new(Duration::from_secs(1), 10);
        let start = Instant::now();
        let later = start + Duration::from_secs(5);

        limiter.check_at("stale", start).unwrap();
        for i in 1..PRUNE_EVERY {
            limiter.check_at(&format!("client-{}", i), later).unwrap();
        }

        // The sweep on the last check dropped "stale" before adding its own key.
        assert_eq!(limiter.tracked_clients(), (PRUNE_EVERY - 1) as usize);
        assert_eq!(limiter.prune(later), 0);
    }

    #[test]
    fn test_prune_expired() {
        let limiter = RateLimiter::new(Duration::from_secs(1), 10);
        let start = Instant::now();
        limiter.check_at("old", start).unwrap();
        limiter.check_at("new", start + Duration::from_secs(5)).unwrap();

        assert_eq!(limiter.prune(start + Duration::from_secs(5)), 1);
        assert_eq!(limiter.tracked_clients(), 1);
    }
}
