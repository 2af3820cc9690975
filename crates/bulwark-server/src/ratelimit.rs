//! Rate limit quota and response headers built from [`RateLimiterConfig`].
//!
//! The counting itself belongs to the rate-limit middleware. This module
//! hands it a governor quota and renders the headers and body it sends.

use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bulwark_config::RateLimiterConfig;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

// ─────────────────────────────────────────────────────────────────────────────
// Header names
// ─────────────────────────────────────────────────────────────────────────────

/// Draft-standard headers (`standardHeaders`).
pub const STANDARD_HEADERS: &[&str] = &[
    "RateLimit-Policy",
    "RateLimit-Limit",
    "RateLimit-Remaining",
    "RateLimit-Reset",
];

/// Legacy headers (`legacyHeaders`).
pub const LEGACY_HEADERS: &[&str] = &[
    "X-RateLimit-Limit",
    "X-RateLimit-Remaining",
    "X-RateLimit-Reset",
];

const RATELIMIT_POLICY: HeaderName = HeaderName::from_static("ratelimit-policy");
const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");
const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Per-caller limiter keyed by client IP.
pub type SharedRateLimiter = Arc<DefaultKeyedRateLimiter<IpAddr>>;

// ─────────────────────────────────────────────────────────────────────────────
// Rate Limiter Factory
// ─────────────────────────────────────────────────────────────────────────────

/// Governor quota equivalent to `max` requests per `windowMs`.
///
/// The full allowance is available as a burst and refills one request every
/// `window / max`. A zero `max` is treated as 1 and a zero window as one second.
pub fn quota(config: &RateLimiterConfig) -> Quota {
    let max = NonZeroU32::new(config.max).unwrap_or(NonZeroU32::MIN);
    let period = config.window() / max.get();

    Quota::with_period(period)
        .map(|q| q.allow_burst(max))
        .unwrap_or_else(|| Quota::per_second(max))
}

/// Create a per-IP rate limiter for the configured quota.
pub fn create_rate_limiter(config: &RateLimiterConfig) -> SharedRateLimiter {
    Arc::new(RateLimiter::keyed(quota(config)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Headers and responses
// ─────────────────────────────────────────────────────────────────────────────

/// Names of the headers the configured convention emits.
pub fn header_names(config: &RateLimiterConfig) -> Vec<&'static str> {
    let mut names = Vec::new();
    if config.standard_headers {
        names.extend_from_slice(STANDARD_HEADERS);
    }
    if config.legacy_headers {
        names.extend_from_slice(LEGACY_HEADERS);
    }
    names
}

/// Render rate-limit headers for a caller with `remaining` requests left and
/// a window that resets in `reset`.
///
/// Standard `RateLimit-Reset` is seconds from now. Legacy `X-RateLimit-Reset`
/// is a Unix timestamp.
pub fn rate_limit_headers(config: &RateLimiterConfig, remaining: u32, reset: Duration) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let reset_secs = ceil_secs(reset);

    if config.standard_headers {
        let policy = format!("{};w={}", config.max, ceil_secs(config.window()));
        if let Ok(value) = HeaderValue::from_str(&policy) {
            headers.insert(RATELIMIT_POLICY, value);
        }
        headers.insert(RATELIMIT_LIMIT, HeaderValue::from(config.max));
        headers.insert(RATELIMIT_REMAINING, HeaderValue::from(remaining));
        headers.insert(RATELIMIT_RESET, HeaderValue::from(reset_secs));
    }

    if config.legacy_headers {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(config.max));
        headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(remaining));
        headers.insert(
            X_RATELIMIT_RESET,
            HeaderValue::from(ceil_secs(now.saturating_add(reset))),
        );
    }

    headers
}

/// The 429 response sent once a caller exhausts its allowance.
pub fn limit_exceeded_response(config: &RateLimiterConfig, retry_after: Duration) -> Response {
    let mut headers = rate_limit_headers(config, 0, retry_after);
    headers.insert(header::RETRY_AFTER, HeaderValue::from(ceil_secs(retry_after)));

    (StatusCode::TOO_MANY_REQUESTS, headers, config.message.clone()).into_response()
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 { secs.saturating_add(1) } else { secs }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_quota_matches_window() {
        let quota = quota(&RateLimiterConfig::default());
        assert_eq!(quota.burst_size().get(), 50);
        assert_eq!(quota.replenish_interval(), Duration::from_secs(12));
    }

    #[test]
    fn test_quota_zero_values_fall_back() {
        let config = RateLimiterConfig {
            window_ms: 0,
            max: 0,
            ..Default::default()
        };
        let quota = quota(&config);
        assert_eq!(quota.burst_size().get(), 1);
    }

    #[test]
    fn test_limiter_is_per_caller() {
        let limiter = create_rate_limiter(&RateLimiterConfig::default());
        let first = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let second = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        for _ in 0..50 {
            assert!(limiter.check_key(&first).is_ok());
        }
        assert!(limiter.check_key(&first).is_err());
        assert!(limiter.check_key(&second).is_ok());
    }

    #[test]
    fn test_header_names_default_is_standard_only() {
        let names = header_names(&RateLimiterConfig::default());
        assert_eq!(names, STANDARD_HEADERS.to_vec());
    }

    #[test]
    fn test_header_names_both_conventions() {
        let config = RateLimiterConfig {
            legacy_headers: true,
            ..Default::default()
        };
        assert_eq!(header_names(&config).len(), 7);
    }

    #[test]
    fn test_standard_headers_rendered() {
        let headers = rate_limit_headers(
            &RateLimiterConfig::default(),
            7,
            Duration::from_millis(30_500),
        );
        assert_eq!(headers["ratelimit-policy"], "50;w=600");
        assert_eq!(headers["ratelimit-limit"], "50");
        assert_eq!(headers["ratelimit-remaining"], "7");
        assert_eq!(headers["ratelimit-reset"], "31");
        assert!(headers.get("x-ratelimit-limit").is_none());
    }

    #[test]
    fn test_legacy_headers_rendered() {
        let config = RateLimiterConfig {
            standard_headers: false,
            legacy_headers: true,
            ..Default::default()
        };
        let headers = rate_limit_headers(&config, 3, Duration::from_secs(60));
        assert_eq!(headers["x-ratelimit-limit"], "50");
        assert_eq!(headers["x-ratelimit-remaining"], "3");
        let reset: u64 = headers["x-ratelimit-reset"].to_str().unwrap().parse().unwrap();
        assert!(reset > 1_600_000_000);
        assert!(headers.get("ratelimit-limit").is_none());
    }

    #[tokio::test]
    async fn test_limit_exceeded_response() {
        let config = RateLimiterConfig::default();
        let response = limit_exceeded_response(&config, Duration::from_secs(12));

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "12");
        assert_eq!(response.headers()["ratelimit-remaining"], "0");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            body.as_ref(),
            b"Too many requests from this IP, please try again later"
        );
    }

    #[test]
    fn test_huge_reset_saturates() {
        let config = RateLimiterConfig {
            legacy_headers: true,
            ..Default::default()
        };
        let headers = rate_limit_headers(&config, 0, Duration::MAX);
        assert_eq!(headers["ratelimit-reset"], u64::MAX.to_string().as_str());
        assert_eq!(headers["x-ratelimit-reset"], u64::MAX.to_string().as_str());

        let response = limit_exceeded_response(&config, Duration::MAX);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers()[header::RETRY_AFTER],
            u64::MAX.to_string().as_str()
        );
    }
}
