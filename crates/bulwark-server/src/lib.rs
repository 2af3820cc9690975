//! Middleware-facing views of the Bulwark settings bundle.
//!
//! The settings bundle stores plain strings and numbers. This crate turns
//! them into the types the HTTP middleware stack consumes:
//!
//! - [`cors::cors_layer`] builds a tower-http `CorsLayer`
//! - [`security::csp_layer`] sets `Content-Security-Policy`
//! - [`ratelimit`] provides a governor quota, rate-limit headers and the 429 body
//! - [`cookies`] builds session and refresh-token cookies
//!
//! # Example
//!
//! ```ignore
//! use bulwark_config::ServerConfig;
//!
//! let config = ServerConfig::from_env();
//! let app = bulwark_server::harden(Router::new().route("/", get(index)), &config)?;
//! ```

pub mod cookies;
pub mod cors;
pub mod error;
pub mod ratelimit;
pub mod security;

pub use cookies::{build_cookie, refresh_cookie, removal_cookie, session_cookie};
pub use cors::cors_layer;
pub use error::{Result, ServerError};
pub use ratelimit::{
    SharedRateLimiter, create_rate_limiter, header_names, limit_exceeded_response, quota,
    rate_limit_headers,
};
pub use security::{csp_header, csp_layer};

use axum::Router;
use bulwark_config::ServerConfig;

/// Wrap a router with the CORS and Content-Security-Policy layers.
///
/// CORS is the outer layer so preflight requests are answered before
/// reaching any route.
pub fn harden<S>(router: Router<S>, config: &ServerConfig) -> Result<Router<S>>
where
    S: Clone + Send + Sync + 'static,
{
    let csp = security::csp_layer(&config.helmet)?;
    let cors = cors::cors_layer(&config.cors)?;

    tracing::info!(
        origin = %config.cors.origin,
        secure_cookies = config.is_production(),
        "Applying security middleware"
    );

    Ok(router.layer(csp).layer(cors))
}
