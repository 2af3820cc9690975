//! Settings bundle for the Bulwark middleware stack.
//!
//! Provides a single immutable [`ServerConfig`] covering:
//! - CORS policy (`cors`)
//! - Security headers / Content-Security-Policy (`helmet`)
//! - Rate limiting (`rateLimiter`)
//! - Session and refresh cookie attributes (`cookie`, `refreshCookie`)
//!
//! Two environment variables feed the bundle, both read exactly once:
//! - `FRONTEND_URL` overrides the allowed CORS origin
//! - `NODE_ENV=production` turns on the `Secure` cookie attribute
//!
//! Build it once at startup and share it by reference (or `Arc`):
//!
//! ```
//! use bulwark_config::{EnvInputs, ServerConfig};
//!
//! let inputs = EnvInputs::from_lookup(|name| match name {
//!     "FRONTEND_URL" => Some("https://example.com".to_string()),
//!     _ => None,
//! });
//! let config = ServerConfig::resolve(&inputs);
//! assert_eq!(config.cors.origin, "https://example.com");
//! assert!(!config.cookie.secure);
//! ```

pub mod env;
pub mod error;
pub mod types;

pub use env::{
    DEFAULT_FRONTEND_URL, EnvInputs, FRONTEND_URL_ENV, InputSource, LoadedConfig, NODE_ENV_ENV,
    PRODUCTION, load, load_from_env,
};
pub use error::{ConfigError, Result};
pub use types::*;
