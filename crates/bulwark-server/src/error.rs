//! Error types for building middleware from the settings bundle.

use thiserror::Error;

/// Result type alias for middleware construction.
pub type Result<T> = std::result::Result<T, ServerError>;

/// A bundle value could not be turned into the HTTP type a middleware needs.
///
/// The bundle passes strings through unvalidated, so this is where a bad
/// `FRONTEND_URL` or header name first surfaces.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Value is not a valid HTTP header value.
    #[error("invalid header value for {field} '{value}': {reason}")]
    InvalidHeaderValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Value is not a valid HTTP header name.
    #[error("invalid header name in {field} '{value}': {reason}")]
    InvalidHeaderName {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Value is not a valid HTTP method.
    #[error("invalid HTTP method '{value}': {reason}")]
    InvalidMethod { value: String, reason: String },
}
