//! Security headers built from [`HelmetConfig`].

use axum::http::{HeaderValue, header};
use bulwark_config::{ContentSecurityPolicy, HelmetConfig};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::error::{Result, ServerError};

/// Render the policy as a `Content-Security-Policy` header value.
pub fn csp_header(policy: &ContentSecurityPolicy) -> Result<HeaderValue> {
    let rendered = policy.header_value();
    HeaderValue::from_str(&rendered).map_err(|e| ServerError::InvalidHeaderValue {
        field: "helmet.contentSecurityPolicy",
        value: rendered,
        reason: e.to_string(),
    })
}

/// Layer that sets `Content-Security-Policy` on every response,
/// replacing any value set by a handler.
pub fn csp_layer(config: &HelmetConfig) -> Result<SetResponseHeaderLayer<HeaderValue>> {
    let value = csp_header(&config.content_security_policy)?;
    Ok(SetResponseHeaderLayer::overriding(
        header::CONTENT_SECURITY_POLICY,
        value,
    ))
}
