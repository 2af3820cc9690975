//! CORS layer built from [`CorsConfig`].

use axum::http::{HeaderName, HeaderValue, Method};
use bulwark_config::CorsConfig;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::error::{Result, ServerError};

/// Build a [`CorsLayer`] enforcing the configured policy.
///
/// The origin is matched exactly; wildcard origins are not supported since
/// the policy always allows credentials.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let origin =
        HeaderValue::from_str(&config.origin).map_err(|e| ServerError::InvalidHeaderValue {
            field: "cors.origin",
            value: config.origin.clone(),
            reason: e.to_string(),
        })?;

    let methods = config
        .methods
        .iter()
        .map(|m| parse_method(m))
        .collect::<Result<Vec<_>>>()?;

    let allowed_headers = parse_header_names("cors.allowedHeaders", &config.allowed_headers)?;
    let exposed_headers = parse_header_names("cors.exposedHeaders", &config.exposed_headers)?;

    tracing::debug!(
        origin = %config.origin,
        credentials = config.credentials,
        "Building CORS layer"
    );

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_credentials(config.credentials)
        .allow_methods(methods)
        .allow_headers(allowed_headers)
        .expose_headers(exposed_headers))
}

fn parse_method(value: &str) -> Result<Method> {
    Method::from_bytes(value.as_bytes()).map_err(|e| ServerError::InvalidMethod {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_header_names(field: &'static str, values: &[String]) -> Result<Vec<HeaderName>> {
    values
        .iter()
        .map(|value| {
            HeaderName::from_bytes(value.as_bytes()).map_err(|e| ServerError::InvalidHeaderName {
                field,
                value: value.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}
