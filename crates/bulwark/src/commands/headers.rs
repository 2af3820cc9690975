//! Headers command - preview what the middleware stack will send.

use anyhow::{Context as _, Result};
use serde_json::json;

use bulwark_config::LoadedConfig;

use super::Context;

/// Placeholder shown instead of a real session token.
const SAMPLE_VALUE: &str = "<token>";

/// Run the headers command.
///
/// Fails if any value cannot be turned into a valid HTTP header.
pub fn run(loaded: &LoadedConfig, ctx: &Context) -> Result<()> {
    let config = &loaded.config;

    let _cors = bulwark_server::cors_layer(&config.cors).context("CORS settings are not usable")?;
    let csp = bulwark_server::csp_header(&config.helmet.content_security_policy)
        .context("Content-Security-Policy is not usable")?;
    let csp = csp.to_str().context("Content-Security-Policy is not ASCII")?;

    let session = bulwark_server::session_cookie(config, "session", SAMPLE_VALUE);
    let refresh = bulwark_server::refresh_cookie(config, "refresh", SAMPLE_VALUE);
    let rate_limit_headers = bulwark_server::header_names(&config.rate_limiter);

    tracing::debug!(headers = ?rate_limit_headers, "Rate limit header convention");

    if ctx.json_output {
        let output = json!({
            "contentSecurityPolicy": csp,
            "cors": {
                "allowOrigin": config.cors.origin,
                "allowCredentials": config.cors.credentials,
                "allowMethods": config.cors.methods,
                "allowHeaders": config.cors.allowed_headers,
                "exposeHeaders": config.cors.exposed_headers,
            },
            "rateLimitHeaders": rate_limit_headers,
            "setCookie": [session.to_string(), refresh.to_string()],
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Content-Security-Policy: {}", csp);
    println!("Access-Control-Allow-Origin: {}", config.cors.origin);
    println!(
        "Access-Control-Allow-Credentials: {}",
        config.cors.credentials
    );
    println!(
        "Access-Control-Allow-Methods: {}",
        config.cors.methods.join(", ")
    );
    println!(
        "Access-Control-Allow-Headers: {}",
        config.cors.allowed_headers.join(", ")
    );
    println!(
        "Access-Control-Expose-Headers: {}",
        config.cors.exposed_headers.join(", ")
    );
    println!("Set-Cookie: {}", session);
    println!("Set-Cookie: {}", refresh);
    println!();
    println!(
        "Rate limit: {} requests per {}s, headers: {}",
        config.rate_limiter.max,
        config.rate_limiter.window().as_secs(),
        rate_limit_headers.join(", ")
    );

    Ok(())
}
