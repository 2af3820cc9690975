//! Settings bundle types.
//!
//! Serialized shape (camelCase, matches what the middleware stack reads):
//! ```json
//! {
//!   "cors":          { "origin", "credentials", "methods", "allowedHeaders", "exposedHeaders" },
//!   "helmet":        { "contentSecurityPolicy": { "directives": { "defaultSrc", ... } } },
//!   "rateLimiter":   { "windowMs", "max", "message", "standardHeaders", "legacyHeaders" },
//!   "cookie":        { "httpOnly", "secure", "sameSite", "maxAge" },
//!   "refreshCookie": { "httpOnly", "secure", "sameSite", "maxAge" }
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env::{DEFAULT_FRONTEND_URL, EnvInputs};

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP methods a cross-origin caller may use.
pub const DEFAULT_CORS_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "OPTIONS"];

/// Request headers a cross-origin caller may send.
pub const DEFAULT_CORS_ALLOWED_HEADERS: &[&str] = &["Content-Type", "Authorization", "X-CSRF-Token"];

/// Response headers exposed to client scripts.
pub const DEFAULT_CORS_EXPOSED_HEADERS: &[&str] = &["Set-Cookie", "Date", "ETag"];

/// Rate limit window (10 minutes).
pub const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 10 * 60 * 1000;

/// Maximum requests per caller per window.
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 50;

/// Response body sent once a caller exceeds the limit.
pub const DEFAULT_RATE_LIMIT_MESSAGE: &str =
    "Too many requests from this IP, please try again later";

/// Session cookie lifetime (24 hours).
pub const SESSION_COOKIE_MAX_AGE_MS: u64 = 24 * 60 * 60 * 1000;

/// Refresh-token cookie lifetime (7 days).
pub const REFRESH_COOKIE_MAX_AGE_MS: u64 = 7 * 24 * 60 * 60 * 1000;

const SELF_SOURCE: &str = "'self'";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root settings bundle read by the middleware stack.
///
/// Resolved once at startup via [`ServerConfig::resolve`] or
/// [`ServerConfig::from_env`] and never mutated afterwards. Wrap it in an
/// `Arc` to hand it to request handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerConfig {
    /// Cross-origin resource sharing policy.
    pub cors: CorsConfig,

    /// Security header settings.
    pub helmet: HelmetConfig,

    /// Per-caller request limiting.
    pub rate_limiter: RateLimiterConfig,

    /// Session cookie attributes.
    pub cookie: CookieConfig,

    /// Refresh-token cookie attributes.
    pub refresh_cookie: CookieConfig,
}

impl Default for ServerConfig {
    /// Development defaults: no environment overrides applied.
    fn default() -> Self {
        Self::resolve(&EnvInputs::default())
    }
}

impl ServerConfig {
    /// Build the bundle from already-captured environment inputs.
    ///
    /// Only `cors.origin` and the two cookie `secure` flags depend on the
    /// inputs. Every other field is a fixed literal.
    pub fn resolve(inputs: &EnvInputs) -> Self {
        let secure = inputs.is_production();
        Self {
            cors: CorsConfig::with_origin(inputs.cors_origin()),
            helmet: HelmetConfig::default(),
            rate_limiter: RateLimiterConfig::default(),
            cookie: CookieConfig::session(secure),
            refresh_cookie: CookieConfig::refresh(secure),
        }
    }

    /// Read `FRONTEND_URL` and `NODE_ENV` from the process environment and
    /// build the bundle.
    pub fn from_env() -> Self {
        Self::resolve(&EnvInputs::from_process())
    }

    /// Whether cookies were resolved for a production deployment.
    pub fn is_production(&self) -> bool {
        self.cookie.secure && self.refresh_cookie.secure
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CORS
// ─────────────────────────────────────────────────────────────────────────────

/// Cross-origin policy.
///
/// Values are passed through as plain strings; the CORS middleware is
/// responsible for parsing them into HTTP types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CorsConfig {
    /// The single allowed cross-origin caller.
    pub origin: String,

    /// Whether cross-origin requests may carry credentials.
    pub credentials: bool,

    /// Allowed HTTP methods.
    pub methods: Vec<String>,

    /// Headers a client may send.
    pub allowed_headers: Vec<String>,

    /// Headers exposed to client scripts.
    pub exposed_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::with_origin(DEFAULT_FRONTEND_URL)
    }
}

impl CorsConfig {
    /// Default policy for the given origin.
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            credentials: true,
            methods: strings(DEFAULT_CORS_METHODS),
            allowed_headers: strings(DEFAULT_CORS_ALLOWED_HEADERS),
            exposed_headers: strings(DEFAULT_CORS_EXPOSED_HEADERS),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Security headers
// ─────────────────────────────────────────────────────────────────────────────

/// Security header settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HelmetConfig {
    /// Content-Security-Policy settings.
    pub content_security_policy: ContentSecurityPolicy,
}

/// Content-Security-Policy settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSecurityPolicy {
    /// Directive name to source list.
    pub directives: CspDirectives,
}

impl ContentSecurityPolicy {
    /// Render as a `Content-Security-Policy` header value.
    pub fn header_value(&self) -> String {
        self.directives.header_value()
    }
}

/// CSP directives, each an ordered list of source tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CspDirectives {
    /// Fallback for fetch directives not listed here (`default-src`).
    pub default_src: Vec<String>,

    /// Allowed script sources (`script-src`).
    pub script_src: Vec<String>,

    /// Allowed stylesheet sources (`style-src`).
    pub style_src: Vec<String>,

    /// Allowed image sources (`img-src`).
    pub img_src: Vec<String>,
}

impl Default for CspDirectives {
    fn default() -> Self {
        Self {
            default_src: strings(&[SELF_SOURCE]),
            script_src: strings(&[SELF_SOURCE]),
            style_src: strings(&[SELF_SOURCE, "'unsafe-inline'"]),
            img_src: strings(&[SELF_SOURCE, "data:", "https:"]),
        }
    }
}

impl CspDirectives {
    /// Directives as `(header name, sources)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> + '_ {
        [
            ("default-src", self.default_src.as_slice()),
            ("script-src", self.script_src.as_slice()),
            ("style-src", self.style_src.as_slice()),
            ("img-src", self.img_src.as_slice()),
        ]
        .into_iter()
    }

    /// Render as `name src src; name src; ...`.
    ///
    /// A directive with no sources is emitted as its bare name.
    pub fn header_value(&self) -> String {
        self.iter()
            .map(|(name, sources)| {
                if sources.is_empty() {
                    name.to_string()
                } else {
                    format!("{} {}", name, sources.join(" "))
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rate limiting
// ─────────────────────────────────────────────────────────────────────────────

/// Per-caller request limiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RateLimiterConfig {
    /// Window length in milliseconds.
    pub window_ms: u64,

    /// Maximum requests per caller per window.
    pub max: u32,

    /// Response body once the limit is exceeded.
    pub message: String,

    /// Emit the draft-standard `RateLimit-*` headers.
    pub standard_headers: bool,

    /// Emit the legacy `X-RateLimit-*` headers.
    pub legacy_headers: bool,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_RATE_LIMIT_WINDOW_MS,
            max: DEFAULT_RATE_LIMIT_MAX,
            message: DEFAULT_RATE_LIMIT_MESSAGE.to_string(),
            standard_headers: true,
            legacy_headers: false,
        }
    }
}

impl RateLimiterConfig {
    /// Window length as a [`Duration`].
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cookies
// ─────────────────────────────────────────────────────────────────────────────

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    #[default]
    Strict,
    Lax,
    None,
}

impl std::fmt::Display for SameSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::None => write!(f, "None"),
        }
    }
}

/// Cookie attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CookieConfig {
    /// Hide the cookie from client scripts.
    pub http_only: bool,

    /// Only send over HTTPS. True in production only.
    pub secure: bool,

    /// Cross-site sending policy.
    pub same_site: SameSite,

    /// Lifetime in milliseconds.
    pub max_age: u64,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self::session(false)
    }
}

impl CookieConfig {
    /// Session cookie attributes (24h lifetime).
    pub fn session(secure: bool) -> Self {
        Self {
            http_only: true,
            secure,
            same_site: SameSite::Strict,
            max_age: SESSION_COOKIE_MAX_AGE_MS,
        }
    }

    /// Refresh-token cookie attributes (7 day lifetime).
    pub fn refresh(secure: bool) -> Self {
        Self {
            max_age: REFRESH_COOKIE_MAX_AGE_MS,
            ..Self::session(secure)
        }
    }

    /// Lifetime as a [`Duration`].
    pub fn max_age_duration(&self) -> Duration {
        Duration::from_millis(self.max_age)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(frontend_url: Option<&str>, node_env: Option<&str>) -> EnvInputs {
        EnvInputs {
            frontend_url: frontend_url.map(String::from),
            node_env: node_env.map(String::from),
        }
    }

    #[test]
    fn test_default_origin_when_frontend_url_unset() {
        let config = ServerConfig::resolve(&inputs(None, None));
        assert_eq!(config.cors.origin, "http://localhost:3003");
    }

    #[test]
    fn test_frontend_url_overrides_origin() {
        let config = ServerConfig::resolve(&inputs(Some("https://example.com"), None));
        assert_eq!(config.cors.origin, "https://example.com");
    }

    #[test]
    fn test_production_enables_secure_cookies() {
        let config = ServerConfig::resolve(&inputs(None, Some("production")));
        assert!(config.cookie.secure);
        assert!(config.refresh_cookie.secure);
        assert!(config.is_production());
    }

    #[test]
    fn test_non_production_leaves_cookies_insecure() {
        for node_env in [None, Some("development"), Some("test"), Some("Production"), Some("")] {
            let config = ServerConfig::resolve(&inputs(None, node_env));
            assert!(!config.cookie.secure, "NODE_ENV={:?}", node_env);
            assert!(!config.refresh_cookie.secure, "NODE_ENV={:?}", node_env);
            assert!(!config.is_production());
        }
    }

    #[test]
    fn test_rate_limiter_fixed_across_environments() {
        for config in [
            ServerConfig::resolve(&inputs(None, None)),
            ServerConfig::resolve(&inputs(Some("https://a.example"), Some("production"))),
        ] {
            assert_eq!(config.rate_limiter.window_ms, 600_000);
            assert_eq!(config.rate_limiter.max, 50);
            assert_eq!(config.rate_limiter.window(), Duration::from_secs(600));
            assert!(config.rate_limiter.standard_headers);
            assert!(!config.rate_limiter.legacy_headers);
            assert_eq!(
                config.rate_limiter.message,
                "Too many requests from this IP, please try again later"
            );
        }
    }

    #[test]
    fn test_cookie_lifetimes() {
        let config = ServerConfig::resolve(&inputs(None, Some("production")));
        assert_eq!(config.cookie.max_age, 86_400_000);
        assert_eq!(config.refresh_cookie.max_age, 604_800_000);
        assert_eq!(
            config.refresh_cookie.max_age_duration(),
            Duration::from_secs(7 * 24 * 60 * 60)
        );
        assert!(config.cookie.http_only);
        assert!(config.refresh_cookie.http_only);
        assert_eq!(config.cookie.same_site, SameSite::Strict);
        assert_eq!(config.refresh_cookie.same_site, SameSite::Strict);
    }

    #[test]
    fn test_cors_literals() {
        let cors = ServerConfig::default().cors;
        assert!(cors.credentials);
        assert_eq!(cors.methods, vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"]);
        assert_eq!(
            cors.allowed_headers,
            vec!["Content-Type", "Authorization", "X-CSRF-Token"]
        );
        assert_eq!(cors.exposed_headers, vec!["Set-Cookie", "Date", "ETag"]);
    }

    #[test]
    fn test_csp_header_value() {
        let csp = ContentSecurityPolicy::default();
        assert_eq!(
            csp.header_value(),
            "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:"
        );
    }

    #[test]
    fn test_csp_empty_directive_renders_bare_name() {
        let mut directives = CspDirectives::default();
        directives.img_src.clear();
        assert!(directives.header_value().ends_with("; img-src"));
    }

    #[test]
    fn test_repeated_resolution_is_equal() {
        let env = inputs(Some("https://example.com"), Some("production"));
        assert_eq!(ServerConfig::resolve(&env), ServerConfig::resolve(&env));
    }

    #[test]
    fn test_json_shape_uses_camel_case() {
        let value = serde_json::to_value(ServerConfig::default()).unwrap();
        assert_eq!(value["rateLimiter"]["windowMs"], 600_000);
        assert_eq!(value["refreshCookie"]["maxAge"], 604_800_000u64);
        assert_eq!(value["cookie"]["sameSite"], "strict");
        assert_eq!(value["cors"]["allowedHeaders"][2], "X-CSRF-Token");
        assert_eq!(
            value["helmet"]["contentSecurityPolicy"]["directives"]["styleSrc"][1],
            "'unsafe-inline'"
        );
    }

    #[test]
    fn test_json_parses_back() {
        let config = ServerConfig::resolve(&inputs(Some("https://example.com"), Some("production")));
        let json = config.to_json_pretty().unwrap();
        let parsed: ServerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_to_toml_contains_sections() {
        let toml = ServerConfig::default().to_toml().unwrap();
        assert!(toml.contains("[cors]"));
        assert!(toml.contains("[rateLimiter]"));
        assert!(toml.contains("windowMs = 600000"));
        assert!(toml.contains("[refreshCookie]"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let parsed: ServerConfig =
            serde_json::from_str(r#"{ "cors": { "origin": "https://x.example" } }"#).unwrap();
        assert_eq!(parsed.cors.origin, "https://x.example");
        assert!(parsed.cors.credentials);
        assert_eq!(parsed.rate_limiter.max, 50);
    }
}
