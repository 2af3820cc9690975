//! Session and refresh-token cookies built from [`CookieConfig`].

use std::borrow::Cow;

use bulwark_config::{CookieConfig, SameSite, ServerConfig};
use cookie::Cookie;
use cookie::time::Duration;

/// Path every issued cookie is scoped to.
pub const COOKIE_PATH: &str = "/";

/// Build a cookie carrying the configured attributes.
///
/// `Max-Age` is rendered in whole seconds.
pub fn build_cookie<N, V>(attrs: &CookieConfig, name: N, value: V) -> Cookie<'static>
where
    N: Into<Cow<'static, str>>,
    V: Into<Cow<'static, str>>,
{
    let max_age_ms = i64::try_from(attrs.max_age).unwrap_or(i64::MAX);

    Cookie::build((name, value))
        .http_only(attrs.http_only)
        .secure(attrs.secure)
        .same_site(same_site(attrs.same_site))
        .max_age(Duration::milliseconds(max_age_ms))
        .path(COOKIE_PATH)
        .build()
}

/// Session cookie (`cookie` section).
pub fn session_cookie<N, V>(config: &ServerConfig, name: N, value: V) -> Cookie<'static>
where
    N: Into<Cow<'static, str>>,
    V: Into<Cow<'static, str>>,
{
    build_cookie(&config.cookie, name, value)
}

/// Refresh-token cookie (`refreshCookie` section).
pub fn refresh_cookie<N, V>(config: &ServerConfig, name: N, value: V) -> Cookie<'static>
where
    N: Into<Cow<'static, str>>,
    V: Into<Cow<'static, str>>,
{
    build_cookie(&config.refresh_cookie, name, value)
}

/// A cookie that clears `name` in the browser, keeping the same attributes.
pub fn removal_cookie<N>(attrs: &CookieConfig, name: N) -> Cookie<'static>
where
    N: Into<Cow<'static, str>>,
{
    let mut cookie = build_cookie(attrs, name, "");
    cookie.make_removal();
    cookie
}

fn same_site(value: SameSite) -> cookie::SameSite {
    match value {
        SameSite::Strict => cookie::SameSite::Strict,
        SameSite::Lax => cookie::SameSite::Lax,
        SameSite::None => cookie::SameSite::None,
    }
}
