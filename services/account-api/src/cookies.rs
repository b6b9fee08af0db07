//! Session cookie helpers
//!
//! Tokens travel as HttpOnly cookies so browser scripts cannot read
//! them; API clients may use the `Authorization` header instead.

use axum::http::header::{HeaderName, SET_COOKIE};

use harbor_auth_core::AuthConfig;
use harbor_types::TokenPair;

/// Cookie carrying the short-lived access token
pub const ACCESS_COOKIE: &str = "accessToken";

/// Cookie carrying the long-lived refresh token
pub const REFRESH_COOKIE: &str = "refreshToken";

fn set_cookie(name: &str, value: &str, max_age_secs: u64) -> String {
    format!("{name}={value}; HttpOnly; Secure; SameSite=Strict; Path=/; Max-Age={max_age_secs}")
}

/// Set-Cookie headers installing a fresh token pair
pub fn session_cookies(tokens: &TokenPair, config: &AuthConfig) -> [(HeaderName, String); 2] {
    [
        (
            SET_COOKIE,
            set_cookie(
                ACCESS_COOKIE,
                &tokens.access_token,
                config.access_token_ttl.as_secs(),
            ),
        ),
        (
            SET_COOKIE,
            set_cookie(
                REFRESH_COOKIE,
                &tokens.refresh_token,
                config.refresh_token_ttl.as_secs(),
            ),
        ),
    ]
}

/// Set-Cookie headers clearing both token cookies
pub fn expired_session_cookies() -> [(HeaderName, String); 2] {
    [
        (SET_COOKIE, set_cookie(ACCESS_COOKIE, "", 0)),
        (SET_COOKIE, set_cookie(REFRESH_COOKIE, "", 0)),
    ]
}

/// Find a named cookie in a `Cookie` header value
pub fn find_cookie<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(name) {
            if let Some(value) = value.strip_prefix('=') {
                return Some(value);
            }
        }
    }
    None
}
