//! Central configuration for the blog_core crate
//!
//! Values are read from the environment once, on first access. Numeric values
//! that fail to parse fall back to their defaults.

use std::env;
use std::sync::LazyLock;

/// Name of the HttpOnly cookie carrying the signed session token.
/// Default: "admin_session"
pub static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    env::var("SESSION_COOKIE_NAME")
        .ok()
        .unwrap_or("admin_session".to_string())
});

/// Name of the script-readable cookie carrying the CSRF token.
/// Default: "csrf_token"
pub static CSRF_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    env::var("CSRF_COOKIE_NAME")
        .ok()
        .unwrap_or("csrf_token".to_string())
});

/// Lifetime of a session token and its cookie, in seconds.
/// Default: 7 days
/// Capped at `MAX_SESSION_AGE_SECS`.
pub static SESSION_MAX_AGE: LazyLock<u64> =
    LazyLock::new(|| bounded_max_age(env_or("SESSION_MAX_AGE", 604_800)));

/// Upper bound for session lifetimes: ten years.
pub const MAX_SESSION_AGE_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Secret used to sign session tokens and derive CSRF tokens.
/// No default: signing fails with a configuration error when unset.
pub(crate) static SESSION_SECRET: LazyLock<Option<Vec<u8>>> =
    LazyLock::new(|| env_secret("SESSION_SECRET"));

/// Whether cookies carry the `Secure` attribute.
/// True when `APP_ENV=production`.
pub static COOKIE_SECURE: LazyLock<bool> =
    LazyLock::new(|| is_production(env::var("APP_ENV").ok().as_deref()));

pub static CMS_API_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("CMS_API_URL")
        .ok()
        .unwrap_or("http://127.0.0.1:8080".to_string())
});

pub static CMS_API_KEY: LazyLock<Option<String>> =
    LazyLock::new(|| env::var("CMS_API_KEY").ok().filter(|s| !s.is_empty()));

pub static CMS_TIMEOUT_SECS: LazyLock<u64> =
    LazyLock::new(|| env_or("CMS_TIMEOUT_SECS", 10));

pub static SITE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("SITE_URL")
        .ok()
        .unwrap_or("http://localhost:3000".to_string())
});

pub static SITE_TITLE: LazyLock<String> =
    LazyLock::new(|| env::var("SITE_TITLE").ok().unwrap_or("My Blog".to_string()));

pub static SITE_DESCRIPTION: LazyLock<String> =
    LazyLock::new(|| env::var("SITE_DESCRIPTION").ok().unwrap_or_default());

/// IANA timezone used when formatting dates for display.
pub static SITE_TIMEZONE: LazyLock<String> =
    LazyLock::new(|| env::var("SITE_TIMEZONE").ok().unwrap_or("UTC".to_string()));

/// Articles per page on the public listing.
pub static PAGE_SIZE: LazyLock<u32> =
    LazyLock::new(|| env_or("PAGE_SIZE", 10));

/// Number of entries in the RSS feed.
pub static FEED_LIMIT: LazyLock<usize> =
    LazyLock::new(|| env_or("FEED_LIMIT", 20));

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    parse_or(env::var(key).ok(), default)
}

/// An unset or empty variable yields `None`.
fn env_secret(key: &str) -> Option<Vec<u8>> {
    env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .map(String::into_bytes)
}

fn bounded_max_age(secs: u64) -> u64 {
    if secs > MAX_SESSION_AGE_SECS {
        tracing::warn!(
            "SESSION_MAX_AGE {} exceeds the maximum; using {}",
            secs,
            MAX_SESSION_AGE_SECS
        );
        return MAX_SESSION_AGE_SECS;
    }
    secs
}

fn is_production(app_env: Option<&str>) -> bool {
    app_env
        .map(|v| v.eq_ignore_ascii_case("production"))
        .unwrap_or(false)
}
