//! Central configuration for the blog_axum crate

use std::sync::LazyLock;

/// Where unauthenticated visitors to admin pages are sent.
/// Default: "/admin/login"
pub static ADMIN_LOGIN_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("ADMIN_LOGIN_URL").unwrap_or_else(|_| "/admin/login".to_string())
});

/// Directory holding the built admin UI.
/// Default: "admin"
pub static ADMIN_ASSETS_DIR: LazyLock<String> = LazyLock::new(|| {
    std::env::var("ADMIN_ASSETS_DIR").unwrap_or_else(|_| "admin".to_string())
});

/// Argon2 PHC string of the single admin password. Login answers 500 while unset.
pub static ADMIN_PASSWORD_HASH: LazyLock<Option<String>> = LazyLock::new(|| {
    std::env::var("ADMIN_PASSWORD_HASH")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
});

pub static RESPOND_WITH_X_CSRF_TOKEN: LazyLock<bool> = LazyLock::new(|| {
    std::env::var("RESPOND_WITH_X_CSRF_TOKEN")
        .map(|val| val.to_lowercase() != "false")
        .unwrap_or(true)
});
