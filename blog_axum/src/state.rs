use std::fmt;
use std::sync::Arc;

use blog_core::{CmsApi, CookieSettings, SessionSigner, SiteSettings};

use crate::config::{ADMIN_PASSWORD_HASH, RESPOND_WITH_X_CSRF_TOKEN};

/// Everything the auth gate needs to issue and check sessions.
#[derive(Clone)]
pub struct AuthConfig {
    pub signer: SessionSigner,
    pub cookies: CookieSettings,
    /// Argon2 PHC string; `None` when no admin password is configured
    pub admin_password_hash: Option<String>,
    /// Echo the CSRF token as `X-CSRF-Token` on authenticated responses
    pub respond_with_csrf_header: bool,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signer", &self.signer)
            .field("cookies", &self.cookies)
            .field(
                "admin_password_hash",
                &self
                    .admin_password_hash
                    .as_ref()
                    .map(|_| "[REDACTED]")
                    .unwrap_or("[UNSET]"),
            )
            .field("respond_with_csrf_header", &self.respond_with_csrf_header)
            .finish()
    }
}

impl AuthConfig {
    pub fn new(signer: SessionSigner, cookies: CookieSettings) -> Self {
        Self {
            signer,
            cookies,
            admin_password_hash: None,
            respond_with_csrf_header: true,
        }
    }

    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.admin_password_hash = Some(hash.into());
        self
    }

    pub fn from_env() -> Self {
        let config = Self {
            signer: SessionSigner::from_env(),
            cookies: CookieSettings::from_env(),
            admin_password_hash: ADMIN_PASSWORD_HASH.clone(),
            respond_with_csrf_header: *RESPOND_WITH_X_CSRF_TOKEN,
        };
        if config.admin_password_hash.is_none() {
            tracing::warn!("ADMIN_PASSWORD_HASH is not set; admin login will be unavailable");
        }
        config
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthConfig>,
    pub site: Arc<SiteSettings>,
    pub cms: Arc<dyn CmsApi>,
}

impl AppState {
    pub fn new(auth: AuthConfig, site: SiteSettings, cms: Arc<dyn CmsApi>) -> Self {
        Self {
            auth: Arc::new(auth),
            site: Arc::new(site),
            cms,
        }
    }

    pub fn from_env(cms: Arc<dyn CmsApi>) -> Self {
        Self::new(AuthConfig::from_env(), SiteSettings::from_env(), cms)
    }
}
