//! blog_axum - Axum routes, auth gates and error mapping for the blog web tier

mod config;
mod error;
mod handlers;
mod middleware;
mod router;
mod session;
mod state;

pub use config::{ADMIN_ASSETS_DIR, ADMIN_LOGIN_URL};
pub use error::ApiError;
pub use middleware::{is_authenticated_401, is_authenticated_redirect};
pub use router::{blog_router, blog_router_no_trace};
pub use session::{AdminSession, require_auth, require_auth_with_csrf};
pub use state::{AppState, AuthConfig};

// Re-export the core types callers need to build an `AppState`
pub use blog_core::{CmsApi, CookieSettings, HttpCms, MemoryCms, SessionSigner, SiteSettings};
