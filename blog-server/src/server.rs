use std::net::SocketAddr;
use std::sync::{Arc, LazyLock};

use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_core::{CMS_API_URL, CmsApi, CmsError, HttpCms, MemoryCms};

/// Listening port.
/// Default: 3000
pub(crate) static PORT: LazyLock<u16> = LazyLock::new(|| {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000)
});

/// "http" talks to the CMS at `CMS_API_URL`; "memory" keeps content in process.
/// Default: "http"
pub(crate) static CMS_BACKEND: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CMS_BACKEND")
        .map(|v| v.to_lowercase())
        .unwrap_or_else(|_| "http".to_string())
});

pub(crate) fn cms_from_env() -> Result<Arc<dyn CmsApi>, CmsError> {
    match CMS_BACKEND.as_str() {
        "memory" => {
            tracing::warn!("Using the in-memory CMS backend; content is lost on restart");
            Ok(Arc::new(MemoryCms::new()))
        }
        _ => {
            tracing::info!("Using CMS at {}", CMS_API_URL.as_str());
            Ok(Arc::new(HttpCms::from_env()?))
        }
    }
}

pub(crate) async fn serve_http(port: u16, app: Router) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
}

pub(crate) fn init_tracing(app_name: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        #[cfg(debug_assertions)]
        {
            format!("blog_axum=debug,blog_core=debug,{app_name}=debug,tower_http=debug,info").into()
        }

        #[cfg(not(debug_assertions))]
        {
            "info".into()
        }
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    #[cfg(debug_assertions)]
    tracing::info!("Debug build: detailed logging enabled by default");
    tracing::info!("Set RUST_LOG to change verbosity, e.g. RUST_LOG=debug ./blog-server");
}
