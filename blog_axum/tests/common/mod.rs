//! Shared fixtures for driving the full router in-process
#![allow(dead_code)]

use std::sync::{Arc, LazyLock};

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
    response::Response,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use blog_axum::{AppState, AuthConfig, blog_router_no_trace};
use blog_core::{
    Article, ArticleStatus, CmsApi, CookieSettings, MemoryCms, SameSite, SessionSigner,
    SiteSettings, hash_password,
};

pub const PASSWORD: &str = "correct horse battery staple";
pub const SECRET: &str = "integration-test-secret-value";

/// Hashing is slow; do it once for the whole test binary.
static PASSWORD_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password(PASSWORD).expect("hash password"));

pub fn cookie_settings() -> CookieSettings {
    CookieSettings {
        session_name: "admin_session".to_string(),
        csrf_name: "csrf_token".to_string(),
        max_age: 3600,
        secure: false,
        same_site: SameSite::Lax,
    }
}

pub fn auth_config() -> AuthConfig {
    AuthConfig::new(SessionSigner::new(SECRET, 3600), cookie_settings())
        .with_password_hash(PASSWORD_HASH.as_str())
}

pub fn site() -> SiteSettings {
    let mut site = SiteSettings::new("https://blog.test", "Test Blog", "UTC").expect("site");
    site.page_size = 10;
    site
}

pub fn app_with(auth: AuthConfig, cms: MemoryCms) -> (Router, Arc<MemoryCms>) {
    let cms = Arc::new(cms);
    let state = AppState::new(auth, site(), cms.clone() as Arc<dyn CmsApi>);
    (blog_router_no_trace(state), cms)
}

pub fn app() -> (Router, Arc<MemoryCms>) {
    app_with(auth_config(), MemoryCms::new())
}

pub fn article(n: u32, status: ArticleStatus) -> Article {
    let base: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let at = base + Duration::days(n as i64);
    Article {
        id: format!("id-{n}"),
        slug: Some(format!("post-{n}")),
        title: format!("Post {n}"),
        description: format!("About post {n}"),
        content: format!("Body {n}"),
        tags: vec![if n % 2 == 0 { "even" } else { "odd" }.to_string()],
        category: Some("notes".to_string()),
        cover_image: None,
        status,
        created_at: at,
        updated_at: at,
        published_at: (status == ArticleStatus::Published).then_some(at),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("router is infallible")
}

pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn text_body(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn set_cookies(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// Credentials of a logged-in admin
pub struct Login {
    /// `name=value` pair for the `Cookie` header
    pub cookie: String,
    pub csrf: String,
}

pub async fn login(app: &Router) -> Login {
    let body = format!(r#"{{"password":"{PASSWORD}"}}"#);
    let response = send(app, json_request("POST", "/api/auth/login", &body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = set_cookies(response.headers())
        .into_iter()
        .find(|c| c.starts_with("admin_session="))
        .and_then(|c| c.split(';').next().map(str::to_string))
        .expect("session cookie");
    let csrf = response
        .headers()
        .get("x-csrf-token")
        .expect("csrf header")
        .to_str()
        .unwrap()
        .to_string();

    Login { cookie, csrf }
}

/// Request carrying the session cookie and, optionally, the CSRF header.
pub fn authed(
    method: &str,
    uri: &str,
    login: &Login,
    with_csrf: bool,
    body: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, login.cookie.as_str());
    if with_csrf {
        builder = builder.header("X-CSRF-Token", login.csrf.as_str());
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
