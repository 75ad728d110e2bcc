//! Login, logout and the session/CSRF gate around the admin API

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use blog_axum::AuthConfig;
use blog_core::{MemoryCms, SessionSigner};
use serde_json::json;

use common::*;

#[tokio::test]
async fn test_login_success_sets_cookies() {
    let (app, _) = app();
    let body = format!(r#"{{"password":"{PASSWORD}"}}"#);
    let response = send(&app, json_request("POST", "/api/auth/login", &body)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(response.headers());
    let session = cookies
        .iter()
        .find(|c| c.starts_with("admin_session="))
        .expect("session cookie");
    assert!(session.contains("HttpOnly"));
    assert!(session.contains("Max-Age=3600"));
    assert!(session.contains("SameSite=Lax"));
    assert!(!session.contains("Secure"));

    let csrf_cookie = cookies
        .iter()
        .find(|c| c.starts_with("csrf_token="))
        .expect("csrf cookie");
    assert!(!csrf_cookie.contains("HttpOnly"));
    assert!(response.headers().get("x-csrf-token").is_some());

    assert_eq!(json_body(response).await, json!({"success": true}));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (app, _) = app();
    let response = send(
        &app,
        json_request("POST", "/api/auth/login", r#"{"password":"wrong"}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(response.headers()).is_empty());
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn test_login_without_configured_hash() {
    let auth = AuthConfig::new(SessionSigner::new(SECRET, 3600), cookie_settings());
    let (app, _) = app_with(auth, MemoryCms::new());

    let response = send(
        &app,
        json_request("POST", "/api/auth/login", r#"{"password":"anything"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(set_cookies(response.headers()).is_empty());
    assert_eq!(
        json_body(response).await["error"],
        "Admin password is not configured"
    );
}

#[tokio::test]
async fn test_login_without_session_secret() {
    let auth = AuthConfig::new(SessionSigner::unconfigured(3600), cookie_settings())
        .with_password_hash(auth_config().admin_password_hash.unwrap());
    let (app, _) = app_with(auth, MemoryCms::new());

    let body = format!(r#"{{"password":"{PASSWORD}"}}"#);
    let response = send(&app, json_request("POST", "/api/auth/login", &body)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(set_cookies(response.headers()).is_empty());
}

#[tokio::test]
async fn test_login_validation() {
    let (app, _) = app();

    for body in [r#"{}"#, r#"{"password":""}"#, "not json"] {
        let response = send(&app, json_request("POST", "/api/auth/login", body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert!(json_body(response).await["error"].is_string());
    }
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let (app, _) = app();

    for _ in 0..2 {
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/logout")
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookies = set_cookies(response.headers());
        let session = cookies
            .iter()
            .find(|c| c.starts_with("admin_session=;"))
            .expect("cleared session cookie");
        assert!(session.contains("Max-Age=0"));
        assert!(session.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        assert!(cookies.iter().any(|c| c.starts_with("csrf_token=;")));
        assert_eq!(json_body(response).await, json!({"success": true}));
    }
}

#[tokio::test]
async fn test_session_endpoint() {
    let (app, _) = app();

    let anonymous = Request::builder()
        .uri("/api/auth/session")
        .body(Body::empty())
        .unwrap();
    let body = json_body(send(&app, anonymous).await).await;
    assert_eq!(body["authenticated"], false);
    assert!(body.get("csrfToken").is_none());

    let login = login(&app).await;
    let body = json_body(send(&app, authed("GET", "/api/auth/session", &login, false, None)).await).await;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["csrfToken"], login.csrf.as_str());
}

#[tokio::test]
async fn test_admin_read_requires_session() {
    let (app, _) = app();

    let anonymous = Request::builder()
        .uri("/api/admin/articles")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, anonymous).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(json_body(response).await["error"].is_string());

    let forged = Request::builder()
        .uri("/api/admin/articles")
        .header(header::COOKIE, "admin_session=not-a-token")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, forged).await.status(), StatusCode::UNAUTHORIZED);

    let login = login(&app).await;
    let response = send(&app, authed("GET", "/api/admin/articles", &login, false, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-csrf-token").unwrap(),
        login.csrf.as_str()
    );
}

#[tokio::test]
async fn test_session_from_another_secret_is_rejected() {
    let (app, _) = app();
    let token = SessionSigner::new("some-other-secret", 3600)
        .create_session()
        .unwrap();

    let request = Request::builder()
        .uri("/api/admin/settings")
        .header(header::COOKIE, format!("admin_session={token}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, request).await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_mutation_requires_csrf_header() {
    let (app, _) = app();
    let login = login(&app).await;
    let body = r#"{"title":"Hello"}"#;

    let response = send(
        &app,
        authed("POST", "/api/admin/articles", &login, false, Some(body)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(json_body(response).await["error"].is_string());

    let mut wrong = authed("POST", "/api/admin/articles", &login, false, Some(body));
    wrong
        .headers_mut()
        .insert("X-CSRF-Token", "wrong-token".parse().unwrap());
    assert_eq!(send(&app, wrong).await.status(), StatusCode::FORBIDDEN);

    let response = send(
        &app,
        authed("POST", "/api/admin/articles", &login, true, Some(body)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["title"], "Hello");
}

#[tokio::test]
async fn test_mutation_without_session_is_401_not_403() {
    let (app, _) = app();
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/admin/tags/some-id")
        .header("X-CSRF-Token", "anything")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, request).await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_csrf_header_disabled() {
    let mut auth = auth_config();
    auth.respond_with_csrf_header = false;
    let (app, _) = app_with(auth, MemoryCms::new());

    let body = format!(r#"{{"password":"{PASSWORD}"}}"#);
    let response = send(&app, json_request("POST", "/api/auth/login", &body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-csrf-token").is_none());
}

#[tokio::test]
async fn test_admin_pages_redirect_to_login() {
    let (app, _) = app();

    let request = Request::builder()
        .uri("/admin/dashboard")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/admin/login");

    let request = Request::builder()
        .uri("/admin/login")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_ne!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
}
