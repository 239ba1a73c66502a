//! End-to-end tests for the HTTP surface
//!
//! These wire the real router over in-memory stores, with wiremock standing
//! in for the Google token, userinfo and Drive endpoints.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use drivegen_auth::{AuthClient, OAuthConfig};
use drivegen_core::{EchoBackend, MemoryIngestStore, MemorySessionStore, EXAMPLE_DELIMITER};
use drivegen_drive::{DriveClient, DriveConfig};
use drivegen_server::{router, AppState};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CLIENT_URL: &str = "http://localhost:5173";
const COOKIE_NAME: &str = "drivegen_sid";

/// Build an app whose auth and Drive upstreams both point at `google`.
fn test_app(google: &MockServer) -> Router {
    let oauth = OAuthConfig::new(
        "test-client",
        "test-secret",
        "http://localhost:5000/auth/google/callback".parse().unwrap(),
    )
    .with_token_url(format!("{}/token", google.uri()).parse().unwrap())
    .with_userinfo_url(format!("{}/userinfo", google.uri()).parse().unwrap());

    let drive = DriveConfig::default().with_base_url(google.uri());

    let state = AppState::new(
        Arc::new(MemorySessionStore::new()),
        Arc::new(MemoryIngestStore::new()),
        Arc::new(AuthClient::new(oauth).unwrap()),
        Arc::new(DriveClient::new(drive).unwrap()),
        Arc::new(EchoBackend),
        CLIENT_URL,
        COOKIE_NAME,
        false,
        10,
    );

    router(state).unwrap()
}

async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().method("GET").uri(uri);
    if let Some(sid) = cookie {
        request = request.header(header::COOKIE, format!("{}={}", COOKIE_NAME, sid));
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(
    app: &Router,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(sid) = cookie {
        request = request.header(header::COOKIE, format!("{}={}", COOKIE_NAME, sid));
    }
    app.clone()
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect has a Location header")
        .to_str()
        .unwrap()
}

/// Mount the token and userinfo mocks for a successful login.
async fn mount_login_mocks(google: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok1",
            "token_type": "Bearer",
            "expires_in": 3599
        })))
        .mount(google)
        .await;

    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "name": "Jane",
            "email": "jane@example.com"
        })))
        .mount(google)
        .await;
}

/// Complete the callback flow and return the session cookie value.
async fn login(app: &Router) -> String {
    let response = get(app, "/auth/google/callback?code=abc123", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("{}/profile", CLIENT_URL));

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("callback sets the session cookie")
        .to_str()
        .unwrap();
    let pair = set_cookie.split(';').next().unwrap();
    let (name, value) = pair.split_once('=').unwrap();
    assert_eq!(name, COOKIE_NAME);
    value.to_string()
}

#[tokio::test]
async fn test_protected_endpoints_reject_anonymous_without_upstream_calls() {
    let google = MockServer::start().await;

    // Any upstream call from an anonymous request is a bug
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&google)
        .await;

    let app = test_app(&google);

    for uri in ["/auth/status", "/drive/connect", "/drive/files", "/drive/file-content/f1"] {
        let response = get(&app, uri, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let response = post_json(&app, "/ingest", None, json!({"fileId": "f1", "content": "x"})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(&app, "/generate", None, json!({"prompt": "x"})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A stale cookie for a session that never existed is equally anonymous
    let response = get(&app, "/auth/status", Some("not-a-session")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_begin_authorization_redirects_to_consent_screen() {
    let google = MockServer::start().await;
    let app = test_app(&google);

    let response = get(&app, "/auth/google", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let target = location(&response);
    assert!(target.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
    assert!(target.contains("client_id=test-client"));
    assert!(target.contains("drive.readonly"));
}

#[tokio::test]
async fn test_login_status_logout_roundtrip() {
    let google = MockServer::start().await;
    mount_login_mocks(&google).await;
    let app = test_app(&google);

    let sid = login(&app).await;

    // Status returns the stored profile with the injected token
    let response = get(&app, "/auth/status", Some(&sid)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert_eq!(first["user"]["id"], "u1");
    assert_eq!(first["user"]["displayName"], "Jane");
    assert_eq!(first["user"]["accessToken"], "tok1");
    assert_eq!(first["user"]["emails"][0], "jane@example.com");

    // Idempotent: the same unchanged session returns an identical body
    let second = body_json(get(&app, "/auth/status", Some(&sid)).await).await;
    assert_eq!(first, second);

    // Logout destroys the session and sends the browser home
    let response = get(&app, "/auth/logout", Some(&sid)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), CLIENT_URL);

    let response = get(&app, "/auth/status", Some(&sid)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_callback_provider_error_redirects_to_failure_page() {
    let google = MockServer::start().await;
    let app = test_app(&google);

    let response = get(&app, "/auth/google/callback?error=access_denied", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        format!("{}/auth/failure?error=access_denied", CLIENT_URL)
    );
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_callback_exchange_failure_redirects_to_failure_page() {
    let google = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .mount(&google)
        .await;

    let app = test_app(&google);

    let response = get(&app, "/auth/google/callback?code=expired", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        format!("{}/auth/failure?error=exchange_failed", CLIENT_URL)
    );
}

#[tokio::test]
async fn test_drive_connect_redirects_back_to_profile() {
    let google = MockServer::start().await;
    mount_login_mocks(&google).await;
    let app = test_app(&google);
    let sid = login(&app).await;

    let response = get(&app, "/drive/connect", Some(&sid)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("{}/profile", CLIENT_URL));
}

#[tokio::test]
async fn test_drive_files_proxies_the_listing() {
    let google = MockServer::start().await;
    mount_login_mocks(&google).await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("pageSize", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [
                { "id": "f1", "name": "notes.txt" },
                { "id": "f2", "name": "draft" }
            ]
        })))
        .mount(&google)
        .await;

    let app = test_app(&google);
    let sid = login(&app).await;

    let response = get(&app, "/drive/files", Some(&sid)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["files"][0]["id"], "f1");
    assert_eq!(body["files"][1]["name"], "draft");
}

#[tokio::test]
async fn test_drive_upstream_failure_surfaces_as_500_with_generic_error() {
    let google = MockServer::start().await;
    mount_login_mocks(&google).await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Invalid Credentials" }
        })))
        .mount(&google)
        .await;

    let app = test_app(&google);
    let sid = login(&app).await;

    let response = get(&app, "/drive/files", Some(&sid)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    // Upstream detail stays in the logs, not on the wire
    assert_eq!(body["error"], "Upstream request failed");
}

#[tokio::test]
async fn test_file_content_endpoint_returns_file_text() {
    let google = MockServer::start().await;
    mount_login_mocks(&google).await;

    Mock::given(method("GET"))
        .and(path("/files/f7"))
        .and(query_param("fields", "id, name, mimeType"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "f7",
            "name": "essay.txt",
            "mimeType": "text/plain"
        })))
        .mount(&google)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/f7"))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_string("essay body"))
        .mount(&google)
        .await;

    let app = test_app(&google);
    let sid = login(&app).await;

    let response = get(&app, "/drive/file-content/f7", Some(&sid)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["fileId"], "f7");
    assert_eq!(body["content"], "essay body");
}

#[tokio::test]
async fn test_ingest_then_generate_concatenates_prompt_and_content() {
    let google = MockServer::start().await;
    mount_login_mocks(&google).await;
    let app = test_app(&google);
    let sid = login(&app).await;

    let response = post_json(
        &app,
        "/ingest",
        Some(&sid),
        json!({"fileId": "f1", "content": "hello"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    let response = post_json(&app, "/generate", Some(&sid), json!({"prompt": "Write a poem"})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let generated = body["generatedContent"].as_str().unwrap();
    assert_eq!(generated, format!("Write a poem{EXAMPLE_DELIMITER}hello"));

    // The prompt precedes the ingested content
    assert!(generated.find("Write a poem").unwrap() < generated.find("hello").unwrap());
}

#[tokio::test]
async fn test_healthz() {
    let google = MockServer::start().await;
    let app = test_app(&google);

    let response = get(&app, "/healthz", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}
