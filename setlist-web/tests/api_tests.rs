//! Integration tests for setlist-web API endpoints
//!
//! Tests cover:
//! - Registration and login validation
//! - Session cookie authentication middleware
//! - Owner-scoped song CRUD
//! - Whole-collection reorder
//! - Health endpoint (no auth required)

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

use setlist_web::{build_router, AppState};

/// Test helper: Create app backed by a fresh in-memory database
async fn setup_app() -> Router {
    let db = setlist_common::db::init_memory_database()
        .await
        .expect("Should create in-memory database");
    build_router(AppState::new(db))
}

/// Test helper: Create a JSON request, optionally authenticated
fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("setlist_session={}", token));
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

/// Test helper: Create a bodiless request, optionally authenticated
fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("setlist_session={}", token));
    }

    builder.body(Body::empty()).unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Test helper: Register an account and log in, returning the session token
async fn register_and_login(app: &Router, email: &str) -> String {
    let request = json_request(
        "POST",
        "/api/auth/register",
        None,
        json!({ "name": "Test User", "email": email, "password": "secret123" }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let request = json_request(
        "POST",
        "/api/auth/login",
        None,
        json!({ "email": email, "password": "secret123" }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Login should set session cookie")
        .to_str()
        .unwrap();

    cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, token)| token.to_string())
        .expect("Cookie should carry a token")
}

/// Test helper: Create a song, returning its JSON representation
async fn create_song(app: &Router, token: &str, title: &str) -> Value {
    let request = json_request(
        "POST",
        "/api/songs",
        Some(token),
        json!({ "title": title }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    extract_json(response.into_body()).await
}

// =============================================================================
// Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_no_auth_required() {
    let app = setup_app().await;

    let response = app
        .oneshot(bare_request("GET", "/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "setlist-web");
    assert!(body["version"].is_string());
}

// =============================================================================
// Authentication Tests
// =============================================================================

#[tokio::test]
async fn test_songs_require_session() {
    let app = setup_app().await;

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/songs", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    // A made-up token is rejected too
    let response = app
        .oneshot(bare_request("GET", "/api/songs", Some("bogus-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validation() {
    let app = setup_app().await;

    // Name too short
    let request = json_request(
        "POST",
        "/api/auth/register",
        None,
        json!({ "name": "A", "email": "a@example.com", "password": "secret123" }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Malformed email
    let request = json_request(
        "POST",
        "/api/auth/register",
        None,
        json!({ "name": "Alice", "email": "not-an-email", "password": "secret123" }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Password too short
    let request = json_request(
        "POST",
        "/api/auth/register",
        None,
        json!({ "name": "Alice", "email": "a@example.com", "password": "short" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = setup_app().await;
    register_and_login(&app, "dup@example.com").await;

    let request = json_request(
        "POST",
        "/api/auth/register",
        None,
        json!({ "name": "Other", "email": "dup@example.com", "password": "secret123" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_login_wrong_password_rejected() {
    let app = setup_app().await;
    register_and_login(&app, "alice@example.com").await;

    let request = json_request(
        "POST",
        "/api/auth/login",
        None,
        json!({ "email": "alice@example.com", "password": "wrong-password" }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Unknown email is indistinguishable from a wrong password
    let request = json_request(
        "POST",
        "/api/auth/login",
        None,
        json!({ "email": "nobody@example.com", "password": "wrong-password" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let app = setup_app().await;
    let token = register_and_login(&app, "alice@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/logout", Some(&token), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(bare_request("GET", "/api/songs", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Song CRUD Tests
// =============================================================================

#[tokio::test]
async fn test_song_crud_flow() {
    let app = setup_app().await;
    let token = register_and_login(&app, "alice@example.com").await;

    // Starts empty
    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/songs", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    // Create
    let song = create_song(&app, &token, "Amazing Grace").await;
    assert_eq!(song["title"], "Amazing Grace");
    assert_eq!(song["order"], 0);
    assert_eq!(song["sequence"].as_array().unwrap().len(), 0);
    let id = song["id"].as_str().unwrap().to_string();

    // Update title, key, and sequence
    let request = json_request(
        "PUT",
        &format!("/api/songs/{}", id),
        Some(&token),
        json!({
            "title": "Amazing Grace (My Chains Are Gone)",
            "key": "G",
            "sequence": [
                { "id": "a0000000-0000-0000-0000-000000000001", "type": "base",
                  "element": "Verse", "order": 5, "occurrence": 1 },
                { "id": "a0000000-0000-0000-0000-000000000002", "type": "base",
                  "element": "Chorus", "order": 9 }
            ]
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let song = extract_json(response.into_body()).await;
    assert_eq!(song["title"], "Amazing Grace (My Chains Are Gone)");
    assert_eq!(song["key"], "G");
    // Sequence positions are renumbered densely
    assert_eq!(song["sequence"][0]["order"], 0);
    assert_eq!(song["sequence"][1]["order"], 1);

    // Delete
    let response = app
        .clone()
        .oneshot(bare_request("DELETE", &format!("/api/songs/{}", id), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(bare_request("GET", "/api/songs", Some(&token)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_song_requires_title() {
    let app = setup_app().await;
    let token = register_and_login(&app, "alice@example.com").await;

    let request = json_request("POST", "/api/songs", Some(&token), json!({ "title": "   " }));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_repairs_mismatched_sequence_kinds() {
    let app = setup_app().await;
    let token = register_and_login(&app, "alice@example.com").await;
    let song = create_song(&app, &token, "Song").await;
    let id = song["id"].as_str().unwrap().to_string();

    // Client lies about both kinds and numbers a flow element
    let request = json_request(
        "PUT",
        &format!("/api/songs/{}", id),
        Some(&token),
        json!({
            "sequence": [
                { "id": "a0000000-0000-0000-0000-000000000001", "type": "flow",
                  "element": "Verse", "order": 0, "occurrence": 3 },
                { "id": "a0000000-0000-0000-0000-000000000002", "type": "base",
                  "element": "Build", "order": 1, "occurrence": 2 }
            ]
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let song = extract_json(response.into_body()).await;
    assert_eq!(song["sequence"][0]["type"], "base");
    assert_eq!(song["sequence"][0]["occurrence"], 3);
    assert_eq!(song["sequence"][1]["type"], "flow");
    assert!(song["sequence"][1].get("occurrence").is_none());
}

#[tokio::test]
async fn test_update_missing_song_is_404() {
    let app = setup_app().await;
    let token = register_and_login(&app, "alice@example.com").await;

    let request = json_request(
        "PUT",
        "/api/songs/00000000-0000-0000-0000-000000000000",
        Some(&token),
        json!({ "title": "Ghost" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Collection Reorder Tests
// =============================================================================

#[tokio::test]
async fn test_reorder_whole_collection() {
    let app = setup_app().await;
    let token = register_and_login(&app, "alice@example.com").await;

    let a = create_song(&app, &token, "Song A").await;
    let b = create_song(&app, &token, "Song B").await;
    let c = create_song(&app, &token, "Song C").await;

    // Move C to the front: [A, B, C] -> [C, A, B]
    let request = json_request(
        "PUT",
        "/api/songs/reorder",
        Some(&token),
        json!({ "songs": [
            { "id": c["id"], "order": 0 },
            { "id": a["id"], "order": 1 },
            { "id": b["id"], "order": 2 }
        ]}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(bare_request("GET", "/api/songs", Some(&token)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Song C", "Song A", "Song B"]);
    assert_eq!(body[0]["order"], 0);
    assert_eq!(body[1]["order"], 1);
    assert_eq!(body[2]["order"], 2);
}

#[tokio::test]
async fn test_reorder_empty_batch_rejected() {
    let app = setup_app().await;
    let token = register_and_login(&app, "alice@example.com").await;

    let request = json_request("PUT", "/api/songs/reorder", Some(&token), json!({ "songs": [] }));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Ownership Scoping Tests
// =============================================================================

#[tokio::test]
async fn test_songs_are_scoped_to_owner() {
    let app = setup_app().await;
    let alice = register_and_login(&app, "alice@example.com").await;
    let bob = register_and_login(&app, "bob@example.com").await;

    let song = create_song(&app, &alice, "Alice's Song").await;
    let id = song["id"].as_str().unwrap().to_string();

    // Bob sees an empty collection
    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/songs", Some(&bob)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    // Bob cannot update or delete Alice's song
    let request = json_request(
        "PUT",
        &format!("/api/songs/{}", id),
        Some(&bob),
        json!({ "title": "Hijacked" }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(bare_request("DELETE", &format!("/api/songs/{}", id), Some(&bob)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Bob cannot reorder with Alice's ids
    let request = json_request(
        "PUT",
        "/api/songs/reorder",
        Some(&bob),
        json!({ "songs": [{ "id": id, "order": 0 }] }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Alice's song is untouched
    let response = app
        .oneshot(bare_request("GET", "/api/songs", Some(&alice)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body[0]["title"], "Alice's Song");
}

// =============================================================================
// Settings Tests
// =============================================================================

#[tokio::test]
async fn test_settings_publishes_save_debounce() {
    let app = setup_app().await;
    let token = register_and_login(&app, "alice@example.com").await;

    let response = app
        .oneshot(bare_request("GET", "/api/settings", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["save_debounce_ms"], 5000);
}
