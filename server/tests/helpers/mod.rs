//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full axum
//! router backed by a fresh in-memory store, plus shortcuts for seeding users
//! and thoughts.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{self, Method, Request, Response, StatusCode};
use axum::Router;
use ecn_server::api::{create_router, AppState};
use ecn_server::config::Config;
use ecn_server::store::{MemoryStore, Store};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn Store>,
}

impl TestApp {
    /// Create a test app over an empty in-memory store.
    pub fn new() -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), Config::default_for_test());

        Self {
            router: create_router(state),
            store,
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// Send a bodiless request and return status plus parsed JSON.
    pub async fn send(&self, method: Method, uri: &str) -> (StatusCode, Value) {
        let req = Self::request(method, uri).body(Body::empty()).unwrap();
        let resp = self.oneshot(req).await;
        let status = resp.status();
        (status, body_to_json(resp).await)
    }

    /// Send a JSON body and return status plus parsed JSON.
    pub async fn send_json(&self, method: Method, uri: &str, body: &Value) -> (StatusCode, Value) {
        let req = Self::request(method, uri)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap();
        let resp = self.oneshot(req).await;
        let status = resp.status();
        (status, body_to_json(resp).await)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send_json(Method::POST, uri, body).await
    }

    pub async fn put(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send_json(Method::PUT, uri, body).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri).await
    }
}

// ============================================================================
// Seeding helpers
// ============================================================================

/// Create a user through the API and return its JSON.
pub async fn create_user(app: &TestApp, username: &str) -> Value {
    let (status, json) = app
        .post(
            "/api/users",
            &serde_json::json!({
                "username": username,
                "email": format!("{username}@example.com"),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create user failed: {json}");
    json
}

/// Create a thought through the API and return the `added` thought JSON.
pub async fn create_thought(app: &TestApp, username: &str, text: &str) -> Value {
    let (status, json) = app
        .post(
            "/api/thoughts",
            &serde_json::json!({ "username": username, "thoughtText": text }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create thought failed: {json}");
    json["added"].clone()
}

/// Read a string id field from a JSON document.
pub fn id_of(json: &Value) -> String {
    json["id"]
        .as_str()
        .unwrap_or_else(|| panic!("missing id in {json}"))
        .to_string()
}

/// Collect a JSON array of ids into strings.
pub fn ids(json: &Value) -> Vec<String> {
    json.as_array()
        .unwrap_or_else(|| panic!("expected array, got {json}"))
        .iter()
        .map(|v| v.as_str().expect("string id").to_string())
        .collect()
}

// ============================================================================
// Response helpers
// ============================================================================

/// Parse a response body as JSON.
pub async fn body_to_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        let preview = String::from_utf8_lossy(&bytes);
        panic!("Failed to parse response as JSON: {e}\nBody: {preview}")
    })
}
