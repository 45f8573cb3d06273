//! Helpers for v1 endpoint tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api::{AppState, routes};
use crate::db::{Database, SqliteDatabase};

pub async fn test_app() -> axum::Router {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Failed to run migrations");
    routes::create_router(AppState::new(db), false)
}

/// Send a request and return the status with the parsed body (`null` when empty).
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

/// Create a user and return its id.
pub async fn create_user(app: &axum::Router, username: &str) -> String {
    let (status, body) = send(app, "POST", "/api/v1/users", Some(json!({"username": username}))).await;
    assert_eq!(status, StatusCode::CREATED, "create user: {body}");
    body["id"].as_str().unwrap().to_string()
}

/// Create a property and return its id.
pub async fn create_property(app: &axum::Router, name: &str) -> String {
    let (status, body) = send(app, "POST", "/api/v1/properties", Some(json!({"name": name}))).await;
    assert_eq!(status, StatusCode::CREATED, "create property: {body}");
    body["id"].as_str().unwrap().to_string()
}
