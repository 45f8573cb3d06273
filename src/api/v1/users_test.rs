//! Integration tests for user endpoints.

use axum::http::StatusCode;
use serde_json::json;

use super::test_support::{create_user, send, test_app};

#[tokio::test(flavor = "multi_thread")]
async fn create_get_and_list_users() {
    let app = test_app().await;
    let id = create_user(&app, "alice").await;
    create_user(&app, "bob").await;

    let (status, user) = send(&app, "GET", &format!("/api/v1/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["username"], "alice");
    assert!(user["created_at"].is_string());

    let (status, list) = send(&app, "GET", "/api/v1/users?limit=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 2);
    assert_eq!(list["limit"], 1);
    assert_eq!(list["items"].as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_username_conflicts() {
    let app = test_app().await;
    create_user(&app, "alice").await;

    let (status, body) = send(&app, "POST", "/api/v1/users", Some(json!({"username": "alice"}))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["field"], "username");
}

#[tokio::test(flavor = "multi_thread")]
async fn patch_and_delete_user() {
    let app = test_app().await;
    let id = create_user(&app, "carol").await;
    let uri = format!("/api/v1/users/{}", id);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({"username": "caroline"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "caroline");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains(&id));
}
