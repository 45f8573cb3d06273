//! Integration tests for post endpoints.

use axum::http::StatusCode;
use serde_json::json;

use super::test_support::{create_user, send, test_app};

#[tokio::test(flavor = "multi_thread")]
async fn post_lifecycle() {
    let app = test_app().await;
    let author = create_user(&app, "writer").await;

    let (status, post) = send(
        &app,
        "POST",
        "/api/v1/posts",
        Some(json!({"title": "Moving in", "author_id": author, "body": "Keys at reception"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/v1/posts/{}", post["id"].as_str().unwrap());

    let (status, patched) = send(&app, "PATCH", &uri, Some(json!({"title": "Moved in"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["title"], "Moved in");
    assert_eq!(patched["body"], "Keys at reception");

    let (_, list) = send(&app, "GET", &format!("/api/v1/posts?author_id={}", author), None).await;
    assert_eq!(list["total"], 1);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test(flavor = "multi_thread")]
async fn post_with_unknown_author_is_rejected() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/posts",
        Some(json!({"title": "Ghost", "author_id": "00000000"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "author");
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_author_removes_posts() {
    let app = test_app().await;
    let author = create_user(&app, "writer").await;
    send(
        &app,
        "POST",
        "/api/v1/posts",
        Some(json!({"title": "Hello", "author_id": author})),
    )
    .await;

    send(&app, "DELETE", &format!("/api/v1/users/{}", author), None).await;

    let (_, list) = send(&app, "GET", "/api/v1/posts", None).await;
    assert_eq!(list["total"], 0);
}
