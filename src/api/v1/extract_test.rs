//! Tests for request extractors and their error bodies.

use axum::http::StatusCode;
use serde_json::json;

use super::extract::field_from_message;
use super::test_support::{send, test_app};

#[test]
fn field_comes_from_the_deserializer_path() {
    let message = "Failed to deserialize the JSON body into the target type: housing_type: \
                   unknown variant `castle`, expected one of `apartment`, `studio`, `flat`, `plot` \
                   at line 1 column 40";
    assert_eq!(field_from_message(message).as_deref(), Some("housing_type"));
}

#[test]
fn query_string_path_is_used() {
    let message = "Failed to deserialize query string: date: input contains invalid characters";
    assert_eq!(field_from_message(message).as_deref(), Some("date"));
}

#[test]
fn missing_field_at_root_is_named() {
    let message = "Failed to deserialize the JSON body into the target type: \
                   missing field `unit_name` at line 1 column 2";
    assert_eq!(field_from_message(message).as_deref(), Some("unit_name"));
}

#[test]
fn message_without_a_field_yields_none() {
    let message = "Failed to parse the request body as JSON: EOF while parsing an object";
    assert_eq!(field_from_message(message), None);
    assert_eq!(field_from_message("Expected request with `Content-Type: application/json`"), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_required_field_names_it() {
    let app = test_app().await;

    let (status, error) = send(
        &app,
        "POST",
        "/api/v1/units",
        Some(json!({"housing_type": "flat", "area_sq_ft": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["field"], "unit_name");
    assert!(error["error"].as_str().unwrap().contains("unit_name"));
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_json_keeps_bad_request_with_json_body() {
    let app = test_app().await;
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/users")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("not json"))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    let status = response.status();
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let error: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].is_string());
    assert!(error["field"].is_null());
}

#[tokio::test(flavor = "multi_thread")]
async fn non_numeric_limit_is_unprocessable() {
    let app = test_app().await;

    let (status, error) = send(&app, "GET", "/api/v1/users?limit=many", None).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["field"], "limit");
}

#[tokio::test(flavor = "multi_thread")]
async fn limit_beyond_sqlite_range_is_clamped() {
    let app = test_app().await;
    send(
        &app,
        "POST",
        "/api/v1/units",
        Some(json!({"unit_name": "A-1", "housing_type": "flat", "area_sq_ft": 10})),
    )
    .await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/units?limit=18446744073709551615&offset=18446744073709551615",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 0);

    let (status, body) = send(&app, "GET", "/api/v1/units?limit=18446744073709551615", None).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}
