//! Integration tests for unit endpoints.

use axum::http::StatusCode;
use serde_json::json;

use super::test_support::{create_property, send, test_app};

#[tokio::test(flavor = "multi_thread")]
async fn create_unit_without_property_provisions_one() {
    let app = test_app().await;

    let (status, unit) = send(
        &app,
        "POST",
        "/api/v1/units",
        Some(json!({
            "unit_name": "G-607",
            "housing_type": "apartment",
            "area_sq_ft": 750
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(unit["unit_name"], "G-607");
    assert_eq!(unit["housing_type"], "apartment");
    let property_id = unit["property_id"].as_str().expect("property assigned");

    let (status, property) =
        send(&app, "GET", &format!("/api/v1/properties/{}", property_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(property["name"], "G-607");
}

#[tokio::test(flavor = "multi_thread")]
async fn create_unit_with_property_keeps_it() {
    let app = test_app().await;
    let property_id = create_property(&app, "Tower A").await;

    let (status, unit) = send(
        &app,
        "POST",
        "/api/v1/units",
        Some(json!({
            "unit_name": "A-1201",
            "housing_type": "flat",
            "area_sq_ft": 1100,
            "property_id": property_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(unit["property_id"], property_id.as_str());

    let (_, properties) = send(&app, "GET", "/api/v1/properties", None).await;
    assert_eq!(properties["total"], 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_unit_name_conflicts_without_orphans() {
    let app = test_app().await;
    let body = json!({"unit_name": "G-607", "housing_type": "studio", "area_sq_ft": 300});

    let (status, _) = send(&app, "POST", "/api/v1/units", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = send(&app, "POST", "/api/v1/units", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["field"], "unit_name");

    let (_, properties) = send(&app, "GET", "/api/v1/properties", None).await;
    assert_eq!(properties["total"], 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_housing_type_is_rejected() {
    let app = test_app().await;

    let (status, error) = send(
        &app,
        "POST",
        "/api/v1/units",
        Some(json!({"unit_name": "X", "housing_type": "castle", "area_sq_ft": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["field"], "housing_type");
    assert!(error["error"].as_str().unwrap().contains("castle"));

    let (_, properties) = send(&app, "GET", "/api/v1/properties", None).await;
    assert_eq!(properties["total"], 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_housing_type_filter_is_rejected() {
    let app = test_app().await;

    let (status, error) = send(&app, "GET", "/api/v1/units?housing_type=castle", None).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["field"], "housing_type");
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_property_is_a_validation_error() {
    let app = test_app().await;

    let (status, error) = send(
        &app,
        "POST",
        "/api/v1/units",
        Some(json!({
            "unit_name": "X-1",
            "housing_type": "plot",
            "area_sq_ft": 5000,
            "property_id": "deadbeef"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["field"], "property");
}

#[tokio::test(flavor = "multi_thread")]
async fn patch_unit_fields_and_reprovision_on_null_property() {
    let app = test_app().await;
    let building = create_property(&app, "Tower B").await;
    let (_, unit) = send(
        &app,
        "POST",
        "/api/v1/units",
        Some(json!({
            "unit_name": "B-2",
            "housing_type": "apartment",
            "area_sq_ft": 800,
            "property_id": building
        })),
    )
    .await;
    let id = unit["id"].as_str().unwrap();

    let (status, patched) = send(
        &app,
        "PATCH",
        &format!("/api/v1/units/{}", id),
        Some(json!({"area_sq_ft": 820})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["area_sq_ft"], 820);
    assert_eq!(patched["property_id"], building.as_str());

    let (status, patched) = send(
        &app,
        "PATCH",
        &format!("/api/v1/units/{}", id),
        Some(json!({"property_id": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_property = patched["property_id"].as_str().unwrap();
    assert_ne!(new_property, building);

    let (_, property) = send(&app, "GET", &format!("/api/v1/properties/{}", new_property), None).await;
    assert_eq!(property["name"], "B-2");
}

#[tokio::test(flavor = "multi_thread")]
async fn list_units_by_housing_type() {
    let app = test_app().await;
    for (name, kind) in [("S-1", "studio"), ("A-1", "apartment"), ("S-2", "studio")] {
        send(
            &app,
            "POST",
            "/api/v1/units",
            Some(json!({"unit_name": name, "housing_type": kind, "area_sq_ft": 400})),
        )
        .await;
    }

    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/units?housing_type=studio&sort=unit_name&order=desc",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    let names: Vec<_> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["unit_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["S-2", "S-1"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_unit_then_not_found() {
    let app = test_app().await;
    let (_, unit) = send(
        &app,
        "POST",
        "/api/v1/units",
        Some(json!({"unit_name": "D-1", "housing_type": "flat", "area_sq_ft": 500})),
    )
    .await;
    let uri = format!("/api/v1/units/{}", unit["id"].as_str().unwrap());

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, error) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error["field"].is_null());
}
