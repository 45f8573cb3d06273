use serde_json::Value;

use super::test_support::spawn_test_server;
use crate::cli::api_client::ApiClient;
use crate::cli::commands::PageParams;
use crate::cli::commands::property::*;
use crate::cli::error::CliError;

fn request(name: &str, parent: Option<&str>) -> CreatePropertyRequest {
    CreatePropertyRequest {
        name: name.to_string(),
        group_type: Some("building".to_string()),
        re_group_id: parent.map(str::to_string),
        address_segment: "12 Ocean Drive".to_string(),
        image: None,
    }
}

fn created_id(output: &str) -> String {
    output
        .rsplit('(')
        .next()
        .and_then(|s| s.strip_suffix(')'))
        .expect("output should end with (id)")
        .to_string()
}

#[tokio::test]
async fn delete_without_force_is_refused() {
    let api_client = ApiClient::new(Some("http://127.0.0.1:9".to_string()));

    let err = delete_property(&api_client, "a1b2c3d4", false)
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::ForceRequired { .. }));
    assert!(err.to_string().contains("--force"));
}

#[tokio::test(flavor = "multi_thread")]
async fn list_is_empty_on_fresh_server() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));

    let output = list_properties(&api_client, None, None, PageParams::default(), "json")
        .await
        .unwrap();
    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 0);

    let table = list_properties(&api_client, None, None, PageParams::default(), "table")
        .await
        .unwrap();
    assert_eq!(table, "No properties found.");
}

#[tokio::test(flavor = "multi_thread")]
async fn create_get_and_list_children() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));

    let output = create_property(&api_client, request("Sunset Towers", None))
        .await
        .unwrap();
    assert!(output.contains("Created property: Sunset Towers"));
    let tower = created_id(&output);

    let mut floor = request("Floor 6", Some(&tower));
    floor.group_type = Some("floor".to_string());
    create_property(&api_client, floor).await.unwrap();

    let detail = get_property(&api_client, &tower, "table").await.unwrap();
    assert!(detail.contains("Sunset Towers"));
    assert!(detail.contains("12 Ocean Drive"));

    let children = list_properties(
        &api_client,
        Some(&tower),
        None,
        PageParams::default(),
        "json",
    )
    .await
    .unwrap();
    let parsed: Value = serde_json::from_str(&children).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Floor 6");
    assert_eq!(items[0]["group_type"], "floor");
}

#[tokio::test(flavor = "multi_thread")]
async fn list_respects_limit() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));
    for name in ["A", "B", "C"] {
        create_property(&api_client, request(name, None))
            .await
            .unwrap();
    }

    let output = list_properties(
        &api_client,
        None,
        None,
        PageParams {
            limit: Some(2),
            sort: Some("name"),
            order: Some("desc"),
            ..Default::default()
        },
        "json",
    )
    .await
    .unwrap();

    let parsed: Value = serde_json::from_str(&output).unwrap();
    let names: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["C", "B"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_parent_reports_field() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));

    let err = create_property(&api_client, request("Orphan", Some("deadbeef")))
        .await
        .unwrap_err();

    match err {
        CliError::ApiError { status, message } => {
            assert_eq!(status, 422);
            assert!(message.contains("field: re_group"), "got: {}", message);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_then_get_is_not_found() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));
    let id = created_id(
        &create_property(&api_client, request("Gone", None))
            .await
            .unwrap(),
    );

    let output = delete_property(&api_client, &id, true).await.unwrap();
    assert!(output.contains(&id));

    let err = get_property(&api_client, &id, "json").await.unwrap_err();
    assert!(matches!(err, CliError::ApiError { status: 404, .. }));
}
