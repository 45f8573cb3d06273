use super::test_support::spawn_test_server;
use crate::cli::api_client::ApiClient;
use crate::cli::commands::PageParams;
use crate::cli::commands::property::{Property, get_property};
use crate::cli::commands::unit::*;
use crate::cli::error::CliError;

fn request(name: &str) -> CreateUnitRequest {
    CreateUnitRequest {
        unit_name: name.to_string(),
        housing_type: "apartment".to_string(),
        area_sq_ft: 750,
        property_id: None,
        image: None,
    }
}

async fn only_unit(api_client: &ApiClient) -> Unit {
    let output = list_units(api_client, None, None, PageParams::default(), "json")
        .await
        .unwrap();
    let mut units: Vec<Unit> = serde_json::from_str(&output).unwrap();
    assert_eq!(units.len(), 1);
    units.remove(0)
}

#[tokio::test(flavor = "multi_thread")]
async fn create_without_property_provisions_one() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));

    let output = create_unit(&api_client, request("G-607")).await.unwrap();
    assert!(output.contains("Created unit: G-607"));

    let unit = only_unit(&api_client).await;
    let property_id = unit.property_id.expect("unit should have a property");
    assert!(output.ends_with(&property_id));

    let property: Property =
        serde_json::from_str(&get_property(&api_client, &property_id, "json").await.unwrap())
            .unwrap();
    assert_eq!(property.name, "G-607");
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_name_is_a_conflict() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));
    create_unit(&api_client, request("G-607")).await.unwrap();

    let err = create_unit(&api_client, request("G-607"))
        .await
        .unwrap_err();

    match err {
        CliError::ApiError { status, message } => {
            assert_eq!(status, 409);
            assert!(message.contains("field: unit_name"), "got: {}", message);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn get_shows_table_detail() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));
    let mut studio = request("S-1");
    studio.housing_type = "studio".to_string();
    studio.image = Some("s1.jpg".to_string());
    create_unit(&api_client, studio).await.unwrap();
    let unit = only_unit(&api_client).await;

    let detail = get_unit(&api_client, &unit.id, "table").await.unwrap();

    assert!(detail.contains("S-1"));
    assert!(detail.contains("studio"));
    assert!(detail.contains("property_unit_images/s1.jpg"));
}

#[tokio::test(flavor = "multi_thread")]
async fn list_filters_by_housing_type() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));
    create_unit(&api_client, request("A-1")).await.unwrap();
    let mut plot = request("P-1");
    plot.housing_type = "plot".to_string();
    create_unit(&api_client, plot).await.unwrap();

    let output = list_units(
        &api_client,
        None,
        Some("plot"),
        PageParams::default(),
        "json",
    )
    .await
    .unwrap();

    let units: Vec<Unit> = serde_json::from_str(&output).unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].unit_name, "P-1");
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_requires_force_then_removes() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));
    create_unit(&api_client, request("D-4")).await.unwrap();
    let unit = only_unit(&api_client).await;

    let err = delete_unit(&api_client, &unit.id, false).await.unwrap_err();
    assert!(matches!(err, CliError::ForceRequired { what: "unit", .. }));

    delete_unit(&api_client, &unit.id, true).await.unwrap();
    let table = list_units(&api_client, None, None, PageParams::default(), "table")
        .await
        .unwrap();
    assert_eq!(table, "No units found.");
}

#[tokio::test]
async fn unreachable_server_is_a_connection_failure() {
    let api_client = ApiClient::new(Some("http://127.0.0.1:9".to_string()));

    let err = get_unit(&api_client, "a1b2c3d4", "json").await.unwrap_err();

    assert!(matches!(err, CliError::ConnectionFailed { .. }));
}
