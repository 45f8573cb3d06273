use serde::{Deserialize, Serialize};
use tabled::builder::Builder;
use tabled::{Table, Tabled};

use crate::cli::api_client::ApiClient;
use crate::cli::commands::PageParams;
use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::{apply_table_style, or_dash, truncate_with_ellipsis};

#[derive(Debug, Serialize, Deserialize)]
struct ListUnitsResponse {
    items: Vec<Unit>,
    total: usize,
    limit: usize,
    offset: usize,
}

#[derive(Debug, Serialize)]
pub struct CreateUnitRequest {
    pub unit_name: String,
    pub housing_type: String,
    pub area_sq_ft: i64,
    /// Left out so the server provisions a property named after the unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Unit {
    pub id: String,
    pub unit_name: String,
    pub housing_type: String,
    pub area_sq_ft: i64,
    pub property_id: Option<String>,
    pub image: Option<String>,
}

#[derive(Tabled)]
struct UnitDisplay {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    unit_name: String,
    #[tabled(rename = "Type")]
    housing_type: String,
    #[tabled(rename = "Sq ft")]
    area_sq_ft: i64,
    #[tabled(rename = "Property")]
    property_id: String,
}

impl From<&Unit> for UnitDisplay {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id.clone(),
            unit_name: truncate_with_ellipsis(&unit.unit_name, 40),
            housing_type: unit.housing_type.clone(),
            area_sq_ft: unit.area_sq_ft,
            property_id: or_dash(unit.property_id.as_deref()),
        }
    }
}

pub async fn list_units(
    api_client: &ApiClient,
    property_id: Option<&str>,
    housing_type: Option<&str>,
    page: PageParams<'_>,
    format: &str,
) -> CliResult<String> {
    let mut request = api_client.get("/api/v1/units");
    if let Some(p) = property_id {
        request = request.query(&[("property_id", p)]);
    }
    if let Some(h) = housing_type {
        request = request.query(&[("housing_type", h)]);
    }
    let request = page.apply(request);

    let response: ListUnitsResponse = ApiClient::handle_response(request.send().await?).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&response.items)?),
        _ => Ok(format_table(&response.items)),
    }
}

fn format_table(units: &[Unit]) -> String {
    if units.is_empty() {
        return "No units found.".to_string();
    }

    let rows: Vec<UnitDisplay> = units.iter().map(|u| u.into()).collect();
    let mut table = Table::new(rows);
    apply_table_style(&mut table);
    table.to_string()
}

pub async fn get_unit(api_client: &ApiClient, id: &str, format: &str) -> CliResult<String> {
    let response = api_client
        .get(&format!("/api/v1/units/{}", id))
        .send()
        .await?;
    let unit: Unit = ApiClient::handle_response(response).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&unit)?),
        _ => {
            let area = unit.area_sq_ft.to_string();
            let mut builder = Builder::default();
            builder.push_record(["Unit ID", &unit.id]);
            builder.push_record(["Name", &unit.unit_name]);
            builder.push_record(["Type", &unit.housing_type]);
            builder.push_record(["Area (sq ft)", &area]);
            builder.push_record(["Property", &or_dash(unit.property_id.as_deref())]);
            if let Some(image) = &unit.image {
                builder.push_record(["Image", image]);
            }
            let mut table = builder.build();
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}

/// Create a unit. The output names the property it ended up attached to.
pub async fn create_unit(api_client: &ApiClient, request: CreateUnitRequest) -> CliResult<String> {
    let response = api_client
        .post("/api/v1/units")
        .json(&request)
        .send()
        .await?;

    let unit: Unit = ApiClient::handle_response(response).await?;
    Ok(format!(
        "✓ Created unit: {} ({}) in property {}",
        unit.unit_name,
        unit.id,
        or_dash(unit.property_id.as_deref())
    ))
}

pub async fn delete_unit(api_client: &ApiClient, id: &str, force: bool) -> CliResult<String> {
    if !force {
        return Err(CliError::ForceRequired {
            what: "unit",
            id: id.to_string(),
        });
    }

    let response = api_client
        .delete(&format!("/api/v1/units/{}", id))
        .send()
        .await?;
    ApiClient::check_status(response).await?;

    Ok(format!("✓ Deleted unit: {}", id))
}
