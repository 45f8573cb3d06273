use serde::{Deserialize, Serialize};
use tabled::builder::Builder;
use tabled::{Table, Tabled};

use crate::cli::api_client::ApiClient;
use crate::cli::commands::PageParams;
use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::{apply_table_style, or_dash, truncate_with_ellipsis};

#[derive(Debug, Serialize, Deserialize)]
struct ListPropertiesResponse {
    items: Vec<Property>,
    total: usize,
    limit: usize,
    offset: usize,
}

#[derive(Debug, Serialize)]
pub struct CreatePropertyRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub re_group_id: Option<String>,
    pub address_segment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Property {
    pub id: String,
    pub name: String,
    pub group_type: Option<String>,
    pub re_group_id: Option<String>,
    pub address_segment: String,
    pub image: Option<String>,
}

#[derive(Tabled)]
struct PropertyDisplay {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Group")]
    group_type: String,
    #[tabled(rename = "Parent")]
    re_group_id: String,
    #[tabled(rename = "Address")]
    address_segment: String,
}

impl From<&Property> for PropertyDisplay {
    fn from(property: &Property) -> Self {
        Self {
            id: property.id.clone(),
            name: truncate_with_ellipsis(&property.name, 40),
            group_type: or_dash(property.group_type.as_deref()),
            re_group_id: or_dash(property.re_group_id.as_deref()),
            address_segment: truncate_with_ellipsis(&property.address_segment, 40),
        }
    }
}

/// List properties, optionally only the children of `re_group_id`
pub async fn list_properties(
    api_client: &ApiClient,
    re_group_id: Option<&str>,
    group_type: Option<&str>,
    page: PageParams<'_>,
    format: &str,
) -> CliResult<String> {
    let mut request = api_client.get("/api/v1/properties");
    if let Some(parent) = re_group_id {
        request = request.query(&[("re_group_id", parent)]);
    }
    if let Some(g) = group_type {
        request = request.query(&[("group_type", g)]);
    }
    let request = page.apply(request);

    let response: ListPropertiesResponse =
        ApiClient::handle_response(request.send().await?).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&response.items)?),
        _ => Ok(format_table(&response.items)),
    }
}

fn format_table(properties: &[Property]) -> String {
    if properties.is_empty() {
        return "No properties found.".to_string();
    }

    let rows: Vec<PropertyDisplay> = properties.iter().map(|p| p.into()).collect();
    let mut table = Table::new(rows);
    apply_table_style(&mut table);
    table.to_string()
}

pub async fn get_property(api_client: &ApiClient, id: &str, format: &str) -> CliResult<String> {
    let response = api_client
        .get(&format!("/api/v1/properties/{}", id))
        .send()
        .await?;
    let property: Property = ApiClient::handle_response(response).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&property)?),
        _ => Ok(format_property_detail(&property)),
    }
}

fn format_property_detail(property: &Property) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Property ID", &property.id]);
    builder.push_record(["Name", &property.name]);
    builder.push_record(["Group", &or_dash(property.group_type.as_deref())]);
    builder.push_record(["Parent", &or_dash(property.re_group_id.as_deref())]);
    if !property.address_segment.is_empty() {
        builder.push_record(["Address", &property.address_segment]);
    }
    if let Some(image) = &property.image {
        builder.push_record(["Image", image]);
    }

    let mut table = builder.build();
    apply_table_style(&mut table);
    table.to_string()
}

pub async fn create_property(
    api_client: &ApiClient,
    request: CreatePropertyRequest,
) -> CliResult<String> {
    let response = api_client
        .post("/api/v1/properties")
        .json(&request)
        .send()
        .await?;

    let property: Property = ApiClient::handle_response(response).await?;
    Ok(format!(
        "✓ Created property: {} ({})",
        property.name, property.id
    ))
}

/// Delete a property and everything that references it. Requires `force`.
pub async fn delete_property(api_client: &ApiClient, id: &str, force: bool) -> CliResult<String> {
    if !force {
        return Err(CliError::ForceRequired {
            what: "property",
            id: id.to_string(),
        });
    }

    let response = api_client
        .delete(&format!("/api/v1/properties/{}", id))
        .send()
        .await?;
    ApiClient::check_status(response).await?;

    Ok(format!("✓ Deleted property: {}", id))
}
