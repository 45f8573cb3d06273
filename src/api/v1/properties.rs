//! Property handlers, including the grouping tree and ownership lookups.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use super::{
    ApiJson, ApiQuery, ApiResult, ErrorResponse, OwnershipResponse, db_error, page_sort,
};
use crate::api::AppState;
use crate::db::{
    Database, GroupType, OwnershipRepository, Property, PropertyQuery, PropertyRepository,
};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Serialize, ToSchema)]
pub struct PropertyResponse {
    #[schema(example = "a1b2c3d4")]
    pub id: String,
    #[schema(example = "Sunset Towers")]
    pub name: String,
    #[schema(value_type = Option<String>, example = "building")]
    pub group_type: Option<GroupType>,
    /// Parent grouping property
    pub re_group_id: Option<String>,
    #[schema(example = "12 Ocean Drive")]
    pub address_segment: String,
    #[schema(example = "property_images/sunset.png")]
    pub image: Option<String>,
}

impl From<Property> for PropertyResponse {
    fn from(p: Property) -> Self {
        Self {
            id: p.id,
            name: p.name,
            group_type: p.group_type,
            re_group_id: p.re_group_id,
            address_segment: p.address_segment,
            image: p.image,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePropertyRequest {
    #[schema(example = "Sunset Towers")]
    pub name: String,
    /// One of floor, building, multi-storey-apartment
    #[schema(value_type = Option<String>, example = "building")]
    pub group_type: Option<GroupType>,
    pub re_group_id: Option<String>,
    #[serde(default)]
    pub address_segment: String,
    /// File name, stored under property_images/
    #[schema(example = "sunset.png")]
    pub image: Option<String>,
}

/// Partial update. `null` clears an optional field, an absent key leaves it.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchPropertyRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub group_type: Option<Option<GroupType>>,
    #[serde(default, deserialize_with = "crate::serde_utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub re_group_id: Option<Option<String>>,
    pub address_segment: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
}

impl PatchPropertyRequest {
    fn merge_into(self, target: &mut Property) {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(group_type) = self.group_type {
            target.group_type = group_type;
        }
        if let Some(re_group_id) = self.re_group_id {
            target.re_group_id = re_group_id;
        }
        if let Some(address_segment) = self.address_segment {
            target.address_segment = address_segment;
        }
        if let Some(image) = self.image {
            target.image = image;
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPropertiesQuery {
    /// Only properties grouped directly under this one
    #[param(example = "a1b2c3d4")]
    pub re_group_id: Option<String>,
    /// Filter by group type (floor, building, multi-storey-apartment)
    #[param(value_type = Option<String>, example = "floor")]
    pub group_type: Option<GroupType>,
    #[param(example = 20)]
    pub limit: Option<usize>,
    #[param(example = 0)]
    pub offset: Option<usize>,
    /// Field to sort by (name, group_type, address_segment)
    #[param(example = "name")]
    pub sort: Option<String>,
    /// Sort order (asc, desc)
    pub order: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct OwnersQuery {
    /// Day to check, defaults to today (UTC)
    #[param(value_type = Option<String>, example = "2024-06-30")]
    pub date: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedProperties {
    pub items: Vec<PropertyResponse>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/v1/properties",
    tag = "properties",
    params(ListPropertiesQuery),
    responses(
        (status = 200, description = "Paginated list of properties", body = PaginatedProperties),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_properties<D: Database>(
    State(state): State<AppState<D>>,
    ApiQuery(query): ApiQuery<ListPropertiesQuery>,
) -> ApiResult<Json<PaginatedProperties>> {
    let db_query = PropertyQuery {
        page: page_sort(query.limit, query.offset, query.sort, query.order.as_deref()),
        re_group_id: query.re_group_id,
        group_type: query.group_type,
    };

    let result = state
        .db()
        .properties()
        .list(Some(&db_query))
        .await
        .map_err(db_error)?;

    Ok(Json(PaginatedProperties {
        items: result
            .items
            .into_iter()
            .map(PropertyResponse::from)
            .collect(),
        total: result.total,
        limit: result.limit.unwrap_or(result.total),
        offset: result.offset,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}",
    tag = "properties",
    params(("id" = String, Path, description = "Property ID (8-character hex)")),
    responses(
        (status = 200, description = "Property found", body = PropertyResponse),
        (status = 404, description = "Property not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_property<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<Json<PropertyResponse>> {
    let property = state.db().properties().get(&id).await.map_err(db_error)?;
    Ok(Json(PropertyResponse::from(property)))
}

#[utoipa::path(
    post,
    path = "/api/v1/properties",
    tag = "properties",
    request_body = CreatePropertyRequest,
    responses(
        (status = 201, description = "Property created", body = PropertyResponse),
        (status = 422, description = "Invalid field or unknown parent", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_property<D: Database>(
    State(state): State<AppState<D>>,
    ApiJson(req): ApiJson<CreatePropertyRequest>,
) -> ApiResult<(StatusCode, Json<PropertyResponse>)> {
    let property = Property {
        id: String::new(),
        name: req.name,
        group_type: req.group_type,
        re_group_id: req.re_group_id,
        address_segment: req.address_segment,
        image: req.image,
    };

    let created = state
        .db()
        .properties()
        .create(&property)
        .await
        .map_err(db_error)?;
    Ok((StatusCode::CREATED, Json(PropertyResponse::from(created))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/properties/{id}",
    tag = "properties",
    params(("id" = String, Path, description = "Property ID")),
    request_body = PatchPropertyRequest,
    responses(
        (status = 200, description = "Property updated", body = PropertyResponse),
        (status = 404, description = "Property not found", body = ErrorResponse),
        (status = 409, description = "Grouping would create a cycle", body = ErrorResponse),
        (status = 422, description = "Invalid field", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn patch_property<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<PatchPropertyRequest>,
) -> ApiResult<Json<PropertyResponse>> {
    let mut property = state.db().properties().get(&id).await.map_err(db_error)?;
    req.merge_into(&mut property);

    let updated = state
        .db()
        .properties()
        .update(&property)
        .await
        .map_err(db_error)?;
    Ok(Json(PropertyResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/properties/{id}",
    tag = "properties",
    params(("id" = String, Path, description = "Property ID")),
    responses(
        (status = 204, description = "Property and its dependents deleted"),
        (status = 404, description = "Property not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_property<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .db()
        .properties()
        .delete(&id)
        .await
        .map_err(db_error)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}/children",
    tag = "properties",
    params(("id" = String, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Properties grouped directly under this one", body = Vec<PropertyResponse>),
        (status = 404, description = "Property not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_property_children<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<PropertyResponse>>> {
    let children = state
        .db()
        .properties()
        .children(&id)
        .await
        .map_err(db_error)?;
    Ok(Json(
        children.into_iter().map(PropertyResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}/owners",
    tag = "properties",
    params(
        ("id" = String, Path, description = "Property ID"),
        OwnersQuery
    ),
    responses(
        (status = 200, description = "Ownerships covering the date", body = Vec<OwnershipResponse>),
        (status = 404, description = "Property not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_property_owners<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<OwnersQuery>,
) -> ApiResult<Json<Vec<OwnershipResponse>>> {
    state.db().properties().get(&id).await.map_err(db_error)?;

    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let owners = state
        .db()
        .ownerships()
        .owners_on(&id, date)
        .await
        .map_err(db_error)?;
    Ok(Json(
        owners.into_iter().map(OwnershipResponse::from).collect(),
    ))
}
