//! Property unit handlers.
//!
//! Creating or patching a unit without a property provisions one named after
//! the unit; the repository does this atomically with the unit write.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use super::{ApiJson, ApiQuery, ApiResult, ErrorResponse, db_error, page_sort};
use crate::api::AppState;
use crate::db::{Database, HousingType, PropertyUnit, PropertyUnitQuery, PropertyUnitRepository};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Serialize, ToSchema)]
pub struct UnitResponse {
    #[schema(example = "a1b2c3d4")]
    pub id: String,
    #[schema(example = "G-607")]
    pub unit_name: String,
    #[schema(value_type = String, example = "apartment")]
    pub housing_type: HousingType,
    #[schema(example = 750)]
    pub area_sq_ft: i64,
    /// Always set once the unit is stored
    #[schema(example = "b2c3d4e5")]
    pub property_id: Option<String>,
    #[schema(example = "property_unit_images/g607.jpg")]
    pub image: Option<String>,
}

impl From<PropertyUnit> for UnitResponse {
    fn from(u: PropertyUnit) -> Self {
        Self {
            id: u.id,
            unit_name: u.unit_name,
            housing_type: u.housing_type,
            area_sq_ft: u.area_sq_ft,
            property_id: u.property_id,
            image: u.image,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUnitRequest {
    #[schema(example = "G-607")]
    pub unit_name: String,
    /// One of apartment, studio, flat, plot
    #[schema(value_type = String, example = "apartment")]
    pub housing_type: HousingType,
    #[schema(example = 750)]
    pub area_sq_ft: i64,
    /// Omit to have a property provisioned for the unit
    pub property_id: Option<String>,
    /// File name, stored under property_unit_images/
    #[schema(example = "g607.jpg")]
    pub image: Option<String>,
}

/// Partial update. `"property_id": null` provisions a new property.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchUnitRequest {
    pub unit_name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub housing_type: Option<HousingType>,
    pub area_sq_ft: Option<i64>,
    #[serde(default, deserialize_with = "crate::serde_utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub property_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::serde_utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
}

impl PatchUnitRequest {
    fn merge_into(self, target: &mut PropertyUnit) {
        if let Some(unit_name) = self.unit_name {
            target.unit_name = unit_name;
        }
        if let Some(housing_type) = self.housing_type {
            target.housing_type = housing_type;
        }
        if let Some(area_sq_ft) = self.area_sq_ft {
            target.area_sq_ft = area_sq_ft;
        }
        if let Some(property_id) = self.property_id {
            target.property_id = property_id;
        }
        if let Some(image) = self.image {
            target.image = image;
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUnitsQuery {
    /// Filter by owning property
    #[param(example = "b2c3d4e5")]
    pub property_id: Option<String>,
    /// Filter by housing type (apartment, studio, flat, plot)
    #[param(value_type = Option<String>, example = "studio")]
    pub housing_type: Option<HousingType>,
    #[param(example = 20)]
    pub limit: Option<usize>,
    #[param(example = 0)]
    pub offset: Option<usize>,
    /// Field to sort by (unit_name, housing_type, area_sq_ft)
    #[param(example = "unit_name")]
    pub sort: Option<String>,
    /// Sort order (asc, desc)
    pub order: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedUnits {
    pub items: Vec<UnitResponse>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/v1/units",
    tag = "units",
    params(ListUnitsQuery),
    responses(
        (status = 200, description = "Paginated list of units", body = PaginatedUnits),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_units<D: Database>(
    State(state): State<AppState<D>>,
    ApiQuery(query): ApiQuery<ListUnitsQuery>,
) -> ApiResult<Json<PaginatedUnits>> {
    let db_query = PropertyUnitQuery {
        page: page_sort(query.limit, query.offset, query.sort, query.order.as_deref()),
        property_id: query.property_id,
        housing_type: query.housing_type,
    };

    let result = state
        .db()
        .units()
        .list(Some(&db_query))
        .await
        .map_err(db_error)?;

    Ok(Json(PaginatedUnits {
        items: result.items.into_iter().map(UnitResponse::from).collect(),
        total: result.total,
        limit: result.limit.unwrap_or(result.total),
        offset: result.offset,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/units/{id}",
    tag = "units",
    params(("id" = String, Path, description = "Unit ID (8-character hex)")),
    responses(
        (status = 200, description = "Unit found", body = UnitResponse),
        (status = 404, description = "Unit not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_unit<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<Json<UnitResponse>> {
    let unit = state.db().units().get(&id).await.map_err(db_error)?;
    Ok(Json(UnitResponse::from(unit)))
}

#[utoipa::path(
    post,
    path = "/api/v1/units",
    tag = "units",
    request_body = CreateUnitRequest,
    responses(
        (status = 201, description = "Unit created, with a provisioned property if none was given", body = UnitResponse),
        (status = 409, description = "Unit name already taken", body = ErrorResponse),
        (status = 422, description = "Invalid field or unknown property", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_unit<D: Database>(
    State(state): State<AppState<D>>,
    ApiJson(req): ApiJson<CreateUnitRequest>,
) -> ApiResult<(StatusCode, Json<UnitResponse>)> {
    let unit = PropertyUnit {
        id: String::new(),
        unit_name: req.unit_name,
        housing_type: req.housing_type,
        area_sq_ft: req.area_sq_ft,
        property_id: req.property_id,
        image: req.image,
    };

    let created = state.db().units().create(&unit).await.map_err(db_error)?;
    Ok((StatusCode::CREATED, Json(UnitResponse::from(created))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/units/{id}",
    tag = "units",
    params(("id" = String, Path, description = "Unit ID")),
    request_body = PatchUnitRequest,
    responses(
        (status = 200, description = "Unit updated", body = UnitResponse),
        (status = 404, description = "Unit not found", body = ErrorResponse),
        (status = 409, description = "Unit name already taken", body = ErrorResponse),
        (status = 422, description = "Invalid field", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn patch_unit<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<PatchUnitRequest>,
) -> ApiResult<Json<UnitResponse>> {
    let mut unit = state.db().units().get(&id).await.map_err(db_error)?;
    req.merge_into(&mut unit);

    let updated = state.db().units().update(&unit).await.map_err(db_error)?;
    Ok(Json(UnitResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/units/{id}",
    tag = "units",
    params(("id" = String, Path, description = "Unit ID")),
    responses(
        (status = 204, description = "Unit deleted"),
        (status = 404, description = "Unit not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_unit<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db().units().delete(&id).await.map_err(db_error)?;
    Ok(StatusCode::NO_CONTENT)
}
