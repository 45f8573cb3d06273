//! Property ownership handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use super::{ApiJson, ApiQuery, ApiResult, ErrorResponse, db_error, page_sort};
use crate::api::AppState;
use crate::db::{Database, OwnershipQuery, OwnershipRepository, PropertyOwnership};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Serialize, ToSchema)]
pub struct OwnershipResponse {
    #[schema(example = "a1b2c3d4")]
    pub id: String,
    pub property_id: String,
    pub user_id: String,
    #[schema(example = "2020-01-01")]
    pub start_date: NaiveDate,
    /// `null` while the ownership is ongoing
    #[schema(example = "2024-12-31")]
    pub end_date: Option<NaiveDate>,
}

impl From<PropertyOwnership> for OwnershipResponse {
    fn from(o: PropertyOwnership) -> Self {
        Self {
            id: o.id,
            property_id: o.property_id,
            user_id: o.user_id,
            start_date: o.start_date,
            end_date: o.end_date,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOwnershipRequest {
    pub property_id: String,
    pub user_id: String,
    #[schema(example = "2020-01-01")]
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchOwnershipRequest {
    pub property_id: Option<String>,
    pub user_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// `null` reopens the ownership
    #[serde(default, deserialize_with = "crate::serde_utils::double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub end_date: Option<Option<NaiveDate>>,
}

impl PatchOwnershipRequest {
    fn merge_into(self, target: &mut PropertyOwnership) {
        if let Some(property_id) = self.property_id {
            target.property_id = property_id;
        }
        if let Some(user_id) = self.user_id {
            target.user_id = user_id;
        }
        if let Some(start_date) = self.start_date {
            target.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            target.end_date = end_date;
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListOwnershipsQuery {
    pub property_id: Option<String>,
    pub user_id: Option<String>,
    #[param(example = 20)]
    pub limit: Option<usize>,
    #[param(example = 0)]
    pub offset: Option<usize>,
    /// Field to sort by (start_date, end_date)
    #[param(example = "start_date")]
    pub sort: Option<String>,
    /// Sort order (asc, desc)
    pub order: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedOwnerships {
    pub items: Vec<OwnershipResponse>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/v1/ownerships",
    tag = "ownerships",
    params(ListOwnershipsQuery),
    responses(
        (status = 200, description = "Paginated list of ownerships", body = PaginatedOwnerships),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_ownerships<D: Database>(
    State(state): State<AppState<D>>,
    ApiQuery(query): ApiQuery<ListOwnershipsQuery>,
) -> ApiResult<Json<PaginatedOwnerships>> {
    let db_query = OwnershipQuery {
        page: page_sort(query.limit, query.offset, query.sort, query.order.as_deref()),
        property_id: query.property_id,
        user_id: query.user_id,
    };

    let result = state
        .db()
        .ownerships()
        .list(Some(&db_query))
        .await
        .map_err(db_error)?;

    Ok(Json(PaginatedOwnerships {
        items: result
            .items
            .into_iter()
            .map(OwnershipResponse::from)
            .collect(),
        total: result.total,
        limit: result.limit.unwrap_or(result.total),
        offset: result.offset,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/ownerships/{id}",
    tag = "ownerships",
    params(("id" = String, Path, description = "Ownership ID")),
    responses(
        (status = 200, description = "Ownership found", body = OwnershipResponse),
        (status = 404, description = "Ownership not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_ownership<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<Json<OwnershipResponse>> {
    let ownership = state.db().ownerships().get(&id).await.map_err(db_error)?;
    Ok(Json(OwnershipResponse::from(ownership)))
}

#[utoipa::path(
    post,
    path = "/api/v1/ownerships",
    tag = "ownerships",
    request_body = CreateOwnershipRequest,
    responses(
        (status = 201, description = "Ownership created", body = OwnershipResponse),
        (status = 409, description = "Property already has an ownership starting that day", body = ErrorResponse),
        (status = 422, description = "Invalid dates or unknown reference", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_ownership<D: Database>(
    State(state): State<AppState<D>>,
    ApiJson(req): ApiJson<CreateOwnershipRequest>,
) -> ApiResult<(StatusCode, Json<OwnershipResponse>)> {
    let ownership = PropertyOwnership {
        id: String::new(),
        property_id: req.property_id,
        user_id: req.user_id,
        start_date: req.start_date,
        end_date: req.end_date,
    };

    let created = state
        .db()
        .ownerships()
        .create(&ownership)
        .await
        .map_err(db_error)?;
    Ok((StatusCode::CREATED, Json(OwnershipResponse::from(created))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/ownerships/{id}",
    tag = "ownerships",
    params(("id" = String, Path, description = "Ownership ID")),
    request_body = PatchOwnershipRequest,
    responses(
        (status = 200, description = "Ownership updated", body = OwnershipResponse),
        (status = 404, description = "Ownership not found", body = ErrorResponse),
        (status = 409, description = "Start date already taken", body = ErrorResponse),
        (status = 422, description = "Invalid field", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn patch_ownership<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<PatchOwnershipRequest>,
) -> ApiResult<Json<OwnershipResponse>> {
    let mut ownership = state.db().ownerships().get(&id).await.map_err(db_error)?;
    req.merge_into(&mut ownership);

    let updated = state
        .db()
        .ownerships()
        .update(&ownership)
        .await
        .map_err(db_error)?;
    Ok(Json(OwnershipResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/ownerships/{id}",
    tag = "ownerships",
    params(("id" = String, Path, description = "Ownership ID")),
    responses(
        (status = 204, description = "Ownership deleted"),
        (status = 404, description = "Ownership not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_ownership<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .db()
        .ownerships()
        .delete(&id)
        .await
        .map_err(db_error)?;
    Ok(StatusCode::NO_CONTENT)
}
