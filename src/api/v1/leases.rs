//! Rental lease handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use super::{ApiJson, ApiQuery, ApiResult, ErrorResponse, db_error, page_sort, parse_money};
use crate::api::AppState;
use crate::db::{Database, LeaseQuery, LeaseRepository, Money, RentalLease};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Serialize, ToSchema)]
pub struct LeaseResponse {
    #[schema(example = "a1b2c3d4")]
    pub id: String,
    #[schema(example = "2024-01-01")]
    pub start_date: NaiveDate,
    #[schema(example = "2024-12-31")]
    pub stop_date: NaiveDate,
    pub property_id: String,
    /// Decimal amount with two fraction digits
    #[schema(value_type = String, example = "1250.50")]
    pub rent_amount: Money,
    #[schema(example = "monthly")]
    pub payment_frequency: String,
    pub tenant_user_id: String,
    pub owner_user_id: String,
    #[schema(example = "rental_agreements/flat3-2024.pdf")]
    pub rent_agreement_document: Option<String>,
}

impl From<RentalLease> for LeaseResponse {
    fn from(l: RentalLease) -> Self {
        Self {
            id: l.id,
            start_date: l.start_date,
            stop_date: l.stop_date,
            property_id: l.property_id,
            rent_amount: l.rent_amount,
            payment_frequency: l.payment_frequency,
            tenant_user_id: l.tenant_user_id,
            owner_user_id: l.owner_user_id,
            rent_agreement_document: l.rent_agreement_document,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLeaseRequest {
    #[schema(example = "2024-01-01")]
    pub start_date: NaiveDate,
    #[schema(example = "2024-12-31")]
    pub stop_date: NaiveDate,
    pub property_id: String,
    /// Decimal string, at most 10 digits with 2 after the point
    #[schema(example = "1250.50")]
    pub rent_amount: String,
    #[schema(example = "monthly")]
    pub payment_frequency: String,
    pub tenant_user_id: String,
    pub owner_user_id: String,
    /// File name, stored under rental_agreements/
    pub rent_agreement_document: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchLeaseRequest {
    pub start_date: Option<NaiveDate>,
    pub stop_date: Option<NaiveDate>,
    pub property_id: Option<String>,
    #[schema(example = "1300.00")]
    pub rent_amount: Option<String>,
    pub payment_frequency: Option<String>,
    pub tenant_user_id: Option<String>,
    pub owner_user_id: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub rent_agreement_document: Option<Option<String>>,
}

impl PatchLeaseRequest {
    fn merge_into(self, target: &mut RentalLease) -> ApiResult<()> {
        if let Some(start_date) = self.start_date {
            target.start_date = start_date;
        }
        if let Some(stop_date) = self.stop_date {
            target.stop_date = stop_date;
        }
        if let Some(property_id) = self.property_id {
            target.property_id = property_id;
        }
        if let Some(rent_amount) = self.rent_amount {
            target.rent_amount = parse_money("rent_amount", &rent_amount)?;
        }
        if let Some(payment_frequency) = self.payment_frequency {
            target.payment_frequency = payment_frequency;
        }
        if let Some(tenant_user_id) = self.tenant_user_id {
            target.tenant_user_id = tenant_user_id;
        }
        if let Some(owner_user_id) = self.owner_user_id {
            target.owner_user_id = owner_user_id;
        }
        if let Some(document) = self.rent_agreement_document {
            target.rent_agreement_document = document;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListLeasesQuery {
    pub property_id: Option<String>,
    pub tenant_user_id: Option<String>,
    pub owner_user_id: Option<String>,
    #[param(example = 20)]
    pub limit: Option<usize>,
    #[param(example = 0)]
    pub offset: Option<usize>,
    /// Field to sort by (start_date, stop_date, rent_amount)
    #[param(example = "start_date")]
    pub sort: Option<String>,
    /// Sort order (asc, desc)
    pub order: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedLeases {
    pub items: Vec<LeaseResponse>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/v1/leases",
    tag = "leases",
    params(ListLeasesQuery),
    responses(
        (status = 200, description = "Paginated list of leases", body = PaginatedLeases),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_leases<D: Database>(
    State(state): State<AppState<D>>,
    ApiQuery(query): ApiQuery<ListLeasesQuery>,
) -> ApiResult<Json<PaginatedLeases>> {
    let db_query = LeaseQuery {
        page: page_sort(query.limit, query.offset, query.sort, query.order.as_deref()),
        property_id: query.property_id,
        tenant_user_id: query.tenant_user_id,
        owner_user_id: query.owner_user_id,
    };

    let result = state
        .db()
        .leases()
        .list(Some(&db_query))
        .await
        .map_err(db_error)?;

    Ok(Json(PaginatedLeases {
        items: result.items.into_iter().map(LeaseResponse::from).collect(),
        total: result.total,
        limit: result.limit.unwrap_or(result.total),
        offset: result.offset,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/leases/{id}",
    tag = "leases",
    params(("id" = String, Path, description = "Lease ID")),
    responses(
        (status = 200, description = "Lease found", body = LeaseResponse),
        (status = 404, description = "Lease not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_lease<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<Json<LeaseResponse>> {
    let lease = state.db().leases().get(&id).await.map_err(db_error)?;
    Ok(Json(LeaseResponse::from(lease)))
}

#[utoipa::path(
    post,
    path = "/api/v1/leases",
    tag = "leases",
    request_body = CreateLeaseRequest,
    responses(
        (status = 201, description = "Lease created", body = LeaseResponse),
        (status = 422, description = "Invalid field or unknown reference", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_lease<D: Database>(
    State(state): State<AppState<D>>,
    ApiJson(req): ApiJson<CreateLeaseRequest>,
) -> ApiResult<(StatusCode, Json<LeaseResponse>)> {
    let lease = RentalLease {
        id: String::new(),
        start_date: req.start_date,
        stop_date: req.stop_date,
        property_id: req.property_id,
        rent_amount: parse_money("rent_amount", &req.rent_amount)?,
        payment_frequency: req.payment_frequency,
        tenant_user_id: req.tenant_user_id,
        owner_user_id: req.owner_user_id,
        rent_agreement_document: req.rent_agreement_document,
    };

    let created = state.db().leases().create(&lease).await.map_err(db_error)?;
    Ok((StatusCode::CREATED, Json(LeaseResponse::from(created))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/leases/{id}",
    tag = "leases",
    params(("id" = String, Path, description = "Lease ID")),
    request_body = PatchLeaseRequest,
    responses(
        (status = 200, description = "Lease updated", body = LeaseResponse),
        (status = 404, description = "Lease not found", body = ErrorResponse),
        (status = 422, description = "Invalid field", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn patch_lease<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<PatchLeaseRequest>,
) -> ApiResult<Json<LeaseResponse>> {
    let mut lease = state.db().leases().get(&id).await.map_err(db_error)?;
    req.merge_into(&mut lease)?;

    let updated = state.db().leases().update(&lease).await.map_err(db_error)?;
    Ok(Json(LeaseResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/leases/{id}",
    tag = "leases",
    params(("id" = String, Path, description = "Lease ID")),
    responses(
        (status = 204, description = "Lease deleted"),
        (status = 404, description = "Lease not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_lease<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db().leases().delete(&id).await.map_err(db_error)?;
    Ok(StatusCode::NO_CONTENT)
}
