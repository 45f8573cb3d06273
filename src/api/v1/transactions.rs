//! Transaction handlers.
//!
//! `datetime` is assigned on create and is not part of any request body.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use super::{ApiJson, ApiQuery, ApiResult, ErrorResponse, db_error, page_sort, parse_money};
use crate::api::AppState;
use crate::db::{Database, Money, Transaction, TransactionQuery, TransactionRepository};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Serialize, ToSchema)]
pub struct TransactionResponse {
    #[schema(example = "a1b2c3d4")]
    pub id: String,
    #[schema(example = "2025-01-01 09:30:00")]
    pub datetime: String,
    /// Signed decimal amount with two fraction digits
    #[schema(value_type = String, example = "-45.10")]
    pub amount: Money,
    pub property_id: String,
    pub to_user_id: String,
    pub from_user_id: String,
    #[schema(example = "transaction_documents/receipt.pdf")]
    pub transaction_details: Option<String>,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            datetime: t.datetime,
            amount: t.amount,
            property_id: t.property_id,
            to_user_id: t.to_user_id,
            from_user_id: t.from_user_id,
            transaction_details: t.transaction_details,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTransactionRequest {
    /// Decimal string, at most 10 digits with 2 after the point
    #[schema(example = "800.00")]
    pub amount: String,
    pub property_id: String,
    pub to_user_id: String,
    pub from_user_id: String,
    /// File name, stored under transaction_documents/
    pub transaction_details: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchTransactionRequest {
    pub amount: Option<String>,
    pub property_id: Option<String>,
    pub to_user_id: Option<String>,
    pub from_user_id: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_utils::double_option")]
    #[schema(value_type = Option<String>)]
    pub transaction_details: Option<Option<String>>,
}

impl PatchTransactionRequest {
    fn merge_into(self, target: &mut Transaction) -> ApiResult<()> {
        if let Some(amount) = self.amount {
            target.amount = parse_money("amount", &amount)?;
        }
        if let Some(property_id) = self.property_id {
            target.property_id = property_id;
        }
        if let Some(to_user_id) = self.to_user_id {
            target.to_user_id = to_user_id;
        }
        if let Some(from_user_id) = self.from_user_id {
            target.from_user_id = from_user_id;
        }
        if let Some(details) = self.transaction_details {
            target.transaction_details = details;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListTransactionsQuery {
    pub property_id: Option<String>,
    /// Matches either the sender or the receiver
    pub user_id: Option<String>,
    #[param(example = 20)]
    pub limit: Option<usize>,
    #[param(example = 0)]
    pub offset: Option<usize>,
    /// Field to sort by (datetime, amount)
    #[param(example = "datetime")]
    pub sort: Option<String>,
    /// Sort order (asc, desc)
    pub order: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedTransactions {
    pub items: Vec<TransactionResponse>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    tag = "transactions",
    params(ListTransactionsQuery),
    responses(
        (status = 200, description = "Paginated list of transactions", body = PaginatedTransactions),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_transactions<D: Database>(
    State(state): State<AppState<D>>,
    ApiQuery(query): ApiQuery<ListTransactionsQuery>,
) -> ApiResult<Json<PaginatedTransactions>> {
    let db_query = TransactionQuery {
        page: page_sort(query.limit, query.offset, query.sort, query.order.as_deref()),
        property_id: query.property_id,
        user_id: query.user_id,
    };

    let result = state
        .db()
        .transactions()
        .list(Some(&db_query))
        .await
        .map_err(db_error)?;

    Ok(Json(PaginatedTransactions {
        items: result
            .items
            .into_iter()
            .map(TransactionResponse::from)
            .collect(),
        total: result.total,
        limit: result.limit.unwrap_or(result.total),
        offset: result.offset,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/transactions/{id}",
    tag = "transactions",
    params(("id" = String, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Transaction found", body = TransactionResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_transaction<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<Json<TransactionResponse>> {
    let transaction = state.db().transactions().get(&id).await.map_err(db_error)?;
    Ok(Json(TransactionResponse::from(transaction)))
}

#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    tag = "transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction recorded", body = TransactionResponse),
        (status = 422, description = "Invalid amount or unknown reference", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_transaction<D: Database>(
    State(state): State<AppState<D>>,
    ApiJson(req): ApiJson<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<TransactionResponse>)> {
    let transaction = Transaction {
        id: String::new(),
        datetime: String::new(),
        amount: parse_money("amount", &req.amount)?,
        property_id: req.property_id,
        to_user_id: req.to_user_id,
        from_user_id: req.from_user_id,
        transaction_details: req.transaction_details,
    };

    let created = state
        .db()
        .transactions()
        .create(&transaction)
        .await
        .map_err(db_error)?;
    Ok((StatusCode::CREATED, Json(TransactionResponse::from(created))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/transactions/{id}",
    tag = "transactions",
    params(("id" = String, Path, description = "Transaction ID")),
    request_body = PatchTransactionRequest,
    responses(
        (status = 200, description = "Transaction updated; datetime is unchanged", body = TransactionResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 422, description = "Invalid field", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn patch_transaction<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<PatchTransactionRequest>,
) -> ApiResult<Json<TransactionResponse>> {
    let mut transaction = state.db().transactions().get(&id).await.map_err(db_error)?;
    req.merge_into(&mut transaction)?;

    let updated = state
        .db()
        .transactions()
        .update(&transaction)
        .await
        .map_err(db_error)?;
    Ok(Json(TransactionResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/transactions/{id}",
    tag = "transactions",
    params(("id" = String, Path, description = "Transaction ID")),
    responses(
        (status = 204, description = "Transaction deleted"),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_transaction<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .db()
        .transactions()
        .delete(&id)
        .await
        .map_err(db_error)?;
    Ok(StatusCode::NO_CONTENT)
}
