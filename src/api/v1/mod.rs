//! V1 API handlers.
//!
//! Every collection follows the same shape: list, get, create, patch and
//! delete, with [`DbError`] mapped onto HTTP statuses by [`db_error`].

mod extract;
mod leases;
mod ownerships;
mod posts;
mod properties;
mod transactions;
mod units;
mod users;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod extract_test;
#[cfg(test)]
mod posts_test;
#[cfg(test)]
mod units_test;
#[cfg(test)]
mod users_test;

pub use extract::{ApiJson, ApiQuery};
pub use leases::*;
pub use ownerships::*;
pub use posts::*;
pub use properties::*;
pub use transactions::*;
pub use units::*;
pub use users::*;

use axum::{Json, http::StatusCode};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::db::{DbError, Money, PageSort, SortOrder};

/// Error response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    #[schema(example = "a record with this value already exists")]
    pub error: String,
    /// Field the error refers to, when there is one
    #[schema(example = "unit_name")]
    pub field: Option<String>,
}

pub type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

/// Map a database error onto a status code and JSON body.
pub fn db_error(e: DbError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        DbError::NotFound { .. } => StatusCode::NOT_FOUND,
        DbError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DbError::Constraint { .. } => StatusCode::CONFLICT,
        DbError::Database { .. } | DbError::Migration { .. } | DbError::Connection { .. } => {
            error!(error = %e, "Database failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
            field: e.field().map(str::to_string),
        }),
    )
}

/// Build pagination from the common `limit`/`offset`/`sort`/`order` params.
pub(crate) fn page_sort(
    limit: Option<usize>,
    offset: Option<usize>,
    sort: Option<String>,
    order: Option<&str>,
) -> PageSort {
    PageSort {
        limit,
        offset,
        sort_by: sort,
        sort_order: match order {
            Some("desc") => Some(SortOrder::Desc),
            Some("asc") => Some(SortOrder::Asc),
            _ => None,
        },
    }
}

/// Parse a decimal amount, reporting failures against `field`.
pub(crate) fn parse_money(field: &str, raw: &str) -> ApiResult<Money> {
    raw.parse()
        .map_err(|e: crate::db::MoneyError| db_error(DbError::validation(field, e.to_string())))
}
