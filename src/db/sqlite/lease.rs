//! SQLite LeaseRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use super::helpers::{
    Filters, build_limit_offset_clause, build_order_clause, check_text, ensure_exists,
    map_sqlx_error,
};
use crate::db::upload::{UploadNamespace, normalize_file_ref};
use crate::db::utils::id_or_generate;
use crate::db::{
    DbError, DbResult, LeaseQuery, LeaseRepository, ListResult, Money, RentalLease,
};

const PAYMENT_FREQUENCY_MAX_LEN: usize = 255;

const COLUMNS: &str = "id, start_date, stop_date, property_id, rent_amount, payment_frequency, \
                       tenant_user_id, owner_user_id, rent_agreement_document";

/// SQLx-backed rental lease repository.
pub struct SqliteLeaseRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn lease_from_row(row: &SqliteRow) -> DbResult<RentalLease> {
    let cents: i64 = row.get("rent_amount");
    Ok(RentalLease {
        id: row.get("id"),
        start_date: row.get("start_date"),
        stop_date: row.get("stop_date"),
        property_id: row.get("property_id"),
        rent_amount: Money::from_cents(cents).map_err(|e| DbError::Database {
            message: format!("stored rent_amount is invalid: {}", e),
        })?,
        payment_frequency: row.get("payment_frequency"),
        tenant_user_id: row.get("tenant_user_id"),
        owner_user_id: row.get("owner_user_id"),
        rent_agreement_document: row.get("rent_agreement_document"),
    })
}

/// Validate and normalize a lease inside a transaction.
async fn prepare(conn: &mut SqliteConnection, lease: &RentalLease) -> DbResult<RentalLease> {
    if lease.stop_date < lease.start_date {
        return Err(DbError::validation(
            "stop_date",
            "must not be before start_date",
        ));
    }
    check_text(
        "payment_frequency",
        &lease.payment_frequency,
        PAYMENT_FREQUENCY_MAX_LEN,
    )?;
    ensure_exists(&mut *conn, "property", "property", &lease.property_id).await?;
    ensure_exists(&mut *conn, "app_user", "tenant_user", &lease.tenant_user_id).await?;
    ensure_exists(&mut *conn, "app_user", "owner_user", &lease.owner_user_id).await?;

    Ok(RentalLease {
        rent_agreement_document: normalize_file_ref(
            "rent_agreement_document",
            UploadNamespace::RentalAgreements,
            lease.rent_agreement_document.as_deref(),
        )?,
        ..lease.clone()
    })
}

impl<'a> LeaseRepository for SqliteLeaseRepository<'a> {
    async fn create(&self, lease: &RentalLease) -> DbResult<RentalLease> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let lease = prepare(&mut tx, lease).await?;

        let id = id_or_generate(&lease.id);
        sqlx::query(&format!(
            "INSERT INTO rental_lease ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            COLUMNS
        ))
        .bind(&id)
        .bind(lease.start_date)
        .bind(lease.stop_date)
        .bind(&lease.property_id)
        .bind(lease.rent_amount.cents())
        .bind(&lease.payment_frequency)
        .bind(&lease.tenant_user_id)
        .bind(&lease.owner_user_id)
        .bind(&lease.rent_agreement_document)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(RentalLease { id, ..lease })
    }

    async fn get(&self, id: &str) -> DbResult<RentalLease> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM rental_lease WHERE id = ?",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => lease_from_row(&row),
            None => Err(DbError::not_found("RentalLease", id)),
        }
    }

    async fn list(&self, query: Option<&LeaseQuery>) -> DbResult<ListResult<RentalLease>> {
        let default_query = LeaseQuery::default();
        let query = query.unwrap_or(&default_query);

        let filters = Filters::new()
            .eq("property_id", query.property_id.as_deref())
            .eq("tenant_user_id", query.tenant_user_id.as_deref())
            .eq("owner_user_id", query.owner_user_id.as_deref());
        let where_clause = filters.where_clause();
        let order_clause = build_order_clause(
            &query.page,
            &["start_date", "stop_date", "rent_amount"],
            "start_date",
        );
        let limit_clause = build_limit_offset_clause(&query.page);

        let sql = format!(
            "SELECT {} FROM rental_lease {} {} {}",
            COLUMNS, where_clause, order_clause, limit_clause
        );
        let mut sql_query = sqlx::query(&sql);
        for value in filters.values() {
            sql_query = sql_query.bind(value);
        }
        let rows = sql_query
            .fetch_all(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let count_sql = format!("SELECT COUNT(*) FROM rental_lease {}", where_clause);
        let mut count_query = sqlx::query_scalar(&count_sql);
        for value in filters.values() {
            count_query = count_query.bind(value);
        }
        let total: i64 = count_query
            .fetch_one(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(ListResult {
            items: rows
                .iter()
                .map(lease_from_row)
                .collect::<DbResult<Vec<_>>>()?,
            total: total as usize,
            limit: query.page.limit,
            offset: query.page.offset.unwrap_or(0),
        })
    }

    async fn update(&self, lease: &RentalLease) -> DbResult<RentalLease> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let lease = prepare(&mut tx, lease).await?;

        let result = sqlx::query(
            "UPDATE rental_lease SET start_date = ?, stop_date = ?, property_id = ?, rent_amount = ?, \
             payment_frequency = ?, tenant_user_id = ?, owner_user_id = ?, rent_agreement_document = ? \
             WHERE id = ?",
        )
        .bind(lease.start_date)
        .bind(lease.stop_date)
        .bind(&lease.property_id)
        .bind(lease.rent_amount.cents())
        .bind(&lease.payment_frequency)
        .bind(&lease.tenant_user_id)
        .bind(&lease.owner_user_id)
        .bind(&lease.rent_agreement_document)
        .bind(&lease.id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("RentalLease", &lease.id));
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(lease)
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM rental_lease WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("RentalLease", id));
        }

        Ok(())
    }
}
