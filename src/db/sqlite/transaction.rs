//! SQLite TransactionRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use super::helpers::{
    Filters, build_limit_offset_clause, build_order_clause, ensure_exists, map_sqlx_error,
};
use crate::db::upload::{UploadNamespace, normalize_file_ref};
use crate::db::utils::{current_timestamp, id_or_generate};
use crate::db::{
    DbError, DbResult, ListResult, Money, Transaction, TransactionQuery, TransactionRepository,
};

const COLUMNS: &str =
    "id, datetime, amount, property_id, to_user_id, from_user_id, transaction_details";

/// SQLx-backed transaction repository.
pub struct SqliteTransactionRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn transaction_from_row(row: &SqliteRow) -> DbResult<Transaction> {
    let cents: i64 = row.get("amount");
    Ok(Transaction {
        id: row.get("id"),
        datetime: row.get("datetime"),
        amount: Money::from_cents(cents).map_err(|e| DbError::Database {
            message: format!("stored amount is invalid: {}", e),
        })?,
        property_id: row.get("property_id"),
        to_user_id: row.get("to_user_id"),
        from_user_id: row.get("from_user_id"),
        transaction_details: row.get("transaction_details"),
    })
}

/// Validate and normalize a transaction inside a database transaction.
async fn prepare(conn: &mut SqliteConnection, transaction: &Transaction) -> DbResult<Transaction> {
    ensure_exists(&mut *conn, "property", "property", &transaction.property_id).await?;
    ensure_exists(&mut *conn, "app_user", "to_user", &transaction.to_user_id).await?;
    ensure_exists(&mut *conn, "app_user", "from_user", &transaction.from_user_id).await?;

    Ok(Transaction {
        transaction_details: normalize_file_ref(
            "transaction_details",
            UploadNamespace::TransactionDocuments,
            transaction.transaction_details.as_deref(),
        )?,
        ..transaction.clone()
    })
}

impl<'a> TransactionRepository for SqliteTransactionRepository<'a> {
    async fn create(&self, transaction: &Transaction) -> DbResult<Transaction> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let transaction = prepare(&mut tx, transaction).await?;

        let id = id_or_generate(&transaction.id);
        let datetime = current_timestamp();
        sqlx::query(&format!(
            "INSERT INTO property_transaction ({}) VALUES (?, ?, ?, ?, ?, ?, ?)",
            COLUMNS
        ))
        .bind(&id)
        .bind(&datetime)
        .bind(transaction.amount.cents())
        .bind(&transaction.property_id)
        .bind(&transaction.to_user_id)
        .bind(&transaction.from_user_id)
        .bind(&transaction.transaction_details)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(Transaction {
            id,
            datetime,
            ..transaction
        })
    }

    async fn get(&self, id: &str) -> DbResult<Transaction> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM property_transaction WHERE id = ?",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => transaction_from_row(&row),
            None => Err(DbError::not_found("Transaction", id)),
        }
    }

    async fn list(&self, query: Option<&TransactionQuery>) -> DbResult<ListResult<Transaction>> {
        let default_query = TransactionQuery::default();
        let query = query.unwrap_or(&default_query);

        let filters = Filters::new()
            .eq("property_id", query.property_id.as_deref())
            .either(["to_user_id", "from_user_id"], query.user_id.as_deref());
        let where_clause = filters.where_clause();
        let order_clause = build_order_clause(&query.page, &["datetime", "amount"], "datetime");
        let limit_clause = build_limit_offset_clause(&query.page);

        let sql = format!(
            "SELECT {} FROM property_transaction {} {} {}",
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

        let count_sql = format!("SELECT COUNT(*) FROM property_transaction {}", where_clause);
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
                .map(transaction_from_row)
                .collect::<DbResult<Vec<_>>>()?,
            total: total as usize,
            limit: query.page.limit,
            offset: query.page.offset.unwrap_or(0),
        })
    }

    async fn update(&self, transaction: &Transaction) -> DbResult<Transaction> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let transaction = prepare(&mut tx, transaction).await?;

        // `datetime` is immutable and never part of the SET list.
        let result = sqlx::query(
            "UPDATE property_transaction SET amount = ?, property_id = ?, to_user_id = ?, \
             from_user_id = ?, transaction_details = ? WHERE id = ?",
        )
        .bind(transaction.amount.cents())
        .bind(&transaction.property_id)
        .bind(&transaction.to_user_id)
        .bind(&transaction.from_user_id)
        .bind(&transaction.transaction_details)
        .bind(&transaction.id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", &transaction.id));
        }

        let datetime: String =
            sqlx::query_scalar("SELECT datetime FROM property_transaction WHERE id = ?")
                .bind(&transaction.id)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(Transaction {
            datetime,
            ..transaction
        })
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM property_transaction WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", id));
        }

        Ok(())
    }
}
