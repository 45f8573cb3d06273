//! SQLite OwnershipRepository implementation.

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use super::helpers::{
    Filters, build_limit_offset_clause, build_order_clause, ensure_exists, map_sqlx_error,
};
use crate::db::utils::id_or_generate;
use crate::db::{
    DbError, DbResult, ListResult, OwnershipQuery, OwnershipRepository, PropertyOwnership,
};

const COLUMNS: &str = "id, property_id, user_id, start_date, end_date";

/// SQLx-backed property ownership repository.
pub struct SqliteOwnershipRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn ownership_from_row(row: &SqliteRow) -> PropertyOwnership {
    PropertyOwnership {
        id: row.get("id"),
        property_id: row.get("property_id"),
        user_id: row.get("user_id"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
    }
}

/// Check the window and the references of an ownership inside a transaction.
async fn validate(conn: &mut SqliteConnection, ownership: &PropertyOwnership) -> DbResult<()> {
    if let Some(end) = ownership.end_date
        && end < ownership.start_date
    {
        return Err(DbError::validation(
            "end_date",
            "must not be before start_date",
        ));
    }
    ensure_exists(&mut *conn, "property", "property", &ownership.property_id).await?;
    ensure_exists(&mut *conn, "app_user", "user", &ownership.user_id).await?;
    Ok(())
}

impl<'a> OwnershipRepository for SqliteOwnershipRepository<'a> {
    async fn create(&self, ownership: &PropertyOwnership) -> DbResult<PropertyOwnership> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        validate(&mut tx, ownership).await?;

        let id = id_or_generate(&ownership.id);
        sqlx::query(
            "INSERT INTO property_ownership (id, property_id, user_id, start_date, end_date) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&ownership.property_id)
        .bind(&ownership.user_id)
        .bind(ownership.start_date)
        .bind(ownership.end_date)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(PropertyOwnership {
            id,
            ..ownership.clone()
        })
    }

    async fn get(&self, id: &str) -> DbResult<PropertyOwnership> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM property_ownership WHERE id = ?",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref()
            .map(ownership_from_row)
            .ok_or_else(|| DbError::not_found("PropertyOwnership", id))
    }

    async fn list(
        &self,
        query: Option<&OwnershipQuery>,
    ) -> DbResult<ListResult<PropertyOwnership>> {
        let default_query = OwnershipQuery::default();
        let query = query.unwrap_or(&default_query);

        let filters = Filters::new()
            .eq("property_id", query.property_id.as_deref())
            .eq("user_id", query.user_id.as_deref());
        let where_clause = filters.where_clause();
        let order_clause =
            build_order_clause(&query.page, &["start_date", "end_date"], "start_date");
        let limit_clause = build_limit_offset_clause(&query.page);

        let sql = format!(
            "SELECT {} FROM property_ownership {} {} {}",
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

        let count_sql = format!("SELECT COUNT(*) FROM property_ownership {}", where_clause);
        let mut count_query = sqlx::query_scalar(&count_sql);
        for value in filters.values() {
            count_query = count_query.bind(value);
        }
        let total: i64 = count_query
            .fetch_one(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(ListResult {
            items: rows.iter().map(ownership_from_row).collect(),
            total: total as usize,
            limit: query.page.limit,
            offset: query.page.offset.unwrap_or(0),
        })
    }

    async fn update(&self, ownership: &PropertyOwnership) -> DbResult<PropertyOwnership> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        validate(&mut tx, ownership).await?;

        let result = sqlx::query(
            "UPDATE property_ownership SET property_id = ?, user_id = ?, start_date = ?, end_date = ? WHERE id = ?",
        )
        .bind(&ownership.property_id)
        .bind(&ownership.user_id)
        .bind(ownership.start_date)
        .bind(ownership.end_date)
        .bind(&ownership.id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PropertyOwnership", &ownership.id));
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(ownership.clone())
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM property_ownership WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PropertyOwnership", id));
        }

        Ok(())
    }

    async fn owners_on(
        &self,
        property_id: &str,
        date: NaiveDate,
    ) -> DbResult<Vec<PropertyOwnership>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM property_ownership \
             WHERE property_id = ? AND start_date <= ? AND (end_date IS NULL OR end_date >= ?) \
             ORDER BY start_date ASC, id ASC",
            COLUMNS
        ))
        .bind(property_id)
        .bind(date)
        .bind(date)
        .fetch_all(self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.iter().map(ownership_from_row).collect())
    }
}
