//! SQLite PropertyRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use super::helpers::{
    Filters, build_limit_offset_clause, build_order_clause, check_max_len, check_text,
    ensure_exists, map_sqlx_error, parse_stored,
};
use crate::db::upload::{UploadNamespace, normalize_file_ref};
use crate::db::utils::id_or_generate;
use crate::db::{
    DbError, DbResult, GroupType, ListResult, Property, PropertyQuery, PropertyRepository,
};

pub(crate) const NAME_MAX_LEN: usize = 255;
const ADDRESS_SEGMENT_MAX_LEN: usize = 255;

const COLUMNS: &str = "id, name, group_type, re_group_id, address_segment, image";

/// SQLx-backed property repository.
pub struct SqlitePropertyRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn property_from_row(row: &SqliteRow) -> DbResult<Property> {
    let group_type: Option<String> = row.get("group_type");
    Ok(Property {
        id: row.get("id"),
        name: row.get("name"),
        group_type: group_type
            .as_deref()
            .map(parse_stored::<GroupType>)
            .transpose()?,
        re_group_id: row.get("re_group_id"),
        address_segment: row.get("address_segment"),
        image: row.get("image"),
    })
}

/// Validate and normalize a property before it is written.
fn prepare(property: &Property) -> DbResult<Property> {
    check_text("name", &property.name, NAME_MAX_LEN)?;
    check_max_len(
        "address_segment",
        &property.address_segment,
        ADDRESS_SEGMENT_MAX_LEN,
    )?;

    Ok(Property {
        image: normalize_file_ref(
            "image",
            UploadNamespace::PropertyImages,
            property.image.as_deref(),
        )?,
        ..property.clone()
    })
}

/// Insert a property on an open connection or transaction.
///
/// Shared with the unit repository, which provisions properties inside its
/// own transaction.
pub(crate) async fn insert_property(
    conn: &mut SqliteConnection,
    property: &Property,
) -> DbResult<Property> {
    let property = prepare(property)?;
    if let Some(parent) = &property.re_group_id {
        ensure_exists(&mut *conn, "property", "re_group", parent).await?;
    }

    let id = id_or_generate(&property.id);
    sqlx::query(
        "INSERT INTO property (id, name, group_type, re_group_id, address_segment, image) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&property.name)
    .bind(property.group_type.map(|g| g.to_string()))
    .bind(&property.re_group_id)
    .bind(&property.address_segment)
    .bind(&property.image)
    .execute(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(Property { id, ..property })
}

/// Reject a parent assignment that would make `id` its own ancestor.
async fn ensure_no_cycle(conn: &mut SqliteConnection, id: &str, parent: &str) -> DbResult<()> {
    if parent == id {
        return Err(DbError::constraint(
            "re_group",
            "a property cannot be grouped under itself",
        ));
    }

    // Walk up from the proposed parent; reaching `id` means a cycle.
    let ancestor_is_self: bool = sqlx::query_scalar(
        r#"
        WITH RECURSIVE ancestors(id) AS (
            SELECT re_group_id FROM property WHERE id = ?
            UNION
            SELECT p.re_group_id FROM property p JOIN ancestors a ON p.id = a.id
        )
        SELECT EXISTS(SELECT 1 FROM ancestors WHERE id = ?)
        "#,
    )
    .bind(parent)
    .bind(id)
    .fetch_one(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    if ancestor_is_self {
        return Err(DbError::constraint(
            "re_group",
            "a property cannot be grouped under one of its own descendants",
        ));
    }
    Ok(())
}

impl<'a> PropertyRepository for SqlitePropertyRepository<'a> {
    async fn create(&self, property: &Property) -> DbResult<Property> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let created = insert_property(&mut tx, property).await?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(created)
    }

    async fn get(&self, id: &str) -> DbResult<Property> {
        let row = sqlx::query(&format!("SELECT {} FROM property WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => property_from_row(&row),
            None => Err(DbError::not_found("Property", id)),
        }
    }

    async fn list(&self, query: Option<&PropertyQuery>) -> DbResult<ListResult<Property>> {
        let default_query = PropertyQuery::default();
        let query = query.unwrap_or(&default_query);

        let filters = Filters::new()
            .eq("re_group_id", query.re_group_id.as_deref())
            .eq("group_type", query.group_type);
        let where_clause = filters.where_clause();
        let order_clause =
            build_order_clause(&query.page, &["name", "group_type", "address_segment"], "name");
        let limit_clause = build_limit_offset_clause(&query.page);

        let sql = format!(
            "SELECT {} FROM property {} {} {}",
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

        let count_sql = format!("SELECT COUNT(*) FROM property {}", where_clause);
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
                .map(property_from_row)
                .collect::<DbResult<Vec<_>>>()?,
            total: total as usize,
            limit: query.page.limit,
            offset: query.page.offset.unwrap_or(0),
        })
    }

    async fn update(&self, property: &Property) -> DbResult<Property> {
        let property = prepare(property)?;

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        if let Some(parent) = &property.re_group_id {
            ensure_exists(&mut tx, "property", "re_group", parent).await?;
            ensure_no_cycle(&mut tx, &property.id, parent).await?;
        }

        let result = sqlx::query(
            "UPDATE property SET name = ?, group_type = ?, re_group_id = ?, address_segment = ?, image = ? WHERE id = ?",
        )
        .bind(&property.name)
        .bind(property.group_type.map(|g| g.to_string()))
        .bind(&property.re_group_id)
        .bind(&property.address_segment)
        .bind(&property.image)
        .bind(&property.id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Property", &property.id));
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(property)
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM property WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Property", id));
        }

        Ok(())
    }

    async fn children(&self, id: &str) -> DbResult<Vec<Property>> {
        // Distinguish "no children" from "no such property".
        self.get(id).await?;

        let rows = sqlx::query(&format!(
            "SELECT {} FROM property WHERE re_group_id = ? ORDER BY name ASC, id ASC",
            COLUMNS
        ))
        .bind(id)
        .fetch_all(self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(property_from_row).collect()
    }
}
