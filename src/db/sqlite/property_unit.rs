//! SQLite PropertyUnitRepository implementation.
//!
//! A unit saved without a property gets one provisioned in the same
//! transaction as the unit write. Either both rows become visible or
//! neither does.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;

use super::helpers::{
    Filters, build_limit_offset_clause, build_order_clause, check_text, ensure_exists,
    map_sqlx_error, parse_stored,
};
use super::property::insert_property;
use crate::db::upload::{UploadNamespace, normalize_file_ref};
use crate::db::utils::id_or_generate;
use crate::db::{
    DbError, DbResult, HousingType, Id, ListResult, Property, PropertyUnit, PropertyUnitQuery,
    PropertyUnitRepository,
};

const UNIT_NAME_MAX_LEN: usize = 255;

const COLUMNS: &str = "id, unit_name, housing_type, area_sq_ft, property_id, image";

/// SQLx-backed property unit repository.
pub struct SqlitePropertyUnitRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn unit_from_row(row: &SqliteRow) -> DbResult<PropertyUnit> {
    let housing_type: String = row.get("housing_type");
    Ok(PropertyUnit {
        id: row.get("id"),
        unit_name: row.get("unit_name"),
        housing_type: parse_stored::<HousingType>(&housing_type)?,
        area_sq_ft: row.get("area_sq_ft"),
        property_id: row.get("property_id"),
        image: row.get("image"),
    })
}

/// Validate and normalize a unit before it is written.
fn prepare(unit: &PropertyUnit) -> DbResult<PropertyUnit> {
    check_text("unit_name", &unit.unit_name, UNIT_NAME_MAX_LEN)?;
    if unit.area_sq_ft < 0 {
        return Err(DbError::validation("area_sq_ft", "must not be negative"));
    }

    Ok(PropertyUnit {
        image: normalize_file_ref(
            "image",
            UploadNamespace::PropertyUnitImages,
            unit.image.as_deref(),
        )?,
        ..unit.clone()
    })
}

/// Property the unit will be stored against.
///
/// An explicit property must exist. A missing one is provisioned: named
/// after the unit and sharing its image. This is the only caller of
/// [`insert_property`] on the unit path, and it runs once per save.
async fn resolve_property(conn: &mut SqliteConnection, unit: &PropertyUnit) -> DbResult<Id> {
    if let Some(property_id) = &unit.property_id {
        ensure_exists(&mut *conn, "property", "property", property_id).await?;
        return Ok(property_id.clone());
    }

    let provisioned = insert_property(
        &mut *conn,
        &Property {
            id: String::new(),
            name: unit.unit_name.clone(),
            group_type: None,
            re_group_id: None,
            address_segment: String::new(),
            image: unit.image.clone(),
        },
    )
    .await
    .map_err(|e| match e {
        // Report property-side validation against the unit field it came from.
        DbError::Validation { field, message } if field == "name" => DbError::Validation {
            field: "unit_name".to_string(),
            message,
        },
        other => other,
    })?;

    debug!(
        unit_name = %unit.unit_name,
        property_id = %provisioned.id,
        "Provisioned property for unit"
    );

    Ok(provisioned.id)
}

impl<'a> PropertyUnitRepository for SqlitePropertyUnitRepository<'a> {
    async fn create(&self, unit: &PropertyUnit) -> DbResult<PropertyUnit> {
        let unit = prepare(unit)?;

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let property_id = resolve_property(&mut tx, &unit).await?;

        let id = id_or_generate(&unit.id);
        sqlx::query(
            "INSERT INTO property_unit (id, unit_name, housing_type, area_sq_ft, property_id, image) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&unit.unit_name)
        .bind(unit.housing_type.to_string())
        .bind(unit.area_sq_ft)
        .bind(&property_id)
        .bind(&unit.image)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(PropertyUnit {
            id,
            property_id: Some(property_id),
            ..unit
        })
    }

    async fn get(&self, id: &str) -> DbResult<PropertyUnit> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM property_unit WHERE id = ?",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => unit_from_row(&row),
            None => Err(DbError::not_found("PropertyUnit", id)),
        }
    }

    async fn list(&self, query: Option<&PropertyUnitQuery>) -> DbResult<ListResult<PropertyUnit>> {
        let default_query = PropertyUnitQuery::default();
        let query = query.unwrap_or(&default_query);

        let filters = Filters::new()
            .eq("property_id", query.property_id.as_deref())
            .eq("housing_type", query.housing_type);
        let where_clause = filters.where_clause();
        let order_clause = build_order_clause(
            &query.page,
            &["unit_name", "housing_type", "area_sq_ft"],
            "unit_name",
        );
        let limit_clause = build_limit_offset_clause(&query.page);

        let sql = format!(
            "SELECT {} FROM property_unit {} {} {}",
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

        let count_sql = format!("SELECT COUNT(*) FROM property_unit {}", where_clause);
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
                .map(unit_from_row)
                .collect::<DbResult<Vec<_>>>()?,
            total: total as usize,
            limit: query.page.limit,
            offset: query.page.offset.unwrap_or(0),
        })
    }

    async fn update(&self, unit: &PropertyUnit) -> DbResult<PropertyUnit> {
        let unit = prepare(unit)?;

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let property_id = resolve_property(&mut tx, &unit).await?;

        let result = sqlx::query(
            "UPDATE property_unit SET unit_name = ?, housing_type = ?, area_sq_ft = ?, property_id = ?, image = ? WHERE id = ?",
        )
        .bind(&unit.unit_name)
        .bind(unit.housing_type.to_string())
        .bind(unit.area_sq_ft)
        .bind(&property_id)
        .bind(&unit.image)
        .bind(&unit.id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        // Dropping the transaction rolls back any provisioned property.
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PropertyUnit", &unit.id));
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(PropertyUnit {
            property_id: Some(property_id),
            ..unit
        })
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM property_unit WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PropertyUnit", id));
        }

        Ok(())
    }
}
