//! Shared helper functions for SQLite repositories.

use sqlx::SqliteConnection;

use crate::db::{DbError, DbResult, PageSort, SortOrder};

/// Validate and map a sort field to the actual column name.
/// Returns None for invalid fields (falls back to default).
pub fn validate_sort_field(field: &str, allowed: &[&'static str]) -> Option<&'static str> {
    allowed.iter().copied().find(|&allowed_field| allowed_field == field)
}

/// Build ORDER BY clause from PageSort parameters.
///
/// `id` is always appended as a tie-breaker so pagination is stable.
pub fn build_order_clause(
    page: &PageSort,
    allowed_fields: &[&'static str],
    default_field: &str,
) -> String {
    let sort_field = page
        .sort_by
        .as_deref()
        .and_then(|f| validate_sort_field(f, allowed_fields))
        .unwrap_or(default_field);

    let order = match page.sort_order.unwrap_or(SortOrder::Asc) {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };

    format!("ORDER BY {} {}, id {}", sort_field, order, order)
}

/// SQLite integers are signed 64-bit; larger values are a datatype mismatch.
fn sqlite_int(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Build LIMIT/OFFSET clause from PageSort parameters.
/// Note: SQL requires LIMIT when using OFFSET. If offset is provided without limit,
/// we use LIMIT -1 (SQLite's "no limit" value).
pub fn build_limit_offset_clause(page: &PageSort) -> String {
    let mut clause = String::new();

    let limit = page.limit.map(sqlite_int);
    let offset = page.offset.filter(|&o| o > 0).map(sqlite_int);

    if let Some(limit) = limit {
        clause.push_str(&format!(" LIMIT {}", limit));
    } else if offset.is_some() {
        clause.push_str(" LIMIT -1");
    }

    if let Some(offset) = offset {
        clause.push_str(&format!(" OFFSET {}", offset));
    }

    clause
}

/// Equality filters collected for a list query.
///
/// Column names come from code, never from user input; values are bound.
#[derive(Debug, Default)]
pub struct Filters {
    conditions: Vec<String>,
    values: Vec<String>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `column = ?` when a value is present.
    pub fn eq(mut self, column: &str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.conditions.push(format!("{} = ?", column));
            self.values.push(value.to_string());
        }
        self
    }

    /// Add `(a = ? OR b = ?)` when a value is present.
    pub fn either(mut self, columns: [&str; 2], value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.conditions
                .push(format!("({} = ? OR {} = ?)", columns[0], columns[1]));
            self.values.push(value.to_string());
            self.values.push(value.to_string());
        }
        self
    }

    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Map a sqlx error to a DbError, naming the offending column for
/// uniqueness and check failures.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(db_err) = &e {
        let message = db_err.message().to_string();

        if db_err.is_unique_violation() {
            let field = message
                .rsplit(['.', ' '])
                .next()
                .unwrap_or("id")
                .to_string();
            return DbError::Constraint {
                field,
                message: "a record with this value already exists".to_string(),
            };
        }

        if db_err.is_check_violation() {
            let field = message
                .strip_prefix("CHECK constraint failed: ")
                .unwrap_or("unknown")
                .trim()
                .to_string();
            return DbError::Validation {
                field,
                message: "value is not allowed".to_string(),
            };
        }

        if db_err.is_foreign_key_violation() {
            return DbError::Constraint {
                field: "reference".to_string(),
                message,
            };
        }
    }

    DbError::Database {
        message: e.to_string(),
    }
}

/// Fail with a validation error on `field` unless a row with `id` exists in `table`.
pub async fn ensure_exists(
    conn: &mut SqliteConnection,
    table: &str,
    field: &str,
    id: &str,
) -> DbResult<()> {
    let exists: bool = sqlx::query_scalar(&format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)",
        table
    ))
    .bind(id)
    .fetch_one(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    if !exists {
        return Err(DbError::validation(
            field,
            format!("no {} with id '{}'", table, id),
        ));
    }
    Ok(())
}

/// Fail unless `value` is non-empty and at most `max` characters.
pub fn check_text(field: &str, value: &str, max: usize) -> DbResult<()> {
    if value.trim().is_empty() {
        return Err(DbError::validation(field, "must not be empty"));
    }
    check_max_len(field, value, max)
}

/// Fail when `value` is longer than `max` characters. Empty is allowed.
pub fn check_max_len(field: &str, value: &str, max: usize) -> DbResult<()> {
    if value.chars().count() > max {
        return Err(DbError::validation(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(())
}

/// Parse a stored enum value, treating unknown values as corrupt data.
pub fn parse_stored<T: std::str::FromStr<Err = String>>(value: &str) -> DbResult<T> {
    value
        .parse()
        .map_err(|message: String| DbError::Database { message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_clause_uses_default_for_unknown_field() {
        let page = PageSort {
            sort_by: Some("drop table".to_string()),
            ..Default::default()
        };
        assert_eq!(
            build_order_clause(&page, &["name"], "name"),
            "ORDER BY name ASC, id ASC"
        );
    }

    #[test]
    fn order_clause_honours_allowed_field_and_direction() {
        let page = PageSort {
            sort_by: Some("area_sq_ft".to_string()),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        assert_eq!(
            build_order_clause(&page, &["unit_name", "area_sq_ft"], "unit_name"),
            "ORDER BY area_sq_ft DESC, id DESC"
        );
    }

    #[test]
    fn offset_without_limit_uses_sqlite_no_limit() {
        let page = PageSort {
            offset: Some(10),
            ..Default::default()
        };
        assert_eq!(build_limit_offset_clause(&page), " LIMIT -1 OFFSET 10");
    }

    #[test]
    fn zero_offset_is_omitted() {
        let page = PageSort {
            limit: Some(5),
            offset: Some(0),
            ..Default::default()
        };
        assert_eq!(build_limit_offset_clause(&page), " LIMIT 5");
    }

    #[test]
    fn oversized_limit_and_offset_are_clamped() {
        let page = PageSort {
            limit: Some(usize::MAX),
            offset: Some(usize::MAX),
            ..Default::default()
        };
        assert_eq!(
            build_limit_offset_clause(&page),
            format!(" LIMIT {0} OFFSET {0}", i64::MAX)
        );
    }

    #[test]
    fn filters_only_include_present_values() {
        let filters = Filters::new()
            .eq("property_id", Some("abcd1234"))
            .eq("housing_type", None::<String>)
            .either(["to_user_id", "from_user_id"], Some("u1"));
        assert_eq!(
            filters.where_clause(),
            "WHERE property_id = ? AND (to_user_id = ? OR from_user_id = ?)"
        );
        assert_eq!(filters.values(), ["abcd1234", "u1", "u1"]);
    }

    #[test]
    fn check_text_rejects_blank_and_long_values() {
        assert!(check_text("name", "Tower A", 255).is_ok());
        assert_eq!(
            check_text("name", "   ", 255).unwrap_err().field(),
            Some("name")
        );
        assert!(check_text("title", &"x".repeat(201), 200).is_err());
        assert!(check_max_len("address_segment", "", 255).is_ok());
    }
}
