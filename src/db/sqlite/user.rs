//! SQLite UserRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::helpers::{
    build_limit_offset_clause, build_order_clause, check_text, map_sqlx_error,
};
use crate::db::utils::{current_timestamp, id_or_generate};
use crate::db::{DbError, DbResult, ListResult, User, UserQuery, UserRepository};

const USERNAME_MAX_LEN: usize = 150;

/// SQLx-backed user repository.
pub struct SqliteUserRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        created_at: row.get("created_at"),
    }
}

impl<'a> UserRepository for SqliteUserRepository<'a> {
    async fn create(&self, user: &User) -> DbResult<User> {
        check_text("username", &user.username, USERNAME_MAX_LEN)?;

        let id = id_or_generate(&user.id);
        let created_at = current_timestamp();

        sqlx::query("INSERT INTO app_user (id, username, created_at) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(&user.username)
            .bind(&created_at)
            .execute(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(User {
            id,
            username: user.username.clone(),
            created_at,
        })
    }

    async fn get(&self, id: &str) -> DbResult<User> {
        let row = sqlx::query("SELECT id, username, created_at FROM app_user WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref()
            .map(user_from_row)
            .ok_or_else(|| DbError::not_found("User", id))
    }

    async fn list(&self, query: Option<&UserQuery>) -> DbResult<ListResult<User>> {
        let default_query = UserQuery::default();
        let query = query.unwrap_or(&default_query);

        let order_clause =
            build_order_clause(&query.page, &["username", "created_at"], "username");
        let limit_clause = build_limit_offset_clause(&query.page);

        let sql = format!(
            "SELECT id, username, created_at FROM app_user {} {}",
            order_clause, limit_clause
        );

        let rows = sqlx::query(&sql)
            .fetch_all(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM app_user")
            .fetch_one(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(ListResult {
            items: rows.iter().map(user_from_row).collect(),
            total: total as usize,
            limit: query.page.limit,
            offset: query.page.offset.unwrap_or(0),
        })
    }

    async fn update(&self, user: &User) -> DbResult<User> {
        check_text("username", &user.username, USERNAME_MAX_LEN)?;

        let result = sqlx::query("UPDATE app_user SET username = ? WHERE id = ?")
            .bind(&user.username)
            .bind(&user.id)
            .execute(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", &user.id));
        }

        self.get(&user.id).await
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM app_user WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }
}
