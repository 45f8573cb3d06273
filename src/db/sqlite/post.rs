//! SQLite PostRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::helpers::{
    Filters, build_limit_offset_clause, build_order_clause, check_text, ensure_exists,
    map_sqlx_error,
};
use crate::db::utils::id_or_generate;
use crate::db::{DbError, DbResult, ListResult, Post, PostQuery, PostRepository};

const TITLE_MAX_LEN: usize = 200;

/// SQLx-backed post repository.
pub struct SqlitePostRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

fn post_from_row(row: &SqliteRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        author_id: row.get("author_id"),
        body: row.get("body"),
    }
}

impl<'a> PostRepository for SqlitePostRepository<'a> {
    async fn create(&self, post: &Post) -> DbResult<Post> {
        check_text("title", &post.title, TITLE_MAX_LEN)?;

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        ensure_exists(&mut tx, "app_user", "author", &post.author_id).await?;

        let id = id_or_generate(&post.id);
        sqlx::query("INSERT INTO post (id, title, author_id, body) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(&post.title)
            .bind(&post.author_id)
            .bind(&post.body)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(Post {
            id,
            ..post.clone()
        })
    }

    async fn get(&self, id: &str) -> DbResult<Post> {
        let row = sqlx::query("SELECT id, title, author_id, body FROM post WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref()
            .map(post_from_row)
            .ok_or_else(|| DbError::not_found("Post", id))
    }

    async fn list(&self, query: Option<&PostQuery>) -> DbResult<ListResult<Post>> {
        let default_query = PostQuery::default();
        let query = query.unwrap_or(&default_query);

        let filters = Filters::new().eq("author_id", query.author_id.as_deref());
        let where_clause = filters.where_clause();
        let order_clause = build_order_clause(&query.page, &["title"], "title");
        let limit_clause = build_limit_offset_clause(&query.page);

        let sql = format!(
            "SELECT id, title, author_id, body FROM post {} {} {}",
            where_clause, order_clause, limit_clause
        );
        let mut sql_query = sqlx::query(&sql);
        for value in filters.values() {
            sql_query = sql_query.bind(value);
        }
        let rows = sql_query
            .fetch_all(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let count_sql = format!("SELECT COUNT(*) FROM post {}", where_clause);
        let mut count_query = sqlx::query_scalar(&count_sql);
        for value in filters.values() {
            count_query = count_query.bind(value);
        }
        let total: i64 = count_query
            .fetch_one(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(ListResult {
            items: rows.iter().map(post_from_row).collect(),
            total: total as usize,
            limit: query.page.limit,
            offset: query.page.offset.unwrap_or(0),
        })
    }

    async fn update(&self, post: &Post) -> DbResult<Post> {
        check_text("title", &post.title, TITLE_MAX_LEN)?;

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        ensure_exists(&mut tx, "app_user", "author", &post.author_id).await?;

        let result = sqlx::query("UPDATE post SET title = ?, author_id = ?, body = ? WHERE id = ?")
            .bind(&post.title)
            .bind(&post.author_id)
            .bind(&post.body)
            .bind(&post.id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Post", &post.id));
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(post.clone())
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM post WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Post", id));
        }

        Ok(())
    }
}
