//! Post handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use super::{ApiJson, ApiQuery, ApiResult, ErrorResponse, db_error, page_sort};
use crate::api::AppState;
use crate::db::{Database, Post, PostQuery, PostRepository};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Serialize, ToSchema)]
pub struct PostResponse {
    #[schema(example = "a1b2c3d4")]
    pub id: String,
    #[schema(example = "New tenants welcome evening")]
    pub title: String,
    #[schema(example = "b2c3d4e5")]
    pub author_id: String,
    pub body: String,
}

impl From<Post> for PostResponse {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            title: p.title,
            author_id: p.author_id,
            body: p.body,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    #[schema(example = "New tenants welcome evening")]
    pub title: String,
    #[schema(example = "b2c3d4e5")]
    pub author_id: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchPostRequest {
    pub title: Option<String>,
    pub author_id: Option<String>,
    pub body: Option<String>,
}

impl PatchPostRequest {
    fn merge_into(self, target: &mut Post) {
        if let Some(title) = self.title {
            target.title = title;
        }
        if let Some(author_id) = self.author_id {
            target.author_id = author_id;
        }
        if let Some(body) = self.body {
            target.body = body;
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPostsQuery {
    /// Filter by author
    #[param(example = "b2c3d4e5")]
    pub author_id: Option<String>,
    #[param(example = 20)]
    pub limit: Option<usize>,
    #[param(example = 0)]
    pub offset: Option<usize>,
    /// Field to sort by (title)
    pub sort: Option<String>,
    /// Sort order (asc, desc)
    pub order: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedPosts {
    pub items: Vec<PostResponse>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "posts",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "Paginated list of posts", body = PaginatedPosts),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_posts<D: Database>(
    State(state): State<AppState<D>>,
    ApiQuery(query): ApiQuery<ListPostsQuery>,
) -> ApiResult<Json<PaginatedPosts>> {
    let db_query = PostQuery {
        page: page_sort(query.limit, query.offset, query.sort, query.order.as_deref()),
        author_id: query.author_id,
    };

    let result = state
        .db()
        .posts()
        .list(Some(&db_query))
        .await
        .map_err(db_error)?;

    Ok(Json(PaginatedPosts {
        items: result.items.into_iter().map(PostResponse::from).collect(),
        total: result.total,
        limit: result.limit.unwrap_or(result.total),
        offset: result.offset,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post found", body = PostResponse),
        (status = 404, description = "Post not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_post<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<Json<PostResponse>> {
    let post = state.db().posts().get(&id).await.map_err(db_error)?;
    Ok(Json(PostResponse::from(post)))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 422, description = "Invalid title or unknown author", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_post<D: Database>(
    State(state): State<AppState<D>>,
    ApiJson(req): ApiJson<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    let post = Post {
        id: String::new(),
        title: req.title,
        author_id: req.author_id,
        body: req.body,
    };

    let created = state.db().posts().create(&post).await.map_err(db_error)?;
    Ok((StatusCode::CREATED, Json(PostResponse::from(created))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    params(("id" = String, Path, description = "Post ID")),
    request_body = PatchPostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
        (status = 422, description = "Invalid field", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn patch_post<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<PatchPostRequest>,
) -> ApiResult<Json<PostResponse>> {
    let mut post = state.db().posts().get(&id).await.map_err(db_error)?;
    req.merge_into(&mut post);

    let updated = state.db().posts().update(&post).await.map_err(db_error)?;
    Ok(Json(PostResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "Post not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_post<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db().posts().delete(&id).await.map_err(db_error)?;
    Ok(StatusCode::NO_CONTENT)
}
