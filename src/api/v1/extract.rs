//! JSON body and query string extractors that reject with [`ErrorResponse`].
//!
//! axum's own rejections are plain text. These wrap `Json` and `Query` so a
//! malformed request gets the same `{"error", "field"}` body as a failed save,
//! with the offending field taken from the deserializer's path.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::ErrorResponse;

/// `Json<T>` with a JSON error body on rejection.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

/// `Query<T>` with a JSON error body on rejection.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(json_rejection)
    }
}

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(query_rejection)
    }
}

fn json_rejection(rejection: JsonRejection) -> (StatusCode, Json<ErrorResponse>) {
    // Well-formed JSON with bad values is a validation failure; syntax and
    // content-type problems keep axum's status.
    let status = match &rejection {
        JsonRejection::JsonDataError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        other => other.status(),
    };
    rejected(status, rejection.body_text())
}

fn query_rejection(rejection: QueryRejection) -> (StatusCode, Json<ErrorResponse>) {
    rejected(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
}

fn rejected(status: StatusCode, message: String) -> (StatusCode, Json<ErrorResponse>) {
    let field = field_from_message(&message);
    debug!(%status, ?field, %message, "Rejected request");
    (status, Json(ErrorResponse { error: message, field }))
}

/// Field named by a deserialization message.
///
/// Messages look like `<context>: <path>: <error>`, or
/// `<context>: missing field `name`` when the error sits at the root.
pub(crate) fn field_from_message(message: &str) -> Option<String> {
    let detail = message.split_once(": ").map_or(message, |(_, rest)| rest);

    if let Some((path, _)) = detail.split_once(": ")
        && !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
    {
        return Some(path.to_string());
    }

    let (_, rest) = detail.split_once("missing field `")?;
    rest.split_once('`').map(|(name, _)| name.to_string())
}
