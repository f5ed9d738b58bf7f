//! Custom extractors for API handlers.

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

/// JSON body whose rejection is reported as `{"detail": ...}` with 422.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::Validation(format!("Invalid JSON body: {}", e.body_text())))?;

        Ok(JsonBody(value))
    }
}

/// Numeric `:id` path segment. A non-integer id is a 422, not axum's plain-text 400.
pub struct PathId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                ApiError::Validation(format!("Invalid path parameter: {}", e.body_text()))
            })?;

        Ok(PathId(id))
    }
}
