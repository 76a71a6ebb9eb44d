//! Request extraction for catalog routes: search query strings and movie ids.

use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use reel_core::search::RawSearchParams;
use reel_core::types::DbId;

use crate::error::AppError;

/// Raw search parameters taken from the query string.
///
/// Parameter names are matched case-insensitively and `genres` may repeat,
/// so the query is first decoded into ordered pairs rather than a struct.
#[derive(Debug, Clone)]
pub struct SearchQuery(pub RawSearchParams);

impl<S> FromRequestParts<S> for SearchQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        Ok(SearchQuery(RawSearchParams::from_pairs(pairs)))
    }
}

/// Movie id taken from the `{id}` path segment.
///
/// A segment that is not an integer is rejected with the JSON error body
/// instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy)]
pub struct MovieId(pub DbId);

impl<S> FromRequestParts<S> for MovieId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<DbId>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::BadRequest(format!("Invalid movie id: {}", rejection.body_text()))
            })?;

        Ok(MovieId(id))
    }
}
