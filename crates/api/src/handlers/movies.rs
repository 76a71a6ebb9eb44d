//! Handlers for the movie catalog.
//!
//! Search validates the whole query string before touching the store, then
//! runs the count and the page fetch under a per-request cancellation token
//! derived from the server's shutdown token.

use axum::extract::State;
use axum::Json;
use reel_core::catalog;
use reel_core::error::CoreError;
use reel_core::movie::{Movie, PaginatedMovies};
use reel_core::search::validate_search;

use crate::error::AppResult;
use crate::query::{MovieId, SearchQuery};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// GET /api/movies
///
/// Paginated, filtered and sorted catalog search. Responds 400 with every
/// invalid parameter when validation fails.
pub async fn search_movies(
    State(state): State<AppState>,
    SearchQuery(raw): SearchQuery,
) -> AppResult<Json<PaginatedMovies>> {
    let request = validate_search(&raw).inspect_err(|e| {
        tracing::debug!(errors = ?e.field_errors(), "Rejected movie search");
    })?;

    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    let page = catalog::search_movies(state.store.as_ref(), &request, &cancel).await?;
    Ok(Json(page))
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// GET /api/movies/{id}
pub async fn get_movie(
    State(state): State<AppState>,
    MovieId(id): MovieId,
) -> AppResult<Json<Movie>> {
    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    let movie = catalog::find_movie(state.store.as_ref(), id, &cancel)
        .await?
        .ok_or(CoreError::NotFound { entity: "Movie", id })?;
    Ok(Json(movie))
}

// ---------------------------------------------------------------------------
// Genres
// ---------------------------------------------------------------------------

/// GET /api/movies/genres
///
/// Canonical genre names accepted by the `genres` search parameter.
pub async fn list_genres() -> Json<Vec<&'static str>> {
    Json(catalog::list_genres())
}
