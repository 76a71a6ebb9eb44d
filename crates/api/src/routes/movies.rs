//! Route definitions for the movie catalog.
//!
//! Mounted at `/movies` in the API route tree.

use axum::routing::get;
use axum::Router;

use crate::handlers::movies;
use crate::state::AppState;

/// Catalog routes mounted at `/movies`.
///
/// ```text
/// GET    /            -> search_movies
/// GET    /genres      -> list_genres
/// GET    /{id}        -> get_movie
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(movies::search_movies))
        .route("/genres", get(movies::list_genres))
        .route("/{id}", get(movies::get_movie))
}
