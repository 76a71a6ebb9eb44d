#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use reel_core::genre::{Genre, GenreMask};
use reel_core::movie::MovieRecord;
use reel_core::store::{MemoryMovieStore, MovieStore};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use reel_api::config::ServerConfig;
use reel_api::router::build_app_router;
use reel_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 1,
    }
}

/// Build the full application router over the given store.
pub fn build_app_with_store(store: Arc<dyn MovieStore>) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        shutdown: CancellationToken::new(),
    };
    build_app_router(state, &config)
}

/// Build the full application router over an in-memory catalog.
pub fn build_test_app(records: Vec<MovieRecord>) -> Router {
    build_app_with_store(Arc::new(MemoryMovieStore::new(records)))
}

/// A movie released on January 1st of `year`.
pub fn movie(id: i64, title: &str, year: i32, genres: &[Genre]) -> MovieRecord {
    MovieRecord {
        id,
        title: title.to_string(),
        overview: format!("Overview of {title}"),
        popularity: 10.0,
        poster_url: format!("https://image.test/{id}.jpg"),
        vote_count: 100,
        vote_average: 7.0,
        release_date: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
        original_language: "en".to_string(),
        genres: genres.iter().collect::<GenreMask>(),
    }
}

/// Ten movies titled "Movie 00" .. "Movie 09", ids 1..=10.
pub fn ten_movies() -> Vec<MovieRecord> {
    (0..10)
        .map(|i| {
            movie(
                i + 1,
                &format!("Movie {i:02}"),
                2000 + i as i32,
                &[Genre::Drama],
            )
        })
        .collect()
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
