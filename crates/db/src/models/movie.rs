//! The `movies` table.

use reel_core::genre::GenreMask;
use reel_core::movie::MovieRecord;
use reel_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `movies` table.
#[derive(Debug, Clone, FromRow)]
pub struct MovieRow {
    pub id: DbId,
    pub title: String,
    pub overview: String,
    pub popularity: f32,
    pub poster_url: String,
    pub vote_count: i32,
    pub vote_average: f64,
    pub release_date: Timestamp,
    pub original_language: String,
    pub genres: i32,
}

impl From<MovieRow> for MovieRecord {
    fn from(row: MovieRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            overview: row.overview,
            popularity: row.popularity,
            poster_url: row.poster_url,
            vote_count: row.vote_count,
            vote_average: row.vote_average,
            release_date: row.release_date,
            original_language: row.original_language,
            genres: GenreMask::from_bits_retain(row.genres),
        }
    }
}

/// DTO for inserting a movie.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateMovie {
    pub title: String,
    pub overview: String,
    pub popularity: f32,
    pub poster_url: String,
    pub vote_count: i32,
    pub vote_average: f64,
    pub release_date: Timestamp,
    pub original_language: String,
    pub genres: GenreMask,
}
