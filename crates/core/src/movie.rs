//! Movie records and their public representation.

use serde::Serialize;

use crate::genre::{Genre, GenreMask};
use crate::search::SearchRequest;
use crate::types::{DbId, Timestamp};

/// A movie as persisted, with genres still packed into a [`GenreMask`].
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub id: DbId,
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

/// A movie as returned to API clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub overview: String,
    pub popularity: f32,
    pub poster_url: String,
    pub vote_count: i32,
    /// Average rating out of 10.
    pub vote_average: f64,
    pub release_date: Timestamp,
    pub original_language: String,
    pub genres: Vec<Genre>,
}

impl From<MovieRecord> for Movie {
    fn from(record: MovieRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            overview: record.overview,
            popularity: record.popularity,
            poster_url: record.poster_url,
            vote_count: record.vote_count,
            vote_average: record.vote_average,
            release_date: record.release_date,
            original_language: record.original_language,
            genres: record.genres.genres(),
        }
    }
}

/// Pagination metadata of a search response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: i64,
    /// Requested page size, not the number of records returned.
    pub page_size: i64,
    /// Size of the whole filtered set.
    pub total_records: i64,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedMovies {
    pub pagination: PageInfo,
    pub records: Vec<Movie>,
}

impl PaginatedMovies {
    /// Map fetched records into the response envelope, keeping their order.
    pub fn assemble(
        request: &SearchRequest,
        total_records: i64,
        records: Vec<MovieRecord>,
    ) -> Self {
        Self {
            pagination: PageInfo {
                page: request.page(),
                page_size: request.page_size(),
                total_records,
            },
            records: records.into_iter().map(Movie::from).collect(),
        }
    }
}
