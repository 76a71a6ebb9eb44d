//! Parsing of the movie dataset CSV export.
//!
//! The export is not clean: some rows lack trailing fields and a few carry
//! values that do not parse. Rows that cannot become a movie are skipped
//! with a warning instead of aborting the import.

use std::io;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reel_core::genre::{Genre, GenreMask};
use reel_core::types::Timestamp;
use reel_db::models::movie::CreateMovie;
use serde::Deserialize;

/// One CSV record, with every column kept as text until validated.
#[derive(Debug, Default, Deserialize)]
pub struct CsvMovie {
    #[serde(rename = "Release_Date", default)]
    pub release_date: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Overview", default)]
    pub overview: Option<String>,
    #[serde(rename = "Popularity", default)]
    pub popularity: Option<String>,
    #[serde(rename = "Vote_Count", default)]
    pub vote_count: Option<String>,
    #[serde(rename = "Vote_Average", default)]
    pub vote_average: Option<String>,
    #[serde(rename = "Original_Language", default)]
    pub original_language: Option<String>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    #[serde(rename = "Poster_Url", default)]
    pub poster_url: Option<String>,
}

/// Why a CSV record could not be imported.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RowError {
    #[error("missing title")]
    MissingTitle,

    #[error("missing release date")]
    MissingReleaseDate,

    #[error("unparseable release date '{0}'")]
    BadReleaseDate(String),

    #[error("{field} is not a number: '{value}'")]
    BadNumber { field: &'static str, value: String },
}

/// Outcome of reading a whole export.
#[derive(Debug, Default)]
pub struct ImportBatch {
    pub movies: Vec<CreateMovie>,
    /// Rows dropped because they were malformed.
    pub skipped: usize,
    /// Imported movies none of whose genre labels were recognised.
    pub without_genre: usize,
}

/// Read every record from `reader`, skipping malformed rows.
pub fn read_movies<R: io::Read>(reader: R) -> ImportBatch {
    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Fields)
        .from_reader(reader);

    let mut batch = ImportBatch::default();
    for (index, result) in csv.deserialize::<CsvMovie>().enumerate() {
        // Header is line 1.
        let line = index + 2;

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(line, error = %e, "Skipping unreadable CSV row");
                batch.skipped += 1;
                continue;
            }
        };

        match record.into_movie() {
            Ok(movie) => {
                if movie.genres.is_empty() {
                    batch.without_genre += 1;
                }
                batch.movies.push(movie);
            }
            Err(e) => {
                tracing::warn!(line, error = %e, "Skipping malformed movie row");
                batch.skipped += 1;
            }
        }
    }
    batch
}

impl CsvMovie {
    /// Validate the record into an insertable movie.
    ///
    /// Missing numeric and text fields default to zero or empty; a missing
    /// title or release date rejects the row.
    pub fn into_movie(self) -> Result<CreateMovie, RowError> {
        let title = non_empty(self.title).ok_or(RowError::MissingTitle)?;
        let release_date = non_empty(self.release_date)
            .ok_or(RowError::MissingReleaseDate)
            .and_then(|raw| parse_release_date(&raw))?;

        let raw_genres = self.genre.unwrap_or_default();
        let genres = parse_genres(&raw_genres);
        if genres.is_empty() {
            tracing::warn!(title = %title, genre = %raw_genres, "Failed to identify movie genre");
        }

        Ok(CreateMovie {
            title,
            overview: self.overview.unwrap_or_default(),
            popularity: parse_number("Popularity", self.popularity)?,
            poster_url: self.poster_url.unwrap_or_default(),
            vote_count: parse_number("Vote_Count", self.vote_count)?,
            vote_average: parse_number("Vote_Average", self.vote_average)?,
            release_date,
            original_language: self.original_language.unwrap_or_default(),
            genres,
        })
    }
}

/// Combine a comma-separated list of dataset labels into a mask.
///
/// Labels are matched case-insensitively; unknown labels are ignored.
pub fn parse_genres(raw: &str) -> GenreMask {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .filter_map(Genre::from_label)
        .collect()
}

/// Accepts `2021-12-15`, RFC 3339, `2021-12-15 08:30:00` and `12/15/2021`.
/// Dates without a time are taken as midnight UTC.
fn parse_release_date(raw: &str) -> Result<Timestamp, RowError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(midnight_utc(date));
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%m/%d/%Y") {
        return Ok(midnight_utc(date));
    }
    Err(RowError::BadReleaseDate(raw.to_string()))
}

fn midnight_utc(date: NaiveDate) -> Timestamp {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

fn parse_number<T>(field: &'static str, raw: Option<String>) -> Result<T, RowError>
where
    T: std::str::FromStr + Default,
{
    match non_empty(raw) {
        None => Ok(T::default()),
        Some(value) => value
            .parse()
            .map_err(|_| RowError::BadNumber { field, value }),
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
