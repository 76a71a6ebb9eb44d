//! Repository for the `movies` table.

use reel_core::query::{MovieFilter, QueryPlan, SortSpec};
use reel_core::search::{SortField, SortOrder};
use reel_core::types::{DbId, Timestamp};
use sqlx::{PgExecutor, PgPool};

use crate::models::movie::{CreateMovie, MovieRow};

/// Column list for `movies` queries.
const COLUMNS: &str = "\
    id, title, overview, popularity, poster_url, vote_count, \
    vote_average, release_date, original_language, genres";

/// All-of genre predicate; `$1 = 0` disables it.
const GENRE_PREDICATE: &str = "($1::INTEGER = 0 OR (genres & $1::INTEGER) = $1::INTEGER)";

/// ORDER BY clause for a sort spec. Ties always break on ascending id.
fn order_clause(sort: &SortSpec) -> &'static str {
    match (sort.field, sort.order) {
        (SortField::Title, SortOrder::Ascending) => "ORDER BY title ASC, id ASC",
        (SortField::Title, SortOrder::Descending) => "ORDER BY title DESC, id ASC",
        (SortField::ReleaseDate, SortOrder::Ascending) => "ORDER BY release_date ASC, id ASC",
        (SortField::ReleaseDate, SortOrder::Descending) => "ORDER BY release_date DESC, id ASC",
    }
}

/// Provides read and bulk-insert operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Count movies matching the filter.
    pub async fn count_matching(pool: &PgPool, filter: &MovieFilter) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM movies WHERE {GENRE_PREDICATE}");
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(filter.required_genres.bits())
            .fetch_one(pool)
            .await
    }

    /// Fetch one page of the plan, in plan order.
    pub async fn fetch_page(
        pool: &PgPool,
        plan: &QueryPlan,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<MovieRow>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM movies WHERE {GENRE_PREDICATE} {} LIMIT $2 OFFSET $3",
            order_clause(&plan.sort)
        );
        sqlx::query_as::<_, MovieRow>(&sql)
            .bind(plan.filter.required_genres.bits())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Find a movie by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MovieRow>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, MovieRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Total number of movies, ignoring any filter.
    pub async fn count_all<'e, E: PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM movies")
            .fetch_one(executor)
            .await
    }

    /// Insert many movies with a single `UNNEST` statement.
    ///
    /// Returns the number of rows inserted.
    pub async fn insert_batch<'e, E: PgExecutor<'e>>(
        executor: E,
        movies: &[CreateMovie],
    ) -> Result<u64, sqlx::Error> {
        if movies.is_empty() {
            return Ok(0);
        }

        let mut titles = Vec::with_capacity(movies.len());
        let mut overviews = Vec::with_capacity(movies.len());
        let mut popularities = Vec::with_capacity(movies.len());
        let mut poster_urls = Vec::with_capacity(movies.len());
        let mut vote_counts = Vec::with_capacity(movies.len());
        let mut vote_averages = Vec::with_capacity(movies.len());
        let mut release_dates: Vec<Timestamp> = Vec::with_capacity(movies.len());
        let mut languages = Vec::with_capacity(movies.len());
        let mut genres = Vec::with_capacity(movies.len());

        for movie in movies {
            titles.push(movie.title.as_str());
            overviews.push(movie.overview.as_str());
            popularities.push(movie.popularity);
            poster_urls.push(movie.poster_url.as_str());
            vote_counts.push(movie.vote_count);
            vote_averages.push(movie.vote_average);
            release_dates.push(movie.release_date);
            languages.push(movie.original_language.as_str());
            genres.push(movie.genres.bits());
        }

        let result = sqlx::query(
            "INSERT INTO movies \
                (title, overview, popularity, poster_url, vote_count, \
                 vote_average, release_date, original_language, genres) \
             SELECT * FROM UNNEST(\
                $1::TEXT[], $2::TEXT[], $3::REAL[], $4::TEXT[], $5::INTEGER[], \
                $6::DOUBLE PRECISION[], $7::TIMESTAMPTZ[], $8::TEXT[], $9::INTEGER[])",
        )
        .bind(&titles)
        .bind(&overviews)
        .bind(&popularities)
        .bind(&poster_urls)
        .bind(&vote_counts)
        .bind(&vote_averages)
        .bind(&release_dates)
        .bind(&languages)
        .bind(&genres)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
