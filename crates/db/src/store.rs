//! [`MovieStore`] backed by PostgreSQL.

use async_trait::async_trait;
use reel_core::error::CoreError;
use reel_core::movie::MovieRecord;
use reel_core::query::{MovieFilter, QueryPlan};
use reel_core::store::MovieStore;
use reel_core::types::DbId;

use crate::error::classify_sqlx_error;
use crate::repositories::MovieRepo;
use crate::DbPool;

/// Serves catalog reads from the `movies` table.
///
/// Every sqlx failure is classified at this boundary, so callers only ever
/// see [`CoreError::StoreUnavailable`] or [`CoreError::Store`].
#[derive(Debug, Clone)]
pub struct PgMovieStore {
    pool: DbPool,
}

impl PgMovieStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn count_matching(&self, filter: &MovieFilter) -> Result<i64, CoreError> {
        MovieRepo::count_matching(&self.pool, filter)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn fetch_page(
        &self,
        plan: &QueryPlan,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<MovieRecord>, CoreError> {
        let rows = MovieRepo::fetch_page(&self.pool, plan, offset, limit)
            .await
            .map_err(classify_sqlx_error)?;
        Ok(rows.into_iter().map(MovieRecord::from).collect())
    }

    async fn fetch_by_id(&self, id: DbId) -> Result<Option<MovieRecord>, CoreError> {
        let row = MovieRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)?;
        Ok(row.map(MovieRecord::from))
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(classify_sqlx_error)
    }
}
