//! Read access to persisted movies.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::movie::MovieRecord;
use crate::query::{MovieFilter, QueryPlan};
use crate::types::DbId;

/// The read operations the catalog needs from its backing store.
///
/// Implementations classify their own failures into
/// [`CoreError::StoreUnavailable`] or [`CoreError::Store`].
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Number of movies matching `filter`.
    async fn count_matching(&self, filter: &MovieFilter) -> Result<i64, CoreError>;

    /// Up to `limit` movies starting at `offset`, in plan order.
    async fn fetch_page(
        &self,
        plan: &QueryPlan,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<MovieRecord>, CoreError>;

    async fn fetch_by_id(&self, id: DbId) -> Result<Option<MovieRecord>, CoreError>;

    /// Reachability check used by the health endpoint.
    async fn ping(&self) -> Result<(), CoreError>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// A [`MovieStore`] over a vector, for tests and local tooling.
#[derive(Debug, Default)]
pub struct MemoryMovieStore {
    records: RwLock<Vec<MovieRecord>>,
}

impl MemoryMovieStore {
    pub fn new(records: Vec<MovieRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn insert(&self, record: MovieRecord) {
        self.records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record);
    }

    fn matching(&self, filter: &MovieFilter) -> Vec<MovieRecord> {
        self.records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn count_matching(&self, filter: &MovieFilter) -> Result<i64, CoreError> {
        Ok(self.matching(filter).len() as i64)
    }

    async fn fetch_page(
        &self,
        plan: &QueryPlan,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<MovieRecord>, CoreError> {
        let mut records = self.matching(&plan.filter);
        records.sort_by(|a, b| plan.sort.compare(a, b));

        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(records.into_iter().skip(offset).take(limit).collect())
    }

    async fn fetch_by_id(&self, id: DbId) -> Result<Option<MovieRecord>, CoreError> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
