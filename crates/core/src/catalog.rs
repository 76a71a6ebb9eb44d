//! Catalog operations: paginated search, lookup by id, genre listing.
//!
//! Every operation takes a [`CancellationToken`]; once it fires, pending
//! store calls are dropped and [`CoreError::Cancelled`] is returned without
//! partial results.

use tokio_util::sync::CancellationToken;

use crate::error::CoreError;
use crate::genre::genre_slugs;
use crate::movie::{Movie, MovieRecord, PaginatedMovies};
use crate::query::QueryPlan;
use crate::search::SearchRequest;
use crate::store::MovieStore;
use crate::types::DbId;

/// Run a validated search and assemble the response page.
pub async fn search_movies(
    store: &dyn MovieStore,
    request: &SearchRequest,
    cancel: &CancellationToken,
) -> Result<PaginatedMovies, CoreError> {
    let plan = QueryPlan::for_request(request);
    let (total_records, records) =
        execute_page(store, &plan, request.offset(), request.page_size(), cancel).await?;

    tracing::debug!(
        page = request.page(),
        page_size = request.page_size(),
        genres = plan.filter.required_genres.bits(),
        total_records,
        returned = records.len(),
        "Movie search executed",
    );

    Ok(PaginatedMovies::assemble(request, total_records, records))
}

/// Count the plan's matches and fetch one page of it.
///
/// Both queries use the same filter and are issued concurrently. They are
/// not run in a shared snapshot, so a concurrent writer can make the count
/// and the page disagree slightly. An offset past the end yields an empty
/// page.
pub async fn execute_page(
    store: &dyn MovieStore,
    plan: &QueryPlan,
    offset: i64,
    limit: i64,
    cancel: &CancellationToken,
) -> Result<(i64, Vec<MovieRecord>), CoreError> {
    let work = async {
        tokio::try_join!(
            store.count_matching(&plan.filter),
            store.fetch_page(plan, offset, limit),
        )
    };

    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(CoreError::Cancelled),
        result = work => result,
    }
}

/// Look up a single movie. `Ok(None)` when no movie has this id.
pub async fn find_movie(
    store: &dyn MovieStore,
    id: DbId,
    cancel: &CancellationToken,
) -> Result<Option<Movie>, CoreError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(CoreError::Cancelled),
        result = store.fetch_by_id(id) => result.map(|found| found.map(Movie::from)),
    }
}

/// Canonical names of every genre accepted by the `genres` filter.
pub fn list_genres() -> Vec<&'static str> {
    genre_slugs()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::genre::{Genre, GenreMask};
    use crate::query::MovieFilter;
    use crate::search::{validate_search, RawSearchParams};
    use crate::store::MemoryMovieStore;

    fn record(id: i64, title: &str, genres: &[Genre]) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            overview: format!("Overview of {title}"),
            popularity: id as f32,
            poster_url: format!("https://image.example/{id}.jpg"),
            vote_count: 100,
            vote_average: 6.5,
            release_date: Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
                + Duration::days(id),
            original_language: "en".to_string(),
            genres: genres.iter().collect(),
        }
    }

    fn request(pairs: &[(&str, &str)]) -> SearchRequest {
        validate_search(&RawSearchParams::from_pairs(pairs.iter().copied())).unwrap()
    }

    fn ten_movies() -> MemoryMovieStore {
        MemoryMovieStore::new(
            (1..=10)
                .map(|i| record(i, &format!("Movie {i:02}"), &[Genre::Drama]))
                .collect(),
        )
    }

    fn titles(page: &PaginatedMovies) -> Vec<&str> {
        page.records.iter().map(|m| m.title.as_str()).collect()
    }

    // -- pagination ----------------------------------------------------------

    #[tokio::test]
    async fn partial_last_page() {
        let store = ten_movies();
        let cancel = CancellationToken::new();

        let page = search_movies(
            &store,
            &request(&[("page", "2"), ("pagesize", "4")]),
            &cancel,
        )
        .await
        .unwrap();

        assert_eq!(page.pagination.total_records, 10);
        assert_eq!(page.pagination.page, 2);
        assert_eq!(page.pagination.page_size, 4);
        assert_eq!(titles(&page), vec!["Movie 09", "Movie 10"]);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let store = ten_movies();
        let cancel = CancellationToken::new();

        let page = search_movies(
            &store,
            &request(&[("page", "3"), ("pagesize", "4")]),
            &cancel,
        )
        .await
        .unwrap();

        assert_eq!(page.pagination.total_records, 10);
        assert!(page.records.is_empty());
    }

    #[tokio::test]
    async fn descending_release_date() {
        let store = ten_movies();
        let cancel = CancellationToken::new();

        let page = search_movies(
            &store,
            &request(&[
                ("page", "0"),
                ("pagesize", "3"),
                ("sortby", "release-date"),
                ("orderby", "desc"),
            ]),
            &cancel,
        )
        .await
        .unwrap();

        assert_eq!(titles(&page), vec!["Movie 10", "Movie 09", "Movie 08"]);
    }

    // -- filtering -----------------------------------------------------------

    #[tokio::test]
    async fn genre_filter_requires_every_genre() {
        let store = MemoryMovieStore::new(vec![
            record(1, "R1", &[Genre::Action]),
            record(2, "R2", &[Genre::Action, Genre::Adventure]),
            record(3, "R3", &[Genre::Adventure]),
        ]);
        let cancel = CancellationToken::new();

        let page = search_movies(
            &store,
            &request(&[
                ("page", "0"),
                ("pagesize", "10"),
                ("genres", "action"),
                ("genres", "adventure"),
            ]),
            &cancel,
        )
        .await
        .unwrap();

        assert_eq!(page.pagination.total_records, 1);
        assert_eq!(titles(&page), vec!["R2"]);
        assert_eq!(
            page.records[0].genres,
            vec![Genre::Action, Genre::Adventure]
        );
    }

    #[tokio::test]
    async fn total_counts_the_filtered_set_not_the_page() {
        let store = MemoryMovieStore::new(
            (1..=20)
                .map(|i| {
                    let genres: &[Genre] = if i % 2 == 0 { &[Genre::Comedy] } else { &[] };
                    record(i, &format!("M{i:02}"), genres)
                })
                .collect(),
        );
        let cancel = CancellationToken::new();

        let page = search_movies(
            &store,
            &request(&[("page", "0"), ("pagesize", "3"), ("genres", "comedy")]),
            &cancel,
        )
        .await
        .unwrap();

        assert_eq!(page.pagination.total_records, 10);
        assert_eq!(page.records.len(), 3);
    }

    // -- ordering ------------------------------------------------------------

    #[tokio::test]
    async fn equal_titles_keep_a_stable_order() {
        let store = MemoryMovieStore::new(vec![
            record(5, "Twin", &[]),
            record(2, "Twin", &[]),
            record(9, "Twin", &[]),
            record(1, "Alpha", &[]),
        ]);
        let cancel = CancellationToken::new();
        let req = request(&[("page", "0"), ("pagesize", "10")]);

        let first = search_movies(&store, &req, &cancel).await.unwrap();
        let ids: Vec<i64> = first.records.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 5, 9]);

        for _ in 0..5 {
            let again = search_movies(&store, &req, &cancel).await.unwrap();
            assert_eq!(again, first);
        }
    }

    #[tokio::test]
    async fn tied_titles_do_not_repeat_across_pages() {
        let store = MemoryMovieStore::new((1..=6).map(|i| record(i, "Same", &[])).collect());
        let cancel = CancellationToken::new();

        let mut seen = Vec::new();
        for page in 0..3 {
            let page = page.to_string();
            let result = search_movies(
                &store,
                &request(&[("page", page.as_str()), ("pagesize", "2")]),
                &cancel,
            )
            .await
            .unwrap();
            seen.extend(result.records.into_iter().map(|m| m.id));
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6]);
    }

    // -- lookup / listing ----------------------------------------------------

    #[tokio::test]
    async fn find_movie_by_id() {
        let store = ten_movies();
        let cancel = CancellationToken::new();

        let movie = find_movie(&store, 4, &cancel).await.unwrap().unwrap();
        assert_eq!(movie.title, "Movie 04");
        assert_eq!(movie.genres, vec![Genre::Drama]);

        assert!(find_movie(&store, 404, &cancel).await.unwrap().is_none());
    }

    #[test]
    fn genre_listing_is_canonical() {
        let genres = list_genres();
        assert_eq!(genres.len(), 19);
        assert!(genres.contains(&"science-fiction"));
        assert!(genres.contains(&"tv-movie"));
    }

    // -- failures ------------------------------------------------------------

    /// A store whose queries never complete and count how often they start.
    #[derive(Default)]
    struct StalledStore {
        started: AtomicUsize,
    }

    #[async_trait]
    impl MovieStore for StalledStore {
        async fn count_matching(&self, _filter: &MovieFilter) -> Result<i64, CoreError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }

        async fn fetch_page(
            &self,
            _plan: &QueryPlan,
            _offset: i64,
            _limit: i64,
        ) -> Result<Vec<MovieRecord>, CoreError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }

        async fn fetch_by_id(&self, _id: DbId) -> Result<Option<MovieRecord>, CoreError> {
            std::future::pending().await
        }

        async fn ping(&self) -> Result<(), CoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn cancellation_aborts_pending_queries() {
        let store = StalledStore::default();
        let cancel = CancellationToken::new();
        let req = request(&[("page", "0"), ("pagesize", "1")]);

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = search_movies(&store, &req, &cancel).await;
        assert_matches!(result, Err(CoreError::Cancelled));
        assert_eq!(store.started.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn already_cancelled_lookup_returns_immediately() {
        let store = StalledStore::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_matches!(
            find_movie(&store, 1, &cancel).await,
            Err(CoreError::Cancelled)
        );
    }

    /// A store that is unreachable.
    struct DownStore;

    #[async_trait]
    impl MovieStore for DownStore {
        async fn count_matching(&self, _filter: &MovieFilter) -> Result<i64, CoreError> {
            Err(CoreError::StoreUnavailable("connection refused".into()))
        }

        async fn fetch_page(
            &self,
            _plan: &QueryPlan,
            _offset: i64,
            _limit: i64,
        ) -> Result<Vec<MovieRecord>, CoreError> {
            Ok(Vec::new())
        }

        async fn fetch_by_id(&self, _id: DbId) -> Result<Option<MovieRecord>, CoreError> {
            Err(CoreError::Store("syntax error".into()))
        }

        async fn ping(&self) -> Result<(), CoreError> {
            Err(CoreError::StoreUnavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn store_errors_propagate_unchanged() {
        let cancel = CancellationToken::new();
        let req = request(&[("page", "0"), ("pagesize", "1")]);

        assert_matches!(
            search_movies(&DownStore, &req, &cancel).await,
            Err(CoreError::StoreUnavailable(_))
        );
        assert_matches!(
            find_movie(&DownStore, 1, &cancel).await,
            Err(CoreError::Store(_))
        );
    }

    #[test]
    fn unknown_stored_bits_are_ignored_on_mapping() {
        let mut raw = record(1, "Odd", &[Genre::War]);
        raw.genres = GenreMask::from_bits_retain(raw.genres.bits() | (1 << 24));
        assert_eq!(Movie::from(raw).genres, vec![Genre::War]);
    }
}
