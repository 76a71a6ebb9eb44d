//! Query plans for catalog searches.
//!
//! A [`QueryPlan`] is the filter and ordering of a search without any
//! offset or limit, so the total count and the page fetch are computed from
//! the same predicate.

use std::cmp::Ordering;

use crate::genre::GenreMask;
use crate::movie::MovieRecord;
use crate::search::{SearchRequest, SortField, SortOrder};

/// Restricts the catalog to movies carrying every required genre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovieFilter {
    pub required_genres: GenreMask,
}

impl MovieFilter {
    /// Matches every movie.
    pub const ALL: MovieFilter = MovieFilter {
        required_genres: GenreMask::empty(),
    };

    /// `true` when the filter restricts nothing.
    pub fn is_unfiltered(&self) -> bool {
        self.required_genres.is_empty()
    }

    /// All-of semantics: `(mask & required) == required`.
    pub fn matches(&self, record: &MovieRecord) -> bool {
        record.genres.contains(self.required_genres)
    }
}

/// Primary ordering of a search. Ties are always broken by ascending id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    /// Compare two records in plan order, including the id tie-break.
    pub fn compare(&self, a: &MovieRecord, b: &MovieRecord) -> Ordering {
        let primary = match self.field {
            SortField::Title => a.title.cmp(&b.title),
            SortField::ReleaseDate => a.release_date.cmp(&b.release_date),
        };
        let primary = match self.order {
            SortOrder::Ascending => primary,
            SortOrder::Descending => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// Filter plus ordering, shared by the count and the page fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryPlan {
    pub filter: MovieFilter,
    pub sort: SortSpec,
}

impl QueryPlan {
    /// Build the plan for a validated request.
    pub fn for_request(request: &SearchRequest) -> Self {
        Self {
            filter: MovieFilter {
                required_genres: request.genres().iter().collect(),
            },
            sort: SortSpec {
                field: request.sort_field(),
                order: request.sort_order(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::genre::Genre;
    use crate::search::{validate_search, RawSearchParams};

    fn record(id: i64, title: &str, year: i32, genres: &[Genre]) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            overview: String::new(),
            popularity: 0.0,
            poster_url: String::new(),
            vote_count: 0,
            vote_average: 0.0,
            release_date: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
            original_language: "en".to_string(),
            genres: genres.iter().collect(),
        }
    }

    fn request(pairs: &[(&str, &str)]) -> SearchRequest {
        validate_search(&RawSearchParams::from_pairs(pairs.iter().copied())).unwrap()
    }

    #[test]
    fn plan_without_genres_is_unfiltered() {
        let plan = QueryPlan::for_request(&request(&[("page", "0"), ("pagesize", "5")]));
        assert!(plan.filter.is_unfiltered());
        assert_eq!(plan.sort, SortSpec::default());
    }

    #[test]
    fn plan_combines_requested_genres() {
        let plan = QueryPlan::for_request(&request(&[
            ("page", "0"),
            ("pagesize", "5"),
            ("genres", "adventure"),
            ("genres", "action"),
            ("sortby", "release-date"),
            ("orderby", "desc"),
        ]));
        assert_eq!(
            plan.filter.required_genres.bits(),
            Genre::Action.bit() | Genre::Adventure.bit()
        );
        assert_eq!(plan.sort.field, SortField::ReleaseDate);
        assert_eq!(plan.sort.order, SortOrder::Descending);
    }

    #[test]
    fn filter_requires_all_genres() {
        let r1 = record(1, "One", 2000, &[Genre::Action]);
        let r2 = record(2, "Two", 2000, &[Genre::Action, Genre::Adventure]);
        let r3 = record(3, "Three", 2000, &[Genre::Adventure]);

        let filter = MovieFilter {
            required_genres: [Genre::Action, Genre::Adventure].into_iter().collect(),
        };
        let matched: Vec<i64> = [&r1, &r2, &r3]
            .into_iter()
            .filter(|r| filter.matches(r))
            .map(|r| r.id)
            .collect();
        assert_eq!(matched, vec![2]);

        assert!(
            [&r1, &r2, &r3].into_iter().all(|r| MovieFilter::ALL.matches(r))
        );
    }

    #[test]
    fn title_ties_break_on_id_in_both_directions() {
        let a = record(7, "Same", 2001, &[]);
        let b = record(3, "Same", 1999, &[]);

        let asc = SortSpec {
            field: SortField::Title,
            order: SortOrder::Ascending,
        };
        let desc = SortSpec {
            field: SortField::Title,
            order: SortOrder::Descending,
        };
        assert_eq!(asc.compare(&b, &a), Ordering::Less);
        assert_eq!(desc.compare(&b, &a), Ordering::Less);
    }

    #[test]
    fn titles_compare_bytewise() {
        let lower = record(1, "apple", 2000, &[]);
        let upper = record(2, "Zebra", 2000, &[]);
        let accented = record(3, "Éclair", 2000, &[]);

        let asc = SortSpec::default();
        assert_eq!(asc.compare(&upper, &lower), Ordering::Less);
        assert_eq!(asc.compare(&lower, &accented), Ordering::Less);
    }

    #[test]
    fn release_date_orders_chronologically() {
        let old = record(1, "B", 1980, &[]);
        let new = record(2, "A", 2020, &[]);
        let spec = SortSpec {
            field: SortField::ReleaseDate,
            order: SortOrder::Descending,
        };
        assert_eq!(spec.compare(&new, &old), Ordering::Less);
    }
}
