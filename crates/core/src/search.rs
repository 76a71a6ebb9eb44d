//! Search request parameters and their validation.
//!
//! Raw query-string values are collected into [`RawSearchParams`] and turned
//! into an immutable [`SearchRequest`] by [`validate_search`]. Validation never
//! stops at the first problem: every parameter is checked and all field errors
//! are returned together.

use std::collections::BTreeSet;

use validator::Validate;

use crate::error::{CoreError, FieldError};
use crate::genre::Genre;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: i64 = 64;

/// Largest number of `genres` tokens accepted in one request.
pub const MAX_GENRE_TOKENS: usize = 32;

// Public parameter names, as reported in field errors.
pub const FIELD_PAGE: &str = "page";
pub const FIELD_PAGE_SIZE: &str = "pageSize";
pub const FIELD_SORT_BY: &str = "sortBy";
pub const FIELD_ORDER_BY: &str = "orderBy";
pub const FIELD_GENRES: &str = "genres";

// ---------------------------------------------------------------------------
// Sort field / order
// ---------------------------------------------------------------------------

/// Column a search is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    #[default]
    Title,
    ReleaseDate,
}

/// Direction of the ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// An enum that is written as a fixed lowercase, hyphenated token in URLs.
pub trait TokenEnum: Copy + 'static {
    /// Every accepted value.
    const VARIANTS: &'static [Self];

    /// The URL token of this value.
    fn token(self) -> &'static str;
}

impl TokenEnum for SortField {
    const VARIANTS: &'static [Self] = &[SortField::Title, SortField::ReleaseDate];

    fn token(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::ReleaseDate => "release-date",
        }
    }
}

impl TokenEnum for SortOrder {
    const VARIANTS: &'static [Self] = &[SortOrder::Ascending, SortOrder::Descending];

    fn token(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

impl TokenEnum for Genre {
    const VARIANTS: &'static [Self] = &Genre::ALL;

    fn token(self) -> &'static str {
        self.slug()
    }
}

/// Parse a URL token into `T`, ignoring ASCII case.
pub fn parse_token<T: TokenEnum>(raw: &str) -> Option<T> {
    T::VARIANTS
        .iter()
        .copied()
        .find(|variant| variant.token().eq_ignore_ascii_case(raw))
}

fn expected_tokens<T: TokenEnum>() -> String {
    T::VARIANTS
        .iter()
        .map(|variant| variant.token())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Raw parameters
// ---------------------------------------------------------------------------

/// Query parameters as received, before any parsing.
///
/// Names are matched case-insensitively. For single-valued parameters the
/// first occurrence wins; `genres` keeps every occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSearchParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort_by: Option<String>,
    pub order_by: Option<String>,
    pub genres: Vec<String>,
}

impl RawSearchParams {
    /// Collect recognised parameters from decoded `(name, value)` pairs.
    /// Unrecognised names are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = RawSearchParams::default();
        for (name, value) in pairs {
            let slot = match name.as_ref().to_ascii_lowercase().as_str() {
                "page" => &mut raw.page,
                "pagesize" => &mut raw.page_size,
                "sortby" => &mut raw.sort_by,
                "orderby" => &mut raw.order_by,
                "genres" => {
                    raw.genres.push(value.into());
                    continue;
                }
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        raw
    }
}

// ---------------------------------------------------------------------------
// Validated request
// ---------------------------------------------------------------------------

/// A validated catalog search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    page: i64,
    page_size: i64,
    sort_field: SortField,
    sort_order: SortOrder,
    genres: BTreeSet<Genre>,
}

impl SearchRequest {
    /// Zero-based page index.
    pub fn page(&self) -> i64 {
        self.page
    }

    /// Records per page, within `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn sort_field(&self) -> SortField {
        self.sort_field
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Requested genres; a matching movie must carry all of them.
    pub fn genres(&self) -> &BTreeSet<Genre> {
        &self.genres
    }

    /// Index of the first record on the requested page.
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.page_size)
    }
}

/// Numeric bounds, checked declaratively once the values have parsed.
///
/// Messages are built in [`bound_message`] so they always quote the limits
/// actually enforced.
#[derive(Debug, Validate)]
struct PageBounds {
    #[validate(range(min = 0))]
    page: Option<i64>,
    #[validate(range(min = 1, max = MAX_PAGE_SIZE))]
    page_size: Option<i64>,
}

fn bound_message(field: &str) -> String {
    if field == FIELD_PAGE_SIZE {
        format!("{FIELD_PAGE_SIZE} must be between 1 and {MAX_PAGE_SIZE}")
    } else {
        format!("{field} must be zero or greater")
    }
}

/// Validate raw parameters into a [`SearchRequest`].
///
/// Returns [`CoreError::Validation`] carrying every field error when any
/// parameter is missing or malformed.
pub fn validate_search(raw: &RawSearchParams) -> Result<SearchRequest, CoreError> {
    let mut errors = Vec::new();

    let page = parse_integer(FIELD_PAGE, raw.page.as_deref(), &mut errors);
    let page_size = parse_integer(FIELD_PAGE_SIZE, raw.page_size.as_deref(), &mut errors);
    check_bounds(page, page_size, &mut errors);

    let sort_field =
        parse_optional_token::<SortField>(FIELD_SORT_BY, raw.sort_by.as_deref(), &mut errors);
    let sort_order =
        parse_optional_token::<SortOrder>(FIELD_ORDER_BY, raw.order_by.as_deref(), &mut errors);
    let genres = parse_genres(&raw.genres, &mut errors);

    match (page, page_size) {
        (Some(page), Some(page_size)) if errors.is_empty() => Ok(SearchRequest {
            page,
            page_size,
            sort_field,
            sort_order,
            genres,
        }),
        _ => Err(CoreError::Validation(errors)),
    }
}

fn parse_integer(field: &str, raw: Option<&str>, errors: &mut Vec<FieldError>) -> Option<i64> {
    let value = match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => {
            errors.push(FieldError::new(field, format!("{field} is required")));
            return None;
        }
    };

    match value.parse::<i64>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.push(FieldError::new(
                field,
                format!("{field} must be an integer, got '{value}'"),
            ));
            None
        }
    }
}

fn check_bounds(page: Option<i64>, page_size: Option<i64>, errors: &mut Vec<FieldError>) {
    let Err(report) = (PageBounds { page, page_size }).validate() else {
        return;
    };

    let by_field = report.field_errors();
    for (name, public) in [("page", FIELD_PAGE), ("page_size", FIELD_PAGE_SIZE)] {
        if by_field.contains_key(name) {
            errors.push(FieldError::new(public, bound_message(public)));
        }
    }
}

fn parse_optional_token<T: TokenEnum + Default>(
    field: &str,
    raw: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> T {
    let value = match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return T::default(),
    };

    parse_token(value).unwrap_or_else(|| {
        errors.push(FieldError::new(
            field,
            format!(
                "'{value}' is not a valid {field}, expected one of: {}",
                expected_tokens::<T>()
            ),
        ));
        T::default()
    })
}

fn parse_genres(tokens: &[String], errors: &mut Vec<FieldError>) -> BTreeSet<Genre> {
    let tokens: Vec<&str> = tokens
        .iter()
        .map(|token| token.trim())
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.len() > MAX_GENRE_TOKENS {
        errors.push(FieldError::new(
            FIELD_GENRES,
            format!(
                "at most {MAX_GENRE_TOKENS} genres may be given, got {}",
                tokens.len()
            ),
        ));
    }

    let mut genres = BTreeSet::new();
    for token in tokens {
        match parse_token::<Genre>(token) {
            Some(genre) => {
                genres.insert(genre);
            }
            None => errors.push(FieldError::new(
                FIELD_GENRES,
                format!("'{token}' is not a valid genre"),
            )),
        }
    }
    genres
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
