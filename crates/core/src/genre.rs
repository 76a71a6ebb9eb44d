//! Movie genres and their bitflag storage encoding.
//!
//! A movie's genre set is persisted as a single `INTEGER` column where each
//! bit marks membership of one [`Genre`]. The bit assigned to each genre is
//! fixed by [`Genre::bit`] and must never change once data exists; decoding
//! ignores bits that do not belong to a known genre.

use std::fmt;
use std::ops::BitOrAssign;

use bitflags::bitflags;
use serde::{Serialize, Serializer};

/// A single movie genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Genre {
    Action,
    Adventure,
    ScienceFiction,
    Crime,
    Mystery,
    Thriller,
    Animation,
    Comedy,
    Family,
    Fantasy,
    War,
    Horror,
    Drama,
    Music,
    Romance,
    Western,
    History,
    TvMovie,
    Documentary,
}

impl Genre {
    /// Every genre, in bit order.
    pub const ALL: [Genre; 19] = [
        Genre::Action,
        Genre::Adventure,
        Genre::ScienceFiction,
        Genre::Crime,
        Genre::Mystery,
        Genre::Thriller,
        Genre::Animation,
        Genre::Comedy,
        Genre::Family,
        Genre::Fantasy,
        Genre::War,
        Genre::Horror,
        Genre::Drama,
        Genre::Music,
        Genre::Romance,
        Genre::Western,
        Genre::History,
        Genre::TvMovie,
        Genre::Documentary,
    ];

    /// The storage bit for this genre.
    ///
    /// These values are persisted. Append new genres at bit 19 and above;
    /// never renumber an existing entry.
    pub const fn bit(self) -> i32 {
        match self {
            Genre::Action => 1 << 0,
            Genre::Adventure => 1 << 1,
            Genre::ScienceFiction => 1 << 2,
            Genre::Crime => 1 << 3,
            Genre::Mystery => 1 << 4,
            Genre::Thriller => 1 << 5,
            Genre::Animation => 1 << 6,
            Genre::Comedy => 1 << 7,
            Genre::Family => 1 << 8,
            Genre::Fantasy => 1 << 9,
            Genre::War => 1 << 10,
            Genre::Horror => 1 << 11,
            Genre::Drama => 1 << 12,
            Genre::Music => 1 << 13,
            Genre::Romance => 1 << 14,
            Genre::Western => 1 << 15,
            Genre::History => 1 << 16,
            Genre::TvMovie => 1 << 17,
            Genre::Documentary => 1 << 18,
        }
    }

    /// Canonical lowercase, hyphenated name used in URLs and JSON.
    pub const fn slug(self) -> &'static str {
        match self {
            Genre::Action => "action",
            Genre::Adventure => "adventure",
            Genre::ScienceFiction => "science-fiction",
            Genre::Crime => "crime",
            Genre::Mystery => "mystery",
            Genre::Thriller => "thriller",
            Genre::Animation => "animation",
            Genre::Comedy => "comedy",
            Genre::Family => "family",
            Genre::Fantasy => "fantasy",
            Genre::War => "war",
            Genre::Horror => "horror",
            Genre::Drama => "drama",
            Genre::Music => "music",
            Genre::Romance => "romance",
            Genre::Western => "western",
            Genre::History => "history",
            Genre::TvMovie => "tv-movie",
            Genre::Documentary => "documentary",
        }
    }

    /// Parse a hyphenated genre name, ignoring ASCII case.
    ///
    /// `"science-fiction"` and `"Science-Fiction"` match; `"sciencefiction"`
    /// does not.
    pub fn from_slug(token: &str) -> Option<Genre> {
        Genre::ALL
            .into_iter()
            .find(|genre| genre.slug().eq_ignore_ascii_case(token))
    }

    /// Parse a human-readable dataset label such as `"Science Fiction"` or
    /// `"TV Movie"`.
    pub fn from_label(label: &str) -> Option<Genre> {
        let slug = label.split_whitespace().collect::<Vec<_>>().join("-");
        Genre::from_slug(&slug)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl Serialize for Genre {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}

/// Canonical names of all genres, in bit order.
pub fn genre_slugs() -> Vec<&'static str> {
    Genre::ALL.into_iter().map(Genre::slug).collect()
}

// ---------------------------------------------------------------------------
// GenreMask
// ---------------------------------------------------------------------------

bitflags! {
    /// A set of genres packed into the persisted integer column.
    ///
    /// Column values are wrapped with [`GenreMask::from_bits_retain`]: unknown
    /// bits are kept but never decoded.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GenreMask: i32 {
        const ACTION = Genre::Action.bit();
        const ADVENTURE = Genre::Adventure.bit();
        const SCIENCE_FICTION = Genre::ScienceFiction.bit();
        const CRIME = Genre::Crime.bit();
        const MYSTERY = Genre::Mystery.bit();
        const THRILLER = Genre::Thriller.bit();
        const ANIMATION = Genre::Animation.bit();
        const COMEDY = Genre::Comedy.bit();
        const FAMILY = Genre::Family.bit();
        const FANTASY = Genre::Fantasy.bit();
        const WAR = Genre::War.bit();
        const HORROR = Genre::Horror.bit();
        const DRAMA = Genre::Drama.bit();
        const MUSIC = Genre::Music.bit();
        const ROMANCE = Genre::Romance.bit();
        const WESTERN = Genre::Western.bit();
        const HISTORY = Genre::History.bit();
        const TV_MOVIE = Genre::TvMovie.bit();
        const DOCUMENTARY = Genre::Documentary.bit();
    }
}

impl GenreMask {
    /// Decode into individual genres, lowest bit first.
    ///
    /// Bits that do not correspond to a known genre are skipped.
    pub fn genres(self) -> Vec<Genre> {
        Genre::ALL
            .into_iter()
            .filter(|genre| self.bits() & genre.bit() != 0)
            .collect()
    }
}

impl Default for GenreMask {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Genre> for GenreMask {
    fn from(genre: Genre) -> Self {
        Self::from_bits_retain(genre.bit())
    }
}

impl BitOrAssign<Genre> for GenreMask {
    fn bitor_assign(&mut self, genre: Genre) {
        *self |= GenreMask::from(genre);
    }
}

impl FromIterator<Genre> for GenreMask {
    fn from_iter<I: IntoIterator<Item = Genre>>(iter: I) -> Self {
        let mut mask = GenreMask::empty();
        for genre in iter {
            mask |= genre;
        }
        mask
    }
}

impl<'a> FromIterator<&'a Genre> for GenreMask {
    fn from_iter<I: IntoIterator<Item = &'a Genre>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
