//! Closed vocabulary of seat categories (instruments).
//!
//! Names resolve case-insensitively through a fixed table: canonical
//! snake_case names, a few aliases, and the icon asset stems. Anything else
//! is a `CategoryError::Unknown`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Label attached to one seat slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Unlabelled seat.
    Seat,
    /// Slot kept free: placed and counted, drawn as "no seat".
    Reserved,
    BassClarinet,
    Bassoon,
    Clarinet,
    Euphonium,
    Flute,
    Horn,
    Oboe,
    Piccolo,
    Trombone,
    Saxophone,
    Trumpet,
    Tuba,
    Timpani,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    #[error("unknown seat category: {0:?}")]
    Unknown(String),
}

const ALIASES: &[(&str, Category)] = &[
    ("default", Category::Seat),
    ("none", Category::Reserved),
    ("nothing", Category::Reserved),
    ("no_instrument", Category::Reserved),
    ("bassclarinet", Category::BassClarinet),
    ("sax", Category::Saxophone),
    ("picolo", Category::Piccolo),
    ("timpano", Category::Timpani),
];

impl Category {
    pub const ALL: [Category; 15] = [
        Category::Seat,
        Category::Reserved,
        Category::BassClarinet,
        Category::Bassoon,
        Category::Clarinet,
        Category::Euphonium,
        Category::Flute,
        Category::Horn,
        Category::Oboe,
        Category::Piccolo,
        Category::Trombone,
        Category::Saxophone,
        Category::Trumpet,
        Category::Tuba,
        Category::Timpani,
    ];

    /// Canonical snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Category::Seat => "seat",
            Category::Reserved => "reserved",
            Category::BassClarinet => "bass_clarinet",
            Category::Bassoon => "bassoon",
            Category::Clarinet => "clarinet",
            Category::Euphonium => "euphonium",
            Category::Flute => "flute",
            Category::Horn => "horn",
            Category::Oboe => "oboe",
            Category::Piccolo => "piccolo",
            Category::Trombone => "trombone",
            Category::Saxophone => "saxophone",
            Category::Trumpet => "trumpet",
            Category::Tuba => "tuba",
            Category::Timpani => "timpani",
        }
    }

    /// Icon asset key for renderers that draw instrument pictures.
    /// `None` for a plain seat, which is drawn as an empty disk.
    pub fn asset_stem(self) -> Option<&'static str> {
        Some(match self {
            Category::Seat => return None,
            Category::Reserved => "NO_INSTRUMENT",
            Category::BassClarinet => "BKLARINETTE",
            Category::Bassoon => "FAGOTTE",
            Category::Clarinet => "KLARINETTE",
            Category::Euphonium => "EUPHONIUM",
            Category::Flute => "FLOETE",
            Category::Horn => "HORN",
            Category::Oboe => "OBOE",
            Category::Piccolo => "PICCOLO",
            Category::Trombone => "POSAUNE",
            Category::Saxophone => "SAX",
            Category::Trumpet => "TROMPETE",
            Category::Tuba => "TUBA",
            Category::Timpani => "PAUKE",
        })
    }

    /// Strict lookup.
    pub fn from_name(name: &str) -> Result<Self, CategoryError> {
        let key = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.name() == key)
            .or_else(|| ALIASES.iter().find(|(alias, _)| *alias == key).map(|&(_, c)| c))
            .or_else(|| {
                Category::ALL
                    .iter()
                    .copied()
                    .find(|c| c.asset_stem().is_some_and(|s| s.eq_ignore_ascii_case(name.trim())))
            })
            .ok_or_else(|| CategoryError::Unknown(name.to_string()))
    }

    /// Lenient lookup: unknown names become `Category::Seat` with a warning.
    pub fn resolve_or_default(name: &str) -> Self {
        Category::from_name(name).unwrap_or_else(|err| {
            warn!(%err, "substituting default seat");
            Category::Seat
        })
    }
}

impl FromStr for Category {
    type Err = CategoryError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_name(s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
