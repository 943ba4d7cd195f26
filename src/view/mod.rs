//! Views - filtered, sorted projections over the canonical collection.
//!
//! A projection borrows the collection it was built from, so it cannot
//! outlive the next mutation. Rebuild it after any change.

mod stats;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::entry::{EntryId, FeedbackEntry, Rating};

pub use stats::FeedbackStats;

/// Which ratings a projection keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterMode {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "4+")]
    FourPlus,
    #[serde(rename = "5")]
    FiveOnly,
}

impl FilterMode {
    pub fn matches(self, rating: Rating) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::FourPlus => rating.get() >= 4,
            FilterMode::FiveOnly => rating.get() == 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::FourPlus => "4+",
            FilterMode::FiveOnly => "5",
        }
    }
}

impl FromStr for FilterMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(FilterMode::All),
            "4+" => Ok(FilterMode::FourPlus),
            "5" => Ok(FilterMode::FiveOnly),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// Ordering of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    #[serde(rename = "highest")]
    HighestRated,
    #[serde(rename = "lowest")]
    LowestRated,
}

impl SortMode {
    /// Comparator for this mode. Entries that compare equal keep their
    /// collection order because projections use a stable sort.
    pub fn compare(self, a: &FeedbackEntry, b: &FeedbackEntry) -> Ordering {
        match self {
            SortMode::Newest => b.created_at.cmp(&a.created_at),
            SortMode::Oldest => a.created_at.cmp(&b.created_at),
            SortMode::HighestRated => b.rating.cmp(&a.rating),
            SortMode::LowestRated => a.rating.cmp(&b.rating),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
            SortMode::HighestRated => "highest",
            SortMode::LowestRated => "lowest",
        }
    }
}

impl FromStr for SortMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            "highest" => Ok(SortMode::HighestRated),
            "lowest" => Ok(SortMode::LowestRated),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown view mode: {}", self.0)
    }
}

impl std::error::Error for UnknownMode {}

/// Ephemeral view parameters. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub filter: FilterMode,
    pub sort: SortMode,
    pub edit_target: Option<EntryId>,
}

/// One row of a projection, pointing back at its slot in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewItem<'a> {
    /// Index in the canonical collection at the time of projection.
    pub position: usize,
    pub entry: &'a FeedbackEntry,
}

impl ViewItem<'_> {
    /// Stable handle for edit/delete; prefer this over `position`.
    pub fn id(&self) -> EntryId {
        self.entry.id
    }
}

/// Filter `entries` by rating, then stable-sort what remains.
pub fn project(entries: &[FeedbackEntry], filter: FilterMode, sort: SortMode) -> Vec<ViewItem<'_>> {
    let mut items: Vec<ViewItem<'_>> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| filter.matches(entry.rating))
        .map(|(position, entry)| ViewItem { position, entry })
        .collect();

    items.sort_by(|a, b| sort.compare(a.entry, b.entry));
    items
}
