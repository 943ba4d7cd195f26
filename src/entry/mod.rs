//! Entries - committed feedback submissions and the draft they come from.
//!
//! An entry is created from a validated [`Draft`] and only ever replaced as a
//! whole. The `id` and `created_at` assigned at creation survive every update.
//!
//! ## Wire shape
//!
//! ```json
//! {
//!   "id": 1718000000000,
//!   "name": "Ada",
//!   "email": "ada@example.com",
//!   "course": "Compilers",
//!   "rating": 5,
//!   "feedbackText": "Loved the parser labs.",
//!   "date": "2024-06-10",
//!   "createdAt": "2024-06-10T08:13:20Z"
//! }
//! ```

mod draft;
mod rating;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use draft::Draft;
pub use rating::{InvalidRating, Rating, RatingTier};

/// Identifier assigned at creation and never reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl EntryId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One submitted review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub id: EntryId,
    pub name: String,
    pub email: String,
    pub course: String,
    pub rating: Rating,
    pub feedback_text: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl FeedbackEntry {
    /// Build an entry from an accepted draft. Text fields are trimmed and a
    /// missing date falls back to the day of `created_at`.
    pub(crate) fn from_draft(id: EntryId, created_at: DateTime<Utc>, draft: Draft) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            course: draft.course.trim().to_string(),
            rating: draft.rating,
            feedback_text: draft.feedback_text.trim().to_string(),
            date: draft.date.unwrap_or_else(|| created_at.date_naive()),
            created_at,
        }
    }

    pub fn tier(&self) -> RatingTier {
        self.rating.tier()
    }

    pub fn is_positive(&self) -> bool {
        self.rating.get() >= 4
    }

    pub fn to_draft(&self) -> Draft {
        Draft::from(self)
    }
}
