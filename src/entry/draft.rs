use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{FeedbackEntry, Rating};

/// The in-progress form buffer. Nothing here is committed until the store
/// accepts it through `create` or `update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Draft {
    pub name: String,
    pub email: String,
    pub course: String,
    pub rating: Rating,
    pub feedback_text: String,
    /// Day of the experience. `None` means the submission day.
    pub date: Option<NaiveDate>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            course: String::new(),
            rating: Rating::TOP,
            feedback_text: String::new(),
            date: None,
        }
    }
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn course(mut self, course: impl Into<String>) -> Self {
        self.course = course.into();
        self
    }

    pub fn rating(mut self, rating: Rating) -> Self {
        self.rating = rating;
        self
    }

    pub fn feedback_text(mut self, text: impl Into<String>) -> Self {
        self.feedback_text = text.into();
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Reset every field to its initial value.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl From<&FeedbackEntry> for Draft {
    fn from(entry: &FeedbackEntry) -> Self {
        Self {
            name: entry.name.clone(),
            email: entry.email.clone(),
            course: entry.course.clone(),
            rating: entry.rating,
            feedback_text: entry.feedback_text.clone(),
            date: Some(entry.date),
        }
    }
}
