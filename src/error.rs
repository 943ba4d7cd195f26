use std::fmt;

use crate::entry::EntryId;
use crate::storage::StorageError;
use crate::validation::ValidationErrors;

/// Recoverable failures of store operations. None of them mutate state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    /// The draft failed one or more field checks.
    Validation(ValidationErrors),
    /// No entry has this id (e.g. deleted in the meantime).
    NotFound(EntryId),
    /// `update` was called without a preceding `begin_edit`.
    NoEditInProgress,
}

impl FeedbackError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            FeedbackError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl fmt::Display for FeedbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackError::Validation(errors) => write!(f, "invalid feedback: {}", errors),
            FeedbackError::NotFound(id) => write!(f, "feedback entry not found: {}", id),
            FeedbackError::NoEditInProgress => write!(f, "no edit in progress"),
        }
    }
}

impl std::error::Error for FeedbackError {}

impl From<ValidationErrors> for FeedbackError {
    fn from(errors: ValidationErrors) -> Self {
        FeedbackError::Validation(errors)
    }
}

/// A committed mutation whose write to storage failed. The in-memory change
/// stands; the caller decides whether to surface this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceWarning {
    pub key: String,
    pub error: StorageError,
}

impl fmt::Display for PersistenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "changes not saved to {}: {}", self.key, self.error)
    }
}
