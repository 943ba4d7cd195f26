//! Validation - field-level checks run on a draft before it is committed.
//!
//! Every rule runs on every call; a failing field never hides a later one.
//! Rating is constrained by its type and never appears in the error map.

mod rules;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::entry::Draft;

/// Length bounds applied by [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationLimits {
    pub name_min: usize,
    pub feedback_text_min: usize,
    pub feedback_text_max: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            name_min: 2,
            feedback_text_min: 10,
            feedback_text_max: 500,
        }
    }
}

/// A user-editable draft field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    Course,
    FeedbackText,
}

impl Field {
    /// Key used for the field in the wire format.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Course => "course",
            Field::FeedbackText => "feedbackText",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Course => "Course",
            Field::FeedbackText => "Feedback",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    TooShort { min: usize },
    TooLong { max: usize },
    InvalidFormat,
}

/// A single failed constraint with its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, kind: FieldErrorKind) -> Self {
        let label = field.label();
        let message = match kind {
            FieldErrorKind::Required => format!("{} is required", label),
            FieldErrorKind::TooShort { min } => {
                format!("{} must be at least {} characters", label, min)
            }
            FieldErrorKind::TooLong { max } => {
                format!("{} must be at most {} characters", label, max)
            }
            FieldErrorKind::InvalidFormat => format!("{} is not a valid address", label),
        };
        Self { kind, message }
    }
}

/// Field-level failures for one draft. Empty means the draft may be committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn kind(&self, field: Field) -> Option<FieldErrorKind> {
        self.errors.get(&field).map(|e| e.kind)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.errors.iter().map(|(field, error)| (*field, error))
    }

    /// Field name to message, keyed the way the wire format names fields.
    pub fn messages(&self) -> BTreeMap<&'static str, String> {
        self.errors
            .iter()
            .map(|(field, error)| (field.as_str(), error.message.clone()))
            .collect()
    }

    fn record(&mut self, field: Field, kind: Option<FieldErrorKind>) {
        if let Some(kind) = kind {
            self.errors.insert(field, FieldError::new(field, kind));
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Check every field of `draft` against `limits`.
pub fn validate(draft: &Draft, limits: &ValidationLimits) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.record(Field::Name, rules::check_name(&draft.name, limits));
    errors.record(Field::Email, rules::check_email(&draft.email));
    errors.record(Field::Course, rules::check_course(&draft.course));
    errors.record(
        Field::FeedbackText,
        rules::check_feedback_text(&draft.feedback_text, limits),
    );
    errors
}
