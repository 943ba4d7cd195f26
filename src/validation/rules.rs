use super::{FieldErrorKind, ValidationLimits};

pub(super) fn check_name(value: &str, limits: &ValidationLimits) -> Option<FieldErrorKind> {
    required_with_min(value, limits.name_min)
}

pub(super) fn check_email(value: &str) -> Option<FieldErrorKind> {
    let value = value.trim();
    if value.is_empty() {
        return Some(FieldErrorKind::Required);
    }
    if !looks_like_email(value) {
        return Some(FieldErrorKind::InvalidFormat);
    }
    None
}

pub(super) fn check_course(value: &str) -> Option<FieldErrorKind> {
    if value.trim().is_empty() {
        Some(FieldErrorKind::Required)
    } else {
        None
    }
}

pub(super) fn check_feedback_text(
    value: &str,
    limits: &ValidationLimits,
) -> Option<FieldErrorKind> {
    if let Some(kind) = required_with_min(value, limits.feedback_text_min) {
        return Some(kind);
    }
    if value.trim().chars().count() > limits.feedback_text_max {
        return Some(FieldErrorKind::TooLong {
            max: limits.feedback_text_max,
        });
    }
    None
}

fn required_with_min(value: &str, min: usize) -> Option<FieldErrorKind> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Some(FieldErrorKind::Required)
    } else if trimmed.chars().count() < min {
        Some(FieldErrorKind::TooShort { min })
    } else {
        None
    }
}

/// `<non-whitespace>@<non-whitespace>.<non-whitespace>`, nothing stricter.
fn looks_like_email(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }

    value.match_indices('@').any(|(at, _)| {
        if at == 0 {
            return false;
        }
        let domain = &value[at + 1..];
        domain
            .match_indices('.')
            .any(|(dot, _)| dot > 0 && dot + 1 < domain.len())
    })
}
