use serde::Deserialize;

use crate::validation::ValidationLimits;

/// Storage keys and validation bounds for a [`FeedbackStore`](crate::FeedbackStore).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```ignore
/// let config = StoreConfig::from_json(r#"{ "feedbacksKey": "course-feedback" }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    pub feedbacks_key: String,
    pub theme_key: String,
    pub dark_mode_key: String,
    pub limits: ValidationLimits,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            feedbacks_key: "feedbacks".to_string(),
            theme_key: "theme".to_string(),
            dark_mode_key: "darkMode".to_string(),
            limits: ValidationLimits::default(),
        }
    }
}

impl StoreConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
