use serde::Serialize;

use crate::entry::FeedbackEntry;

/// Aggregate figures over the whole collection, ignoring filter and sort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStats {
    pub total: usize,
    /// Mean rating rounded half-up to one decimal; `0.0` for no entries.
    pub average_rating: f64,
    pub positive_count: usize,
    pub five_star_count: usize,
}

impl FeedbackStats {
    pub fn from_entries(entries: &[FeedbackEntry]) -> Self {
        let total = entries.len();
        let sum: u64 = entries.iter().map(|e| u64::from(e.rating.get())).sum();

        Self {
            total,
            average_rating: average_tenths(sum, total as u64) as f64 / 10.0,
            positive_count: entries.iter().filter(|e| e.is_positive()).count(),
            five_star_count: entries.iter().filter(|e| e.rating.get() == 5).count(),
        }
    }
}

/// `round_half_up(10 * sum / count)` in integer arithmetic, so 4.25 lands on
/// 43 rather than whatever the nearest binary float rounds to.
fn average_tenths(sum: u64, count: u64) -> u64 {
    if count == 0 {
        return 0;
    }
    (sum * 20 + count) / (count * 2)
}
