use serde::{Deserialize, Serialize};
use std::fmt;

/// A star rating, always within 1..=5.
///
/// Serialized as a bare integer. Deserializing an out-of-range value fails,
/// so a stored collection can never hold a rating outside the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Highest rating; also the initial value of a fresh draft.
    pub const TOP: Rating = Rating(Self::MAX);

    pub fn new(value: u8) -> Result<Self, InvalidRating> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Rating(value))
        } else {
            Err(InvalidRating(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn tier(self) -> RatingTier {
        RatingTier::of(self)
    }

    /// Every rating on the scale, lowest first.
    pub fn all() -> impl Iterator<Item = Rating> {
        (Self::MIN..=Self::MAX).map(Rating)
    }
}

impl Default for Rating {
    fn default() -> Self {
        Rating::TOP
    }
}

impl TryFrom<u8> for Rating {
    type Error = InvalidRating;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRating(pub u8);

impl fmt::Display for InvalidRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rating {} is outside {}..={}",
            self.0,
            Rating::MIN,
            Rating::MAX
        )
    }
}

impl std::error::Error for InvalidRating {}

/// Coarse sentiment bucket for a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingTier {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
}

impl RatingTier {
    pub fn of(rating: Rating) -> Self {
        match rating.get() {
            4..=5 => RatingTier::Excellent,
            3 => RatingTier::Good,
            2 => RatingTier::Average,
            _ => RatingTier::NeedsImprovement,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RatingTier::Excellent => "Excellent!",
            RatingTier::Good => "Good",
            RatingTier::Average => "Average",
            RatingTier::NeedsImprovement => "Needs Improvement",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_one_through_five() {
        assert_eq!(Rating::new(0), Err(InvalidRating(0)));
        assert_eq!(Rating::new(6), Err(InvalidRating(6)));
        assert_eq!(Rating::all().map(Rating::get).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn deserialize_rejects_out_of_range() {
        let ok: Rating = serde_json::from_str("4").unwrap();
        assert_eq!(ok.get(), 4);
        assert!(serde_json::from_str::<Rating>("9").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "4");
    }

    #[test]
    fn tiers() {
        let tier = |v| Rating::new(v).unwrap().tier();
        assert_eq!(tier(5), RatingTier::Excellent);
        assert_eq!(tier(4), RatingTier::Excellent);
        assert_eq!(tier(3), RatingTier::Good);
        assert_eq!(tier(2), RatingTier::Average);
        assert_eq!(tier(1).label(), "Needs Improvement");
    }
}
