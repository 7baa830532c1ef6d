//! Similarity threshold value object.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Minimum similarity score (inclusive) for two names to count as a match.
///
/// Always within `[0, 1]`; NaN is rejected at construction.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    /// Looser default used by interactive search.
    pub const SEARCH: Threshold = Threshold(0.8);

    /// Stricter default used when deciding merge-or-create.
    pub const MERGE: Threshold = Threshold(0.9);

    pub fn new(value: f64) -> DomainResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(DomainError::validation(format!(
                "threshold must be within [0, 1], got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether `score` clears this threshold.
    pub fn admits(self, score: f64) -> bool {
        score >= self.0
    }
}

impl ValueObject for Threshold {}

impl TryFrom<f64> for Threshold {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(value: Threshold) -> Self {
        value.0
    }
}

impl core::fmt::Display for Threshold {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_closed_unit_interval() {
        assert_eq!(Threshold::new(0.0).unwrap().value(), 0.0);
        assert_eq!(Threshold::new(1.0).unwrap().value(), 1.0);
        assert!(Threshold::new(0.85).unwrap().admits(0.85));
    }

    #[test]
    fn rejects_out_of_range_and_nan() {
        for bad in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            match Threshold::new(bad) {
                Err(DomainError::Validation(_)) => {}
                other => panic!("expected validation error for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn deserialization_validates() {
        let ok: Threshold = serde_json::from_str("0.9").unwrap();
        assert_eq!(ok, Threshold::MERGE);
        assert!(serde_json::from_str::<Threshold>("1.5").is_err());
    }

    proptest! {
        #[test]
        fn accepts_exactly_the_unit_interval(value in any::<f64>()) {
            let inside = (0.0..=1.0).contains(&value);
            match Threshold::new(value) {
                Ok(t) => {
                    prop_assert!(inside);
                    prop_assert_eq!(t.value(), value);
                    prop_assert!(t.admits(value));
                }
                Err(err) => {
                    prop_assert!(!inside, "rejected {}", value);
                    prop_assert!(matches!(err, DomainError::Validation(_)));
                }
            }
        }
    }
}
