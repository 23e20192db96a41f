//! Inclusive integer ranges and range sampling.
//!
//! Sampling never owns an RNG. Callers pass a sampler `FnMut(min, max) -> value`
//! that returns a uniformly distributed integer in `[min, max]`.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// An inclusive `[min, max]` integer range. Always `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct Range {
    min: i32,
    max: i32,
}

#[derive(Deserialize)]
struct RawRange {
    min: i32,
    max: i32,
}

impl TryFrom<RawRange> for Range {
    type Error = DomainError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max)
    }
}

impl Range {
    /// Create a validated range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when `min > max`.
    pub fn new(min: i32, max: i32) -> Result<Self, DomainError> {
        if min > max {
            return Err(DomainError::validation(format!(
                "Range min {} is greater than max {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// A range that always yields `value`.
    pub const fn exactly(value: i32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, value: i32) -> bool {
        self.min <= value && value <= self.max
    }

    /// Sample a value from this range with the given sampler.
    pub fn pick(&self, sampler: impl FnMut(i32, i32) -> i32) -> i32 {
        pick_integer_from_range(self.min, self.max, sampler)
    }
}

/// Uniformly sample an integer in `[min, max]` using `sampler`.
///
/// The result is clamped into the range. `min > max` is the caller's bug;
/// `Range` makes it unrepresentable for stored values.
pub fn pick_integer_from_range(min: i32, max: i32, mut sampler: impl FnMut(i32, i32) -> i32) -> i32 {
    debug_assert!(min <= max, "pick_integer_from_range called with min > max");
    sampler(min, max).clamp(min, max.max(min))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_range() {
        assert!(Range::new(5, 1).is_err());
        assert!(Range::new(3, 3).is_ok());
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<Range, _> = serde_json::from_str(r#"{"min":1,"max":10}"#);
        assert_eq!(ok.unwrap(), Range::new(1, 10).unwrap());

        let bad: Result<Range, _> = serde_json::from_str(r#"{"min":10,"max":1}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn pick_passes_bounds_to_sampler() {
        let range = Range::new(2, 7).unwrap();
        let mut seen = None;
        let value = range.pick(|min, max| {
            seen = Some((min, max));
            max
        });
        assert_eq!(seen, Some((2, 7)));
        assert_eq!(value, 7);
    }

    #[test]
    fn pick_clamps_out_of_range_sampler_output() {
        assert_eq!(pick_integer_from_range(1, 20, |_, _| 99), 20);
        assert_eq!(pick_integer_from_range(1, 20, |_, _| -3), 1);
    }
}
