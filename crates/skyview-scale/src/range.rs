//! Closed value intervals with a searching sentinel.

use std::fmt;

use crate::ScaleError;

/// A closed interval `[min, max]`.
///
/// A range is either *searching* (`min = +∞`, `max = −∞`), meaning no bound
/// has been supplied and nothing has been scanned yet, or *bound* with
/// `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl Range {
    /// The searching sentinel.
    pub const SEARCHING: Range = Range {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// `[0, 1]`.
    pub const UNIT: Range = Range { min: 0.0, max: 1.0 };

    /// Construct a bound range.
    pub fn new(min: f32, max: f32) -> Result<Self, ScaleError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ScaleError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Whether this range is still the searching sentinel.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.min == f32::INFINITY && self.max == f32::NEG_INFINITY
    }

    /// Whether the range holds finite bounds with `min <= max`.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Widen the range to include `value`. Non-finite values are ignored.
    ///
    /// Returns true if either bound moved.
    pub fn update(&mut self, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        let mut changed = false;
        if value < self.min {
            self.min = value;
            changed = true;
        }
        if value > self.max {
            self.max = value;
            changed = true;
        }
        changed
    }

    /// `max - min`.
    #[must_use]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Whether `value` lies within `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::SEARCHING
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
