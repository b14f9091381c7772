//! Scalar fields sampled on every pixel of a HEALPix tessellation.

use crate::PixelOrdering;

/// Errors raised while constructing a [`SphericalField`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// `nside` must be a non-zero power of two.
    #[error("nside {0} is not a power of two")]
    NotPowerOfTwo(u64),

    /// `nside` is beyond [`MAX_NSIDE`].
    #[error("nside {0} exceeds the maximum of {MAX_NSIDE}")]
    NsideTooLarge(u64),

    /// The value buffer does not hold `12 * nside²` samples.
    #[error("expected {expected} samples for nside {nside}, got {actual}")]
    LengthMismatch {
        /// The resolution parameter.
        nside: u64,
        /// `12 * nside²`.
        expected: usize,
        /// Number of samples supplied.
        actual: usize,
    },
}

/// Largest supported resolution parameter (order 29).
pub const MAX_NSIDE: u64 = 1 << 29;

/// Number of pixels at resolution `nside`.
///
/// `nside` must not exceed [`MAX_NSIDE`].
#[inline]
#[must_use]
pub fn pixel_count(nside: u64) -> usize {
    (12 * nside * nside) as usize
}

/// Resolution parameter for a given order: `nside = 2^order`.
#[inline]
#[must_use]
pub fn nside_for_order(order: u32) -> u64 {
    1 << order
}

/// A scalar sample per pixel at a single resolution.
///
/// Always holds exactly `12 * nside²` values. The order is derived from
/// `nside` rather than stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SphericalField {
    nside: u64,
    ordering: PixelOrdering,
    values: Vec<f32>,
}

impl SphericalField {
    /// Take ownership of a value buffer, validating its resolution and length.
    pub fn new(nside: u64, ordering: PixelOrdering, values: Vec<f32>) -> Result<Self, FieldError> {
        if nside == 0 || !nside.is_power_of_two() {
            return Err(FieldError::NotPowerOfTwo(nside));
        }
        if nside > MAX_NSIDE {
            return Err(FieldError::NsideTooLarge(nside));
        }
        let expected = pixel_count(nside);
        if values.len() != expected {
            return Err(FieldError::LengthMismatch {
                nside,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            nside,
            ordering,
            values,
        })
    }

    /// Wrap a NEST-ordered buffer whose length is already known to match.
    pub(crate) fn nested(nside: u64, values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), pixel_count(nside));
        Self {
            nside,
            ordering: PixelOrdering::Nest,
            values,
        }
    }

    /// A field with every pixel set to `value`.
    #[must_use]
    pub fn constant(order: u32, ordering: PixelOrdering, value: f32) -> Self {
        let nside = nside_for_order(order);
        Self {
            nside,
            ordering,
            values: vec![value; pixel_count(nside)],
        }
    }

    /// The resolution parameter.
    #[must_use]
    pub fn nside(&self) -> u64 {
        self.nside
    }

    /// `log2(nside)`.
    #[must_use]
    pub fn order(&self) -> u32 {
        self.nside.trailing_zeros()
    }

    /// Pixel ordering of [`values`](Self::values).
    #[must_use]
    pub fn ordering(&self) -> PixelOrdering {
        self.ordering
    }

    /// Samples, indexed according to [`ordering`](Self::ordering).
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; a valid field has at least 12 pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(min, max)` over all samples, ignoring NaN.
    #[must_use]
    pub fn value_range(&self) -> (f32, f32) {
        self.values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Release the sample buffer.
    #[must_use]
    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}
