//! Scaling error types.

/// Errors raised while binding or applying a range scale.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScaleError {
    /// Scaling was requested while the input range is still searching and no
    /// finite value has been observed.
    #[error("input range is unbound: no bounds supplied and no data observed")]
    Unbound,

    /// [`transform`](crate::RangeScaler::transform) was called before
    /// [`finalize_scaling`](crate::RangeScaler::finalize_scaling).
    #[error("scaling has not been finalized")]
    NotFinalized,

    /// Bounds with `min > max` or a non-finite bound.
    #[error("invalid range [{min}, {max}]")]
    InvalidRange {
        /// Requested lower bound.
        min: f32,
        /// Requested upper bound.
        max: f32,
    },
}
