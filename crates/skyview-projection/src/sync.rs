//! Tracks scene rotation relative to the moment the projection was created.

use glam::Quat;
use tracing::{trace, warn};

/// Component-wise tolerance below which two rotations are treated as equal.
pub const DEFAULT_EPSILON: f32 = 1e-6;

/// Emitted when the projection must be recomputed for a new rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReprojectionRequest {
    /// Unit rotation from the initial orientation to the current one.
    pub rotation: Quat,
}

/// Decides, once per tick, whether the 2D projection is stale.
///
/// The projection is recomputed only when the scene has rotated since the
/// last recomputation and the user is not dragging. The relative rotation is
/// renormalized every tick so repeated updates cannot drift off the unit
/// sphere.
#[derive(Debug, Clone)]
pub struct ProjectionSync {
    base_inverse: Quat,
    last_applied: Quat,
    epsilon: f32,
}

impl ProjectionSync {
    /// Start tracking from the scene's current orientation.
    #[must_use]
    pub fn new(initial_orientation: Quat) -> Self {
        Self {
            base_inverse: initial_orientation.normalize().inverse(),
            last_applied: Quat::IDENTITY,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Override the equality tolerance.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Unit rotation from the initial orientation to `current`.
    ///
    /// Returns `None` if `current` is degenerate (zero or non-finite).
    #[must_use]
    pub fn relative(&self, current: Quat) -> Option<Quat> {
        let relative = self.base_inverse * current;
        let length = relative.length();
        if !length.is_finite() || length <= f32::EPSILON {
            return None;
        }
        Some(relative * (1.0 / length))
    }

    /// Per-tick check. Returns a request if the projection must be redone.
    pub fn maybe_reproject(
        &mut self,
        current: Quat,
        interaction_active: bool,
    ) -> Option<ReprojectionRequest> {
        let Some(relative) = self.relative(current) else {
            warn!(?current, "ignoring degenerate scene rotation");
            return None;
        };

        if self.is_applied(relative) || interaction_active {
            return None;
        }

        trace!(?relative, "projection rotation changed");
        self.last_applied = relative;
        Some(ReprojectionRequest { rotation: relative })
    }

    /// The rotation of the most recent request (identity before any).
    #[must_use]
    pub fn last_applied(&self) -> Quat {
        self.last_applied
    }

    fn is_applied(&self, relative: Quat) -> bool {
        // q and -q describe the same rotation.
        relative.abs_diff_eq(self.last_applied, self.epsilon)
            || (-relative).abs_diff_eq(self.last_applied, self.epsilon)
    }
}
