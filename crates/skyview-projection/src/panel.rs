//! Placement of a projected map in the scene.

use glam::{Vec2, Vec3};

use crate::ProjectionType;

/// A flat panel showing one projection of the sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionPanel {
    /// Projection used to flatten the sphere.
    pub kind: ProjectionType,
    /// Scene position of the panel origin.
    pub position: Vec3,
    /// Scale factor applied to projected coordinates.
    pub radius: f32,
}

impl Default for ProjectionPanel {
    fn default() -> Self {
        Self {
            kind: ProjectionType::default(),
            position: Vec3::ZERO,
            radius: 1.0,
        }
    }
}

impl ProjectionPanel {
    /// Scene position of one `(latitude, longitude)` pair.
    #[must_use]
    pub fn place(&self, latlong: Vec2) -> Vec3 {
        let p = self.kind.project(latlong) * self.radius;
        self.position + Vec3::new(p.x, p.y, 0.0)
    }

    /// Scene positions of every pair.
    #[must_use]
    pub fn vertices(&self, latlong: &[Vec2]) -> Vec<Vec3> {
        latlong.iter().map(|&ll| self.place(ll)).collect()
    }

    /// Axis-aligned `(min, max)` of the placed points, or `None` if empty.
    #[must_use]
    pub fn extents(&self, latlong: &[Vec2]) -> Option<(Vec3, Vec3)> {
        latlong.iter().map(|&ll| self.place(ll)).fold(None, |acc, p| {
            Some(match acc {
                None => (p, p),
                Some((lo, hi)) => (lo.min(p), hi.max(p)),
            })
        })
    }

    /// Caption shown beneath the panel.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} projection", self.kind)
    }
}
