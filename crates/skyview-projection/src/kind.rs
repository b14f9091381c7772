//! Latitude/longitude to plane projections.
//!
//! - **Equirectangular**: longitude and latitude used directly as `x`, `y`.
//! - **Mercator**: conformal; latitude is clamped to ±85° to keep `y` finite.
//! - **Cassini**: transverse equirectangular, centred on the prime meridian.

use std::f32::consts::{FRAC_PI_4, PI, TAU};
use std::fmt;
use std::str::FromStr;

use glam::Vec2;

/// Latitude limit applied by the Mercator projection, in radians.
const MERCATOR_MAX_LAT: f32 = 85.0 * PI / 180.0;

/// Selects how the field is flattened onto the 2D panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ProjectionType {
    /// Plate carrée.
    #[default]
    Equirectangular,
    /// Mercator.
    Mercator,
    /// Cassini.
    Cassini,
}

/// Returned when a projection name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown projection '{0}'")]
pub struct UnknownProjection(pub String);

impl ProjectionType {
    /// Lowercase name used in configuration.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ProjectionType::Equirectangular => "equirectangular",
            ProjectionType::Mercator => "mercator",
            ProjectionType::Cassini => "cassini",
        }
    }

    /// Project `(latitude, longitude)` in radians to the plane.
    ///
    /// Latitude is in `[-π/2, π/2]`; longitude may be given in `[0, 2π)` and
    /// is wrapped to `[-π, π)` first.
    #[must_use]
    pub fn project(self, latlong: Vec2) -> Vec2 {
        let lat = latlong.x;
        let lon = wrap_longitude(latlong.y);
        match self {
            ProjectionType::Equirectangular => Vec2::new(lon, lat),
            ProjectionType::Mercator => {
                let lat = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT);
                Vec2::new(lon, (FRAC_PI_4 + lat / 2.0).tan().ln())
            }
            ProjectionType::Cassini => Vec2::new(
                (lat.cos() * lon.sin()).clamp(-1.0, 1.0).asin(),
                lat.sin().atan2(lat.cos() * lon.cos()),
            ),
        }
    }
}

/// Wrap a longitude to `[-π, π)`.
#[must_use]
pub fn wrap_longitude(lon: f32) -> f32 {
    (lon + PI).rem_euclid(TAU) - PI
}

impl fmt::Display for ProjectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectionType {
    type Err = UnknownProjection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equirectangular" => Ok(ProjectionType::Equirectangular),
            "mercator" => Ok(ProjectionType::Mercator),
            "cassini" => Ok(ProjectionType::Cassini),
            _ => Err(UnknownProjection(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_parse() {
        assert_eq!("mercator".parse(), Ok(ProjectionType::Mercator));
        assert_eq!("Cassini".parse(), Ok(ProjectionType::Cassini));
        assert_eq!(
            "equirectangular".parse(),
            Ok(ProjectionType::Equirectangular)
        );
        assert_eq!(
            "foo".parse::<ProjectionType>(),
            Err(UnknownProjection("foo".to_string()))
        );
    }

    #[test]
    fn test_default_is_equirectangular() {
        assert_eq!(ProjectionType::default(), ProjectionType::Equirectangular);
    }

    #[test]
    fn test_origin_maps_to_origin() {
        for kind in [
            ProjectionType::Equirectangular,
            ProjectionType::Mercator,
            ProjectionType::Cassini,
        ] {
            let p = kind.project(Vec2::ZERO);
            assert!(p.length() < EPSILON, "{kind}: {p:?}");
        }
    }

    #[test]
    fn test_wrap_longitude() {
        assert!((wrap_longitude(0.5) - 0.5).abs() < EPSILON);
        assert!((wrap_longitude(3.0 * FRAC_PI_2) + FRAC_PI_2).abs() < EPSILON);
        assert!((wrap_longitude(-3.0 * FRAC_PI_2) - FRAC_PI_2).abs() < EPSILON);
    }

    #[test]
    fn test_equirectangular_is_identity_on_angles() {
        let p = ProjectionType::Equirectangular.project(Vec2::new(0.3, 1.2));
        assert!((p - Vec2::new(1.2, 0.3)).length() < EPSILON);
    }

    #[test]
    fn test_mercator_pole_is_finite() {
        let p = ProjectionType::Mercator.project(Vec2::new(FRAC_PI_2, 0.0));
        assert!(p.y.is_finite());
        assert!(p.y > 3.0);
    }

    #[test]
    fn test_cassini_equator_point() {
        let p = ProjectionType::Cassini.project(Vec2::new(0.0, FRAC_PI_3));
        assert!((p.x - FRAC_PI_3).abs() < EPSILON);
        assert!(p.y.abs() < EPSILON);
    }

    #[test]
    fn test_cassini_poles_land_on_their_own_edge() {
        let north = ProjectionType::Cassini.project(Vec2::new(FRAC_PI_2, 0.0));
        assert!(north.x.abs() < EPSILON);
        assert!((north.y - FRAC_PI_2).abs() < EPSILON, "{north:?}");

        let south = ProjectionType::Cassini.project(Vec2::new(-FRAC_PI_2, 0.0));
        assert!((south.y + FRAC_PI_2).abs() < EPSILON, "{south:?}");
    }

    #[test]
    fn test_cassini_mid_latitude_on_meridian() {
        let p = ProjectionType::Cassini.project(Vec2::new(0.7, 0.0));
        assert!(p.x.abs() < EPSILON);
        assert!((p.y - 0.7).abs() < EPSILON);
    }
}
