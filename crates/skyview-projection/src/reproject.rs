//! Recomputes per-pixel latitude/longitude and colour for the 2D projection.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::{DQuat, DVec3, Quat, Vec2};
use skyview_healpix::{PixelIndexMapper, PixelOrdering, SphericalField};
use skyview_scale::{ColourMap, LinearScale};

/// Flat buffers consumed by the projection panel, one entry per pixel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionBuffers {
    /// `(latitude, longitude)` in radians. Latitude in `[-π/2, π/2]`,
    /// longitude in `[0, 2π)`.
    pub latlong: Vec<Vec2>,
    /// Linear RGB colour of each pixel.
    pub colours: Vec<[f32; 3]>,
}

impl ProjectionBuffers {
    /// Number of pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.latlong.len()
    }

    /// Whether the buffers are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.latlong.is_empty()
    }
}

/// `(latitude, longitude)` of one pixel centre after rotating the sphere.
#[must_use]
pub fn pixel_latlong<M: PixelIndexMapper>(
    mapper: &M,
    nside: u64,
    nest: u64,
    rotation: Option<DQuat>,
) -> Vec2 {
    let (theta, phi) = mapper.to_angle(nside, nest);
    let Some(rotation) = rotation else {
        return Vec2::new((FRAC_PI_2 - theta) as f32, narrow_longitude(phi));
    };

    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let dir = rotation * DVec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta);
    let lat = dir.z.clamp(-1.0, 1.0).asin();
    Vec2::new(lat as f32, narrow_longitude(dir.y.atan2(dir.x)))
}

/// Wrap to `[0, 2π)` and narrow to `f32`, wrapping again if rounding lands
/// on 2π.
fn narrow_longitude(lon: f64) -> f32 {
    let lon = lon.rem_euclid(TAU) as f32;
    if lon >= std::f32::consts::TAU { 0.0 } else { lon }
}

/// Project every pixel of `field` after applying `rotation`.
///
/// Colours are `colour_map.convert(scale.apply(value))`. Both output buffers
/// have one entry per pixel, in NEST order.
#[must_use]
pub fn reproject<M: PixelIndexMapper>(
    field: &SphericalField,
    mapper: &M,
    scale: &LinearScale,
    colour_map: &ColourMap,
    rotation: Quat,
) -> ProjectionBuffers {
    let nside = field.nside();
    let values = field.values();
    let rotation = (!rotation.abs_diff_eq(Quat::IDENTITY, f32::EPSILON))
        .then(|| rotation.as_dquat().normalize());

    let mut latlong = Vec::with_capacity(field.len());
    let mut colours = Vec::with_capacity(field.len());
    for nest in 0..field.len() as u64 {
        let value = match field.ordering() {
            PixelOrdering::Nest => values[nest as usize],
            PixelOrdering::Ring => values[mapper.to_ring(nside, nest) as usize],
        };
        latlong.push(pixel_latlong(mapper, nside, nest, rotation));
        colours.push(colour_map.convert(scale.apply(value)));
    }

    ProjectionBuffers { latlong, colours }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyview_healpix::{Healpix, nside_for_order, pixel_count};
    use skyview_scale::{ColourMapType, Range};
    use std::f32::consts::PI;

    fn ramp(order: u32) -> SphericalField {
        let nside = nside_for_order(order);
        let values = (0..pixel_count(nside)).map(|i| i as f32).collect();
        SphericalField::new(nside, PixelOrdering::Nest, values).unwrap()
    }

    fn grey_scale(field: &SphericalField) -> (LinearScale, ColourMap) {
        let (lo, hi) = field.value_range();
        (
            LinearScale::between(Range::new(lo, hi).unwrap(), Range::UNIT),
            ColourMap::new(ColourMapType::Greyscale),
        )
    }

    #[test]
    fn test_buffers_match_field_length() {
        let field = ramp(2);
        let (scale, cmap) = grey_scale(&field);
        let buffers = reproject(&field, &Healpix, &scale, &cmap, Quat::IDENTITY);
        assert_eq!(buffers.len(), field.len());
        assert_eq!(buffers.colours.len(), field.len());
    }

    #[test]
    fn test_identity_uses_pixel_angles() {
        let field = ramp(1);
        let (scale, cmap) = grey_scale(&field);
        let buffers = reproject(&field, &Healpix, &scale, &cmap, Quat::IDENTITY);
        for (nest, ll) in buffers.latlong.iter().enumerate() {
            let (theta, phi) = Healpix::nest_to_angle(2, nest as u64);
            assert!((ll.x - (FRAC_PI_2 - theta) as f32).abs() < 1e-6);
            assert!((ll.y - phi as f32).abs() < 1e-6);
            assert!((-PI / 2.0..=PI / 2.0).contains(&ll.x));
        }
    }

    #[test]
    fn test_colours_follow_scale() {
        let field = ramp(1);
        let (scale, cmap) = grey_scale(&field);
        let buffers = reproject(&field, &Healpix, &scale, &cmap, Quat::IDENTITY);
        assert!(buffers.colours[0].iter().all(|&c| c.abs() < 1e-6));
        let last = buffers.colours[field.len() - 1];
        assert!(last.iter().all(|&c| (c - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_rotation_about_pole_shifts_longitude() {
        let field = ramp(2);
        let (scale, cmap) = grey_scale(&field);
        let turn = 0.25_f32;
        let still = reproject(&field, &Healpix, &scale, &cmap, Quat::IDENTITY);
        let turned = reproject(&field, &Healpix, &scale, &cmap, Quat::from_rotation_z(turn));
        for (a, b) in still.latlong.iter().zip(&turned.latlong) {
            assert!((a.x - b.x).abs() < 1e-5, "latitude changed");
            let dlon = (b.y - a.y).rem_euclid(2.0 * PI);
            assert!((dlon - turn).abs() < 1e-4, "longitude shift {dlon}");
        }
        assert_eq!(still.colours, turned.colours);
    }

    #[test]
    fn test_rotated_longitudes_stay_in_range() {
        let field = ramp(2);
        let (scale, cmap) = grey_scale(&field);
        let rotation = Quat::from_rotation_x(1.1) * Quat::from_rotation_y(-0.4);
        let buffers = reproject(&field, &Healpix, &scale, &cmap, rotation);
        for ll in &buffers.latlong {
            assert!((0.0..2.0 * PI).contains(&ll.y), "longitude {}", ll.y);
            assert!(ll.x.abs() <= PI / 2.0 + 1e-6);
        }
    }

    #[test]
    fn test_longitude_just_below_two_pi_wraps_to_zero() {
        assert_eq!(narrow_longitude(TAU - 1e-12), 0.0);
        assert_eq!(narrow_longitude(-1e-12), 0.0);
        assert!(narrow_longitude(TAU - 1e-3) < 2.0 * PI);
        assert!((narrow_longitude(-FRAC_PI_2) - 1.5 * PI).abs() < 1e-6);
    }

    #[test]
    fn test_ring_field_reads_through_mapper() {
        let nest = ramp(1);
        let mut ring_values = vec![0.0; nest.len()];
        for (i, &v) in nest.values().iter().enumerate() {
            ring_values[Healpix::nest_to_ring(2, i as u64) as usize] = v;
        }
        let ring = SphericalField::new(2, PixelOrdering::Ring, ring_values).unwrap();
        let (scale, cmap) = grey_scale(&nest);
        let a = reproject(&nest, &Healpix, &scale, &cmap, Quat::IDENTITY);
        let b = reproject(&ring, &Healpix, &scale, &cmap, Quat::IDENTITY);
        assert_eq!(a, b);
    }
}
