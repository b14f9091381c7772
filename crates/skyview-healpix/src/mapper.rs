//! Conversions between NEST indices, RING indices and pixel-centre angles.
//!
//! Every pixel is addressed internally as `(ix, iy, face)`: one of the twelve
//! base faces plus a position inside the face's `nside × nside` grid. A NEST
//! index is the face number followed by the bit-interleaved `(ix, iy)`, which
//! is what makes the four children of a pixel contiguous.

use std::f64::consts::{FRAC_PI_2, TAU};

/// Ring number (in units of `nside`) of the northernmost corner of each face.
const JRLL: [i64; 12] = [2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4];
/// Longitude (in units of `π/4`) of the centre of each face.
const JPLL: [i64; 12] = [1, 3, 5, 7, 0, 2, 4, 6, 1, 3, 5, 7];

/// Pixel index conversions required by the resampler and the projection.
///
/// Implementations may assume `nside` is a power of two and `nest` is in
/// `[0, 12 * nside²)`.
pub trait PixelIndexMapper {
    /// The RING index of the pixel with the given NEST index.
    fn to_ring(&self, nside: u64, nest: u64) -> u64;

    /// `(colatitude, longitude)` of the pixel centre in radians.
    ///
    /// Colatitude is in `[0, π]` (0 at the north pole), longitude in `[0, 2π)`.
    fn to_angle(&self, nside: u64, nest: u64) -> (f64, f64);
}

/// The standard HEALPix tessellation for power-of-two `nside`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Healpix;

impl PixelIndexMapper for Healpix {
    #[inline]
    fn to_ring(&self, nside: u64, nest: u64) -> u64 {
        Healpix::nest_to_ring(nside, nest)
    }

    #[inline]
    fn to_angle(&self, nside: u64, nest: u64) -> (f64, f64) {
        Healpix::nest_to_angle(nside, nest)
    }
}

impl Healpix {
    /// Convert a NEST index to a RING index.
    #[must_use]
    pub fn nest_to_ring(nside: u64, nest: u64) -> u64 {
        let (ix, iy, face) = nest_to_xyf(nside, nest);
        xyf_to_ring(nside, ix, iy, face)
    }

    /// Convert a RING index to a NEST index.
    #[must_use]
    pub fn ring_to_nest(nside: u64, ring: u64) -> u64 {
        let (ix, iy, face) = ring_to_xyf(nside, ring);
        xyf_to_nest(nside, ix, iy, face)
    }

    /// Pixel-centre `(colatitude, longitude)` for a NEST index.
    #[must_use]
    pub fn nest_to_angle(nside: u64, nest: u64) -> (f64, f64) {
        let (ix, iy, face) = nest_to_xyf(nside, nest);
        let ns = nside as i64;
        let fact2 = 4.0 / (12 * ns * ns) as f64;
        let fact1 = (2 * ns) as f64 * fact2;

        let jr = JRLL[face] * ns - ix - iy - 1;
        let (nr, z) = if jr < ns {
            (jr, 1.0 - (jr * jr) as f64 * fact2)
        } else if jr > 3 * ns {
            let nr = 4 * ns - jr;
            (nr, (nr * nr) as f64 * fact2 - 1.0)
        } else {
            (ns, (2 * ns - jr) as f64 * fact1)
        };

        let mut tmp = JPLL[face] * nr + ix - iy;
        if tmp < 0 {
            tmp += 8 * nr;
        }
        let phi = if nr == ns {
            0.75 * FRAC_PI_2 * tmp as f64 * fact1
        } else {
            0.5 * FRAC_PI_2 * tmp as f64 / nr as f64
        };

        (z.clamp(-1.0, 1.0).acos(), phi.rem_euclid(TAU))
    }
}

fn order_of(nside: u64) -> u32 {
    nside.trailing_zeros()
}

fn nest_to_xyf(nside: u64, nest: u64) -> (i64, i64, usize) {
    let order = order_of(nside);
    let in_face = nest & (nside * nside - 1);
    let face = (nest >> (2 * order)) as usize;
    (
        compress_bits(in_face) as i64,
        compress_bits(in_face >> 1) as i64,
        face,
    )
}

fn xyf_to_nest(nside: u64, ix: i64, iy: i64, face: usize) -> u64 {
    let order = order_of(nside);
    ((face as u64) << (2 * order)) + spread_bits(ix as u64) + (spread_bits(iy as u64) << 1)
}

fn xyf_to_ring(nside: u64, ix: i64, iy: i64, face: usize) -> u64 {
    let ns = nside as i64;
    let nl4 = 4 * ns;
    let npix = 12 * ns * ns;
    let ncap = 2 * ns * (ns - 1);

    let jr = JRLL[face] * ns - ix - iy - 1;
    let (nr, n_before, kshift) = if jr < ns {
        (jr, 2 * jr * (jr - 1), 0)
    } else if jr > 3 * ns {
        let nr = nl4 - jr;
        (nr, npix - 2 * (nr + 1) * nr, 0)
    } else {
        (ns, ncap + (jr - ns) * nl4, (jr - ns) & 1)
    };

    let mut jp = (JPLL[face] * nr + ix - iy + 1 + kshift) / 2;
    if jp > nl4 {
        jp -= nl4;
    } else if jp < 1 {
        jp += nl4;
    }

    (n_before + jp - 1) as u64
}

fn ring_to_xyf(nside: u64, ring: u64) -> (i64, i64, usize) {
    let order = order_of(nside);
    let ns = nside as i64;
    let nl2 = 2 * ns;
    let npix = 12 * ns * ns;
    let ncap = 2 * ns * (ns - 1);
    let pix = ring as i64;

    let (iring, iphi, kshift, nr, face) = if pix < ncap {
        // North polar cap
        let iring = (1 + isqrt(1 + 2 * pix)) >> 1;
        let iphi = (pix + 1) - 2 * iring * (iring - 1);
        (iring, iphi, 0, iring, (iphi - 1) / iring)
    } else if pix < npix - ncap {
        // Equatorial belt
        let ip = pix - ncap;
        let tmp = ip >> (order + 2);
        let iring = tmp + ns;
        let iphi = ip - tmp * 4 * ns + 1;
        let kshift = (iring + ns) & 1;
        let ire = tmp + 1;
        let irm = nl2 + 1 - tmp;
        let ifm = (iphi - (ire >> 1) + ns - 1) >> order;
        let ifp = (iphi - (irm >> 1) + ns - 1) >> order;
        let face = if ifp == ifm {
            ifp | 4
        } else if ifp < ifm {
            ifp
        } else {
            ifm + 8
        };
        (iring, iphi, kshift, ns, face)
    } else {
        // South polar cap
        let ip = npix - pix;
        let from_south = (1 + isqrt(2 * ip - 1)) >> 1;
        let iphi = 4 * from_south + 1 - (ip - 2 * from_south * (from_south - 1));
        (
            2 * nl2 - from_south,
            iphi,
            0,
            from_south,
            (iphi - 1) / from_south + 8,
        )
    };

    let face = face as usize;
    let irt = iring - (2 + (face as i64 >> 2)) * ns + 1;
    let mut ipt = 2 * iphi - JPLL[face] * nr - kshift - 1;
    if ipt >= nl2 {
        ipt -= 8 * ns;
    }

    ((ipt - irt) >> 1, (-ipt - irt) >> 1, face)
}

fn isqrt(value: i64) -> i64 {
    let mut root = (value as f64).sqrt() as i64;
    while root * root > value {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= value {
        root += 1;
    }
    root
}

/// Gather the even bits of `v` into the low half.
fn compress_bits(v: u64) -> u64 {
    let mut v = v & 0x5555_5555_5555_5555;
    v = (v | (v >> 1)) & 0x3333_3333_3333_3333;
    v = (v | (v >> 2)) & 0x0f0f_0f0f_0f0f_0f0f;
    v = (v | (v >> 4)) & 0x00ff_00ff_00ff_00ff;
    v = (v | (v >> 8)) & 0x0000_ffff_0000_ffff;
    (v | (v >> 16)) & 0x0000_0000_ffff_ffff
}

/// Inverse of [`compress_bits`]: spread the low 32 bits onto even positions.
fn spread_bits(v: u64) -> u64 {
    let mut v = v & 0x0000_0000_ffff_ffff;
    v = (v | (v << 16)) & 0x0000_ffff_0000_ffff;
    v = (v | (v << 8)) & 0x00ff_00ff_00ff_00ff;
    v = (v | (v << 4)) & 0x0f0f_0f0f_0f0f_0f0f;
    v = (v | (v << 2)) & 0x3333_3333_3333_3333;
    (v | (v << 1)) & 0x5555_5555_5555_5555
}
