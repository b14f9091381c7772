//! HEALPix tessellation: pixel index conversions, per-pixel scalar fields and
//! order reduction.

mod field;
mod mapper;
mod ordering;
mod resample;

pub use field::{FieldError, MAX_NSIDE, SphericalField, nside_for_order, pixel_count};
pub use mapper::{Healpix, PixelIndexMapper};
pub use ordering::PixelOrdering;
pub use resample::{MIN_ORDER, ResampleError, downsample, reduced_order};
