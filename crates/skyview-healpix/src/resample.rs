//! Order reduction: averaging a field onto a coarser tessellation.

use tracing::debug;

use crate::field::{nside_for_order, pixel_count};
use crate::{PixelIndexMapper, PixelOrdering, SphericalField};

/// Lowest order a reduced field may have.
pub const MIN_ORDER: u32 = 1;

/// Errors raised by [`downsample`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResampleError {
    /// Reducing by `levels` would leave fewer than [`MIN_ORDER`] orders.
    #[error("cannot reduce order {order} by {levels} levels (minimum order is {MIN_ORDER})")]
    ReduceTooLarge {
        /// Order of the input field.
        order: u32,
        /// Requested number of levels.
        levels: u32,
    },
}

/// Order of the field produced by reducing `order` by `levels`.
pub fn reduced_order(order: u32, levels: u32) -> Result<u32, ResampleError> {
    match order.checked_sub(levels) {
        Some(reduced) if reduced >= MIN_ORDER => Ok(reduced),
        _ => Err(ResampleError::ReduceTooLarge { order, levels }),
    }
}

/// Average `field` onto the tessellation `levels` orders coarser.
///
/// Each output pixel is the mean of the `4^levels` input pixels nested under
/// it. The fine field is walked in NEST order, so the parent of fine pixel `i`
/// is `i >> (2 * levels)`; ring-ordered input is read through
/// [`PixelIndexMapper::to_ring`]. The result is always NEST ordered.
pub fn downsample<M: PixelIndexMapper>(
    field: &SphericalField,
    levels: u32,
    mapper: &M,
) -> Result<SphericalField, ResampleError> {
    let order = reduced_order(field.order(), levels)?;
    let nside = field.nside();
    let shift = 2 * levels;
    let weight = 1.0 / 4_f32.powi(levels as i32);

    let mut reduced = vec![0.0_f32; pixel_count(nside_for_order(order))];
    let values = field.values();

    match field.ordering() {
        PixelOrdering::Nest => {
            for (nest, &value) in values.iter().enumerate() {
                reduced[nest >> shift] += value * weight;
            }
        }
        PixelOrdering::Ring => {
            for nest in 0..values.len() {
                let ring = mapper.to_ring(nside, nest as u64) as usize;
                reduced[nest >> shift] += values[ring] * weight;
            }
        }
    }

    debug!(
        from_order = field.order(),
        to_order = order,
        ordering = %field.ordering(),
        "downsampled field"
    );

    Ok(SphericalField::nested(nside_for_order(order), reduced))
}
