//! 2D map projections of a HEALPix field and the orientation tracking that
//! decides when a projection must be recomputed.

mod kind;
mod panel;
mod reproject;
mod sync;

pub use kind::{ProjectionType, UnknownProjection, wrap_longitude};
pub use panel::ProjectionPanel;
pub use reproject::{ProjectionBuffers, pixel_latlong, reproject};
pub use sync::{DEFAULT_EPSILON, ProjectionSync, ReprojectionRequest};
