//! HEALPix map viewer: FITS loading, view preparation and the interaction
//! loop.

mod error;
pub mod fits;
pub mod session;
pub mod view_loop;

pub use error::ViewerError;
pub use fits::{LoadError, RawField, load_field};
pub use session::{SurfaceBuffers, ViewSession};
pub use view_loop::{INITIAL_SCENE_ROTATION, LoopStats, POLL_INTERVAL, SceneView, run_view_loop};
