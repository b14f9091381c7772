//! Top-level viewer errors.

use std::path::PathBuf;

use skyview_config::ConfigError;
use skyview_healpix::ResampleError;
use skyview_scale::ScaleError;

use crate::fits::LoadError;

/// Structural failures that end the viewer with a non-zero exit status.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// No input path on the command line.
    #[error("no input file given")]
    MissingInput,

    /// The input could not be read as a HEALPix map.
    #[error("failed to load {}: {source}", path.display())]
    LoadFailure {
        /// The input path.
        path: PathBuf,
        /// Why loading failed.
        #[source]
        source: LoadError,
    },

    /// `order_reduce` would drop the field below the minimum order.
    #[error(transparent)]
    ReduceTooLarge(#[from] ResampleError),

    /// The sidecar or an override is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A range scaler could not be finalized.
    #[error("scaling failed: {0}")]
    Scale(#[from] ScaleError),
}
