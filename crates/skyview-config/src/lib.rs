//! Viewer configuration.
//!
//! Settings come from an optional JSON sidecar next to the input map
//! (`<input>.json`) and from `key=value` command-line overrides, which take
//! precedence. [`ViewerConfigBuilder`] merges both and resolves them into a
//! single immutable [`ViewerConfig`].

mod builder;
mod cli;
mod config;
mod error;

pub use builder::{ViewerConfigBuilder, sidecar_path};
pub use cli::CliArgs;
pub use config::{
    DEFAULT_RELIEF_OUTPUT, SidecarConfig, ViewerConfig, default_relief_output,
};
pub use error::ConfigError;
