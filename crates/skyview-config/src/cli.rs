//! Command-line argument parsing for the viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::{ConfigError, ViewerConfig, ViewerConfigBuilder, sidecar_path};

/// Viewer command-line arguments.
///
/// `key=value` overrides are applied after the sidecar config.
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "skyview", about = "View HEALPix maps")]
pub struct CliArgs {
    /// Path to a HEALPix FITS file.
    pub input: Option<PathBuf>,

    /// Config overrides, e.g. `colourmap_type=viridis order_reduce=2`.
    pub overrides: Vec<String>,

    /// Log filter (error, warn, info, debug, trace or a directive list).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Also write JSON logs to this directory.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl CliArgs {
    /// Resolve the configuration for `input`: its sidecar, then overrides.
    pub fn resolve_config(&self, input: &std::path::Path) -> Result<ViewerConfig, ConfigError> {
        ViewerConfigBuilder::new()
            .with_sidecar(&sidecar_path(input))
            .with_overrides(&self.overrides)?
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positional_and_overrides() {
        let args = CliArgs::parse_from([
            "skyview",
            "sky.fits",
            "order_reduce=1",
            "projection=mercator",
        ]);
        assert_eq!(args.input, Some(PathBuf::from("sky.fits")));
        assert_eq!(args.overrides, vec!["order_reduce=1", "projection=mercator"]);
        assert_eq!(args.log_level, None);
    }

    #[test]
    fn test_missing_input_parses_as_none() {
        let args = CliArgs::parse_from(["skyview"]);
        assert_eq!(args.input, None);
        assert!(args.overrides.is_empty());
    }

    #[test]
    fn test_log_flags() {
        let args = CliArgs::parse_from(["skyview", "--log-level", "debug", "m.fits"]);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.input, Some(PathBuf::from("m.fits")));
    }

    #[test]
    fn test_resolve_config_reads_sidecar_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("map.fits");
        std::fs::write(
            sidecar_path(&input),
            r#"{ "order_reduce": 1, "use_relief": true }"#,
        )
        .unwrap();
        let args = CliArgs {
            input: Some(input.clone()),
            overrides: vec!["order_reduce=2".to_string()],
            ..Default::default()
        };
        let config = args.resolve_config(&input).unwrap();
        assert_eq!(config.order_reduce, 2);
        assert!(config.use_relief);
    }
}
