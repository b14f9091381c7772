//! `skyview` binary: load a HEALPix FITS map, apply its sidecar config and
//! overrides, and prepare it for display.
//!
//! Run with `skyview path/to/map.fits [key=value ...]`. Settings are read from
//! `path/to/map.fits.json` when it exists.

use std::process::ExitCode;

use clap::Parser;
use skyview_app::{INITIAL_SCENE_ROTATION, ViewSession, ViewerError, load_field};
use skyview_config::CliArgs;
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    skyview_log::init_logging(args.log_dir.as_deref(), args.log_level.as_deref());

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(ViewerError::MissingInput) => {
            eprintln!("Usage: skyview path/to/fitsfile [key=value ...]");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), ViewerError> {
    let input = args.input.as_deref().ok_or(ViewerError::MissingInput)?;
    let config = args.resolve_config(input)?;

    let field = load_field(input).map_err(|source| ViewerError::LoadFailure {
        path: input.to_path_buf(),
        source,
    })?;
    info!(
        nside = field.nside(),
        ordering = %field.ordering(),
        pixels = field.len(),
        "loaded {}",
        input.display()
    );

    let session = ViewSession::prepare(
        &config,
        field,
        &input.display().to_string(),
        INITIAL_SCENE_ROTATION,
    )?;

    info!(range = %session.colour_range(), colourmap = %session.colour_map().kind(), "colour bar");
    if let Some(relief) = session.relief_scaler() {
        info!(input = %relief.input(), output = %relief.output(), "relief");
    }
    if let (Some(panel), Some(buffers)) = (session.panel(), session.projection_buffers())
        && let Some((lo, hi)) = panel.extents(&buffers.latlong)
    {
        info!(min = ?lo, max = ?hi, "{}", panel.label());
    }

    Ok(())
}
