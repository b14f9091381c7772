//! Structured logging for the viewer.
//!
//! Console output with uptime timestamps and module paths, filterable via
//! `RUST_LOG` or an explicit level, plus optional JSON file logging.

use std::path::Path;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor an explicit level is given.
pub const DEFAULT_FILTER: &str = "info";

/// File name of the JSON log written into the log directory.
pub const LOG_FILE_NAME: &str = "skyview.log";

/// Build the filter: `RUST_LOG` wins, then `level`, then [`DEFAULT_FILTER`].
pub fn env_filter(level: Option<&str>) -> EnvFilter {
    let fallback = level
        .filter(|l| !l.trim().is_empty())
        .unwrap_or(DEFAULT_FILTER);
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - if set, also write JSON lines to `log_dir/skyview.log`
/// * `level` - filter directive used when `RUST_LOG` is unset
///
/// # Examples
///
/// ```no_run
/// skyview_log::init_logging(None, Some("debug"));
/// ```
pub fn init_logging(log_dir: Option<&Path>, level: Option<&str>) {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(console_layer);

    if let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}
