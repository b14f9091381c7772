//! Two-stage configuration: sidecar file, then command-line overrides.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::{ConfigError, SidecarConfig, ViewerConfig};

/// Path of the sidecar for `input`: the input path with `.json` appended.
#[must_use]
pub fn sidecar_path(input: &Path) -> PathBuf {
    let mut path = input.as_os_str().to_owned();
    path.push(".json");
    PathBuf::from(path)
}

/// Collects raw keys from the sidecar and from overrides, then resolves them.
///
/// Later sources replace earlier ones key by key.
#[derive(Debug, Clone, Default)]
pub struct ViewerConfigBuilder {
    keys: Map<String, Value>,
}

impl ViewerConfigBuilder {
    /// An empty builder; [`build`](Self::build) on it yields the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge keys from the sidecar at `path`.
    ///
    /// A missing, unreadable or malformed sidecar is not an error: it is
    /// logged and every key keeps its default.
    #[must_use]
    pub fn with_sidecar(mut self, path: &Path) -> Self {
        log::info!("Attempt to read JSON config at {}", path.display());
        match read_sidecar(path) {
            Ok(Some(keys)) => {
                log::info!("Loaded config from {}", path.display());
                self.keys.extend(keys);
            }
            Ok(None) => log::info!("No config at {}, using defaults", path.display()),
            Err(e) => log::warn!("Ignoring config at {}: {e}", path.display()),
        }
        self
    }

    /// Merge keys from a JSON document.
    pub fn with_json(mut self, contents: &str) -> Result<Self, ConfigError> {
        self.keys.extend(parse_object(contents)?);
        Ok(self)
    }

    /// Apply a single `key=value` override.
    ///
    /// The value is parsed as JSON when possible (`order_reduce=2`,
    /// `colourmap_input_range=[0,1]`) and taken as a plain string otherwise
    /// (`colourmap_type=viridis`).
    pub fn with_override(mut self, arg: &str) -> Result<Self, ConfigError> {
        let (key, raw) = arg
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::InvalidOverride(arg.to_string()))?;
        let value =
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        log::debug!("Override {key} = {value}");
        self.keys.insert(key.trim().to_string(), value);
        Ok(self)
    }

    /// Apply every override in order.
    pub fn with_overrides<I, S>(self, args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        args.into_iter()
            .try_fold(self, |builder, arg| builder.with_override(arg.as_ref()))
    }

    /// The merged raw keys.
    pub fn sidecar(&self) -> Result<SidecarConfig, ConfigError> {
        serde_json::from_value(Value::Object(self.keys.clone())).map_err(ConfigError::TypeError)
    }

    /// Resolve the merged keys into the final configuration.
    pub fn build(self) -> Result<ViewerConfig, ConfigError> {
        self.sidecar()?.resolve()
    }
}

fn read_sidecar(path: &Path) -> Result<Option<Map<String, Value>>, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::ReadError(e)),
    };
    parse_object(&contents).map(Some)
}

fn parse_object(contents: &str) -> Result<Map<String, Value>, ConfigError> {
    match serde_json::from_str(contents).map_err(ConfigError::ParseError)? {
        Value::Object(keys) => Ok(keys),
        _ => Err(ConfigError::NotAnObject),
    }
}
