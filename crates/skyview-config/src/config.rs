//! Raw sidecar keys and the resolved viewer configuration.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use skyview_projection::{ProjectionPanel, ProjectionType};
use skyview_scale::{ColourMapType, Range};

use crate::error::ConfigError;

/// Relief output interval used when none is configured.
pub const DEFAULT_RELIEF_OUTPUT: (f32, f32) = (0.0, 0.1);

/// [`DEFAULT_RELIEF_OUTPUT`] as a [`Range`].
#[must_use]
pub fn default_relief_output() -> Range {
    Range {
        min: DEFAULT_RELIEF_OUTPUT.0,
        max: DEFAULT_RELIEF_OUTPUT.1,
    }
}

/// Keys recognized in the JSON sidecar, exactly as written.
///
/// Every key is optional; unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SidecarConfig {
    /// Number of orders to drop when downsampling.
    pub order_reduce: Option<i64>,
    /// Displace the sphere surface by the relief channel.
    pub use_relief: Option<bool>,
    /// Palette name.
    pub colourmap_type: Option<String>,
    /// `[min, max]` for the colour channel; absent means autoscale.
    pub colourmap_input_range: Option<Vec<f32>>,
    /// `[min, max]` for the relief channel; absent means inherit or autoscale.
    pub reliefmap_input_range: Option<Vec<f32>>,
    /// `[min, max]` displacement range.
    pub reliefmap_output_range: Option<Vec<f32>>,
    /// Projection name; absent means no 2D panel.
    pub projection: Option<String>,
    /// `[x, y, z]` placement of the 2D panel.
    pub projection_position: Option<Vec<f32>>,
    /// Scale of the 2D panel.
    pub projection_radius: Option<f32>,
}

/// Resolved, immutable viewer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Orders to drop when downsampling.
    pub order_reduce: u32,
    /// Whether the relief channel is enabled.
    pub use_relief: bool,
    /// Palette for the colour channel.
    pub colourmap: ColourMapType,
    /// Colour channel input; [`Range::SEARCHING`] means autoscale.
    pub colourmap_input_range: Range,
    /// Relief channel input; [`Range::SEARCHING`] means autoscale.
    pub reliefmap_input_range: Range,
    /// Relief channel output; [`Range::SEARCHING`] means
    /// [`DEFAULT_RELIEF_OUTPUT`].
    pub reliefmap_output_range: Range,
    /// The 2D projection panel, if requested.
    pub projection: Option<ProjectionPanel>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            order_reduce: 0,
            use_relief: false,
            colourmap: ColourMapType::default(),
            colourmap_input_range: Range::SEARCHING,
            reliefmap_input_range: Range::SEARCHING,
            reliefmap_output_range: Range::SEARCHING,
            projection: None,
        }
    }
}

impl ViewerConfig {
    /// The relief output interval with the default substituted.
    #[must_use]
    pub fn relief_output(&self) -> Range {
        if self.reliefmap_output_range.is_searching() {
            default_relief_output()
        } else {
            self.reliefmap_output_range
        }
    }
}

// --- Resolution ---

impl SidecarConfig {
    /// Validate every key and resolve names into closed variants.
    ///
    /// Unknown palette or projection names fall back to their defaults with a
    /// warning. Ranges that are not two elements long are ignored with a
    /// warning.
    pub fn resolve(&self) -> Result<ViewerConfig, ConfigError> {
        let mut config = ViewerConfig::default();

        if let Some(levels) = self.order_reduce {
            config.order_reduce =
                u32::try_from(levels).map_err(|_| ConfigError::InvalidValue {
                    key: "order_reduce",
                    message: format!("{levels} is not a non-negative level count"),
                })?;
        }

        config.use_relief = self.use_relief.unwrap_or(false);

        if let Some(name) = &self.colourmap_type {
            config.colourmap = name.parse().unwrap_or_else(|_| {
                log::warn!(
                    "Unknown colour map {name}, reverting to {}",
                    ColourMapType::default()
                );
                ColourMapType::default()
            });
        }

        if let Some(range) = pair("colourmap_input_range", &self.colourmap_input_range)? {
            config.colourmap_input_range = range;
            config.reliefmap_input_range = range;
        }
        if let Some(range) = pair("reliefmap_input_range", &self.reliefmap_input_range)? {
            config.reliefmap_input_range = range;
        }
        if let Some(range) = pair("reliefmap_output_range", &self.reliefmap_output_range)? {
            config.reliefmap_output_range = range;
        }

        if let Some(name) = self.projection.as_deref().filter(|n| !n.is_empty()) {
            let kind = name.parse().unwrap_or_else(|_| {
                log::warn!(
                    "Unknown projection {name}, reverting to {}",
                    ProjectionType::default()
                );
                ProjectionType::default()
            });
            config.projection = Some(ProjectionPanel {
                kind,
                position: self.position()?,
                radius: self.projection_radius.unwrap_or(1.0),
            });
        }

        Ok(config)
    }

    fn position(&self) -> Result<Vec3, ConfigError> {
        match self.projection_position.as_deref() {
            None => Ok(Vec3::ZERO),
            Some(&[x, y, z]) => Ok(Vec3::new(x, y, z)),
            Some(other) => {
                log::warn!(
                    "projection_position needs 3 elements, got {}; using origin",
                    other.len()
                );
                Ok(Vec3::ZERO)
            }
        }
    }
}

fn pair(key: &'static str, values: &Option<Vec<f32>>) -> Result<Option<Range>, ConfigError> {
    match values.as_deref() {
        None => Ok(None),
        Some(&[min, max]) => Range::new(min, max)
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                key,
                message: e.to_string(),
            }),
        Some(other) => {
            log::warn!("{key} needs 2 elements, got {}; ignoring", other.len());
            Ok(None)
        }
    }
}
