//! Everything the viewer derives from one loaded map.
//!
//! [`ViewSession::prepare`] runs the setup pipeline once: order reduction,
//! colour and relief scaling, the sphere colour buffer and the optional 2D
//! projection. [`ViewSession::tick`] is then called once per loop iteration
//! and recomputes the projection when the scene has been rotated.

use glam::Quat;
use skyview_config::{ViewerConfig, default_relief_output};
use skyview_healpix::{Healpix, PixelIndexMapper, SphericalField, downsample};
use skyview_projection::{ProjectionBuffers, ProjectionPanel, ProjectionSync, reproject};
use skyview_scale::{ColourMap, LinearScale, Range, RangeScaler};
use tracing::{debug, info};

use crate::ViewerError;

/// Radius of the undisplaced sphere.
pub const SPHERE_RADIUS: f32 = 1.0;

/// Per-pixel buffers for the sphere, in NEST order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceBuffers {
    /// Linear RGB colour of each pixel.
    pub colours: Vec<[f32; 3]>,
    /// Distance of each pixel from the centre, present when relief is on.
    pub radii: Option<Vec<f32>>,
}

/// The 2D panel, its tracker and the latest projected buffers.
#[derive(Debug, Clone)]
struct ProjectionState {
    panel: ProjectionPanel,
    sync: ProjectionSync,
    buffers: ProjectionBuffers,
    reprojections: u64,
}

/// A prepared map ready to be displayed.
#[derive(Debug, Clone)]
pub struct ViewSession<M = Healpix> {
    mapper: M,
    source_order: u32,
    field: SphericalField,
    colour_map: ColourMap,
    colour_scaler: RangeScaler,
    colour_scale: LinearScale,
    relief_scaler: Option<RangeScaler>,
    surface: SurfaceBuffers,
    projection: Option<ProjectionState>,
    caption: String,
}

impl ViewSession<Healpix> {
    /// Prepare `field` for display using the standard HEALPix geometry.
    ///
    /// * `source` - name shown in the caption, usually the input path
    /// * `initial_orientation` - scene rotation when the view opens
    pub fn prepare(
        config: &ViewerConfig,
        field: SphericalField,
        source: &str,
        initial_orientation: Quat,
    ) -> Result<Self, ViewerError> {
        Self::prepare_with(Healpix, config, field, source, initial_orientation)
    }
}

impl<M: PixelIndexMapper> ViewSession<M> {
    /// [`prepare`](ViewSession::prepare) with an explicit index mapper.
    pub fn prepare_with(
        mapper: M,
        config: &ViewerConfig,
        field: SphericalField,
        source: &str,
        initial_orientation: Quat,
    ) -> Result<Self, ViewerError> {
        let source_order = field.order();
        let field = downsample(&field, config.order_reduce, &mapper)?;

        let mut colour_scaler = RangeScaler::unit();
        colour_scaler.bind_or_search(config.colourmap_input_range)?;
        let colour_scale = colour_scaler.prepare(field.values())?;
        debug!(input = %colour_scaler.input(), "colour scaling ready");

        let colour_map = ColourMap::new(config.colourmap);
        let colours = field
            .values()
            .iter()
            .map(|&v| colour_map.convert(colour_scale.apply(v)))
            .collect();

        let (relief_scaler, radii) = if config.use_relief {
            let mut scaler = RangeScaler::unit();
            scaler.set_output_or_default(config.reliefmap_output_range, default_relief_output())?;
            scaler.bind_or_search(config.reliefmap_input_range)?;
            let scale = scaler.prepare(field.values())?;
            debug!(input = %scaler.input(), output = %scaler.output(), "relief scaling ready");
            let radii = field
                .values()
                .iter()
                .map(|&v| SPHERE_RADIUS + scale.apply(v))
                .collect();
            (Some(scaler), Some(radii))
        } else {
            (None, None)
        };

        let projection = config.projection.map(|panel| {
            let buffers = reproject(&field, &mapper, &colour_scale, &colour_map, Quat::IDENTITY);
            info!(label = %panel.label(), pixels = buffers.len(), "projection panel ready");
            ProjectionState {
                panel,
                sync: ProjectionSync::new(initial_orientation),
                buffers,
                reprojections: 0,
            }
        });

        let caption = caption(source_order, field.order(), source, &colour_map);
        info!("{caption}");

        Ok(Self {
            mapper,
            source_order,
            field,
            colour_map,
            colour_scaler,
            colour_scale,
            relief_scaler,
            surface: SurfaceBuffers { colours, radii },
            projection,
            caption,
        })
    }

    /// Per-iteration update. Returns the new projection if it was recomputed.
    ///
    /// Nothing is recomputed while `interaction_active` is set, or when the
    /// orientation matches the last projected one.
    pub fn tick(
        &mut self,
        orientation: Quat,
        interaction_active: bool,
    ) -> Option<&ProjectionBuffers> {
        let state = self.projection.as_mut()?;
        let request = state.sync.maybe_reproject(orientation, interaction_active)?;

        state.buffers = reproject(
            &self.field,
            &self.mapper,
            &self.colour_scale,
            &self.colour_map,
            request.rotation,
        );
        state.reprojections += 1;
        debug!(count = state.reprojections, "reprojected");
        Some(&state.buffers)
    }

    /// The reduced field being displayed.
    pub fn field(&self) -> &SphericalField {
        &self.field
    }

    /// Order of the field before reduction.
    pub fn source_order(&self) -> u32 {
        self.source_order
    }

    /// Palette applied to the colour channel.
    pub fn colour_map(&self) -> &ColourMap {
        &self.colour_map
    }

    /// The colour channel scaler, with its bound or discovered input.
    pub fn colour_scaler(&self) -> &RangeScaler {
        &self.colour_scaler
    }

    /// The relief scaler, when relief is enabled.
    pub fn relief_scaler(&self) -> Option<&RangeScaler> {
        self.relief_scaler.as_ref()
    }

    /// Colour input range, for labelling a colour bar.
    pub fn colour_range(&self) -> Range {
        self.colour_scaler.input()
    }

    /// Sphere buffers.
    pub fn surface(&self) -> &SurfaceBuffers {
        &self.surface
    }

    /// The projection panel, if configured.
    pub fn panel(&self) -> Option<&ProjectionPanel> {
        self.projection.as_ref().map(|state| &state.panel)
    }

    /// The current projection buffers, if a panel is configured.
    pub fn projection_buffers(&self) -> Option<&ProjectionBuffers> {
        self.projection.as_ref().map(|state| &state.buffers)
    }

    /// How many times the projection has been recomputed since setup.
    pub fn reprojections(&self) -> u64 {
        self.projection.as_ref().map_or(0, |state| state.reprojections)
    }

    /// One-line description of what is displayed.
    pub fn caption(&self) -> &str {
        &self.caption
    }
}

fn caption(source_order: u32, plotted_order: u32, source: &str, colour_map: &ColourMap) -> String {
    format!(
        "{source_order}{} order HEALPix data from {source} plotted at {plotted_order}{} order (colourmap: {})",
        ordinal_suffix(source_order),
        ordinal_suffix(plotted_order),
        colour_map.kind(),
    )
}

/// English suffix used for orders in captions.
pub fn ordinal_suffix(n: u32) -> &'static str {
    match n {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}
