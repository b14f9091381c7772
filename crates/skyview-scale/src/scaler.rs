//! Manual or automatic linear scaling from an input range to an output range.

use tracing::debug;

use crate::{Range, ScaleError};

/// `y = scale * x + offset`, with no clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    /// Multiplier.
    pub scale: f32,
    /// Additive term.
    pub offset: f32,
}

impl LinearScale {
    /// Map `input` onto `output`.
    ///
    /// A zero-width input maps every value to `output.min`.
    #[must_use]
    pub fn between(input: Range, output: Range) -> Self {
        let span = input.span();
        let scale = if span > 0.0 {
            output.span() / span
        } else {
            0.0
        };
        Self {
            scale,
            offset: output.min - scale * input.min,
        }
    }

    /// Apply the transform to a single value.
    #[inline]
    #[must_use]
    pub fn apply(&self, value: f32) -> f32 {
        self.scale * value + self.offset
    }

    /// Apply the transform to every value.
    #[must_use]
    pub fn apply_all(&self, values: &[f32]) -> Vec<f32> {
        values.iter().map(|&v| self.apply(v)).collect()
    }
}

/// One scaling channel: an input range, an output range and the transform
/// between them.
///
/// The channel is in autoscale mode while its input range is the searching
/// sentinel. In that mode [`prepare`](Self::prepare) scans the data before
/// computing the transform; otherwise the bound input is used verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeScaler {
    input: Range,
    output: Range,
    autoscale: bool,
    transform: Option<LinearScale>,
}

impl RangeScaler {
    /// A searching scaler targeting `output`.
    #[must_use]
    pub fn new(output: Range) -> Self {
        Self {
            input: Range::SEARCHING,
            output,
            autoscale: true,
            transform: None,
        }
    }

    /// A searching scaler targeting `[0, 1]`.
    #[must_use]
    pub fn unit() -> Self {
        Self::new(Range::UNIT)
    }

    /// Forget any bounds and computed transform; autoscale again.
    pub fn reset_to_searching(&mut self) {
        self.input = Range::SEARCHING;
        self.autoscale = true;
        self.transform = None;
    }

    /// Use explicit input bounds and stop autoscaling.
    pub fn bind(&mut self, min: f32, max: f32) -> Result<(), ScaleError> {
        self.input = Range::new(min, max)?;
        self.autoscale = false;
        self.transform = None;
        Ok(())
    }

    /// Bind to `input`, or reset to searching if `input` is the sentinel.
    pub fn bind_or_search(&mut self, input: Range) -> Result<(), ScaleError> {
        if input.is_searching() {
            self.reset_to_searching();
            Ok(())
        } else {
            self.bind(input.min, input.max)
        }
    }

    /// Set the output interval. Invalidates any computed transform.
    pub fn set_output(&mut self, output: Range) -> Result<(), ScaleError> {
        self.output = Range::new(output.min, output.max)?;
        self.transform = None;
        Ok(())
    }

    /// Set the output interval, or `default` if `configured` is the sentinel.
    pub fn set_output_or_default(
        &mut self,
        configured: Range,
        default: Range,
    ) -> Result<(), ScaleError> {
        if configured.is_searching() {
            self.set_output(default)
        } else {
            self.set_output(configured)
        }
    }

    /// Widen the searching input range. Ignored once bounds are bound.
    pub fn observe(&mut self, value: f32) {
        if self.autoscale {
            self.input.update(value);
        }
    }

    /// Compute the transform from the current input bounds.
    pub fn finalize_scaling(&mut self) -> Result<LinearScale, ScaleError> {
        if !self.input.is_bound() {
            return Err(ScaleError::Unbound);
        }
        let transform = LinearScale::between(self.input, self.output);
        self.transform = Some(transform);
        Ok(transform)
    }

    /// Scan `values` if autoscaling, then finalize.
    pub fn prepare(&mut self, values: &[f32]) -> Result<LinearScale, ScaleError> {
        if self.autoscale {
            for &value in values {
                self.observe(value);
            }
            debug!(input = %self.input, output = %self.output, "autoscaled range");
        }
        self.finalize_scaling()
    }

    /// Reset to searching and autoscale from `values`.
    pub fn autoscale_from(&mut self, values: &[f32]) -> Result<LinearScale, ScaleError> {
        self.reset_to_searching();
        self.prepare(values)
    }

    /// Apply the finalized transform.
    pub fn transform(&self, value: f32) -> Result<f32, ScaleError> {
        self.transform
            .map(|t| t.apply(value))
            .ok_or(ScaleError::NotFinalized)
    }

    /// Current input range (the sentinel while nothing has been observed).
    #[must_use]
    pub fn input(&self) -> Range {
        self.input
    }

    /// Output range.
    #[must_use]
    pub fn output(&self) -> Range {
        self.output
    }

    /// Whether this channel discovers its input range from data.
    #[must_use]
    pub fn is_autoscale(&self) -> bool {
        self.autoscale
    }

    /// The finalized transform, if any.
    #[must_use]
    pub fn linear_scale(&self) -> Option<LinearScale> {
        self.transform
    }
}

impl Default for RangeScaler {
    fn default() -> Self {
        Self::unit()
    }
}
