//! Named colour maps sampled from a normalized value.

use std::fmt;
use std::str::FromStr;

/// The available palettes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ColourMapType {
    /// Perceptually uniform blue → magenta → yellow.
    #[default]
    Plasma,
    /// Perceptually uniform purple → green → yellow.
    Viridis,
    /// Perceptually uniform black → red → pale yellow.
    Inferno,
    /// Black → white.
    Greyscale,
    /// Dark blue → cyan → yellow → dark red.
    Jet,
}

impl ColourMapType {
    /// Every palette, in display order.
    pub const ALL: [ColourMapType; 5] = [
        ColourMapType::Plasma,
        ColourMapType::Viridis,
        ColourMapType::Inferno,
        ColourMapType::Greyscale,
        ColourMapType::Jet,
    ];

    /// Lowercase name used in configuration.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ColourMapType::Plasma => "plasma",
            ColourMapType::Viridis => "viridis",
            ColourMapType::Inferno => "inferno",
            ColourMapType::Greyscale => "greyscale",
            ColourMapType::Jet => "jet",
        }
    }

    fn stops(self) -> &'static [(f32, [f32; 3])] {
        match self {
            ColourMapType::Plasma => &[
                (0.0, [0.050, 0.030, 0.528]),
                (0.25, [0.494, 0.012, 0.658]),
                (0.5, [0.798, 0.280, 0.470]),
                (0.75, [0.973, 0.585, 0.252]),
                (1.0, [0.940, 0.975, 0.131]),
            ],
            ColourMapType::Viridis => &[
                (0.0, [0.267, 0.005, 0.329]),
                (0.25, [0.229, 0.322, 0.546]),
                (0.5, [0.128, 0.567, 0.551]),
                (0.75, [0.369, 0.789, 0.383]),
                (1.0, [0.993, 0.906, 0.144]),
            ],
            ColourMapType::Inferno => &[
                (0.0, [0.001, 0.000, 0.014]),
                (0.25, [0.341, 0.062, 0.429]),
                (0.5, [0.735, 0.216, 0.330]),
                (0.75, [0.978, 0.557, 0.035]),
                (1.0, [0.988, 0.998, 0.645]),
            ],
            ColourMapType::Greyscale => &[(0.0, [0.0, 0.0, 0.0]), (1.0, [1.0, 1.0, 1.0])],
            ColourMapType::Jet => &[
                (0.0, [0.0, 0.0, 0.5]),
                (0.125, [0.0, 0.0, 1.0]),
                (0.375, [0.0, 1.0, 1.0]),
                (0.625, [1.0, 1.0, 0.0]),
                (0.875, [1.0, 0.0, 0.0]),
                (1.0, [0.5, 0.0, 0.0]),
            ],
        }
    }
}

impl fmt::Display for ColourMapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a palette name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown colour map '{0}'")]
pub struct UnknownColourMap(pub String);

impl FromStr for ColourMapType {
    type Err = UnknownColourMap;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "grey" | "gray" | "greyscale" | "grayscale" => return Ok(ColourMapType::Greyscale),
            _ => {}
        }
        ColourMapType::ALL
            .into_iter()
            .find(|kind| kind.name() == lower)
            .ok_or_else(|| UnknownColourMap(s.to_string()))
    }
}

/// Converts normalized values in `[0, 1]` to linear RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColourMap {
    kind: ColourMapType,
}

impl ColourMap {
    /// A colour map of the given palette.
    #[must_use]
    pub fn new(kind: ColourMapType) -> Self {
        Self { kind }
    }

    /// The palette.
    #[must_use]
    pub fn kind(&self) -> ColourMapType {
        self.kind
    }

    /// Sample the palette. `t` is clamped to `[0, 1]`; NaN samples the low end.
    #[must_use]
    pub fn convert(&self, t: f32) -> [f32; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let stops = self.kind.stops();
        let upper = stops
            .iter()
            .position(|&(at, _)| t <= at)
            .unwrap_or(stops.len() - 1)
            .max(1);
        let (t0, c0) = stops[upper - 1];
        let (t1, c1) = stops[upper];
        let w = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
        [
            c0[0] + w * (c1[0] - c0[0]),
            c0[1] + w * (c1[1] - c0[1]),
            c0[2] + w * (c1[2] - c0[2]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < EPSILON)
    }

    #[test]
    fn test_parse_names() {
        for kind in ColourMapType::ALL {
            assert_eq!(kind.name().parse::<ColourMapType>(), Ok(kind));
        }
        assert_eq!("Viridis".parse(), Ok(ColourMapType::Viridis));
        assert_eq!("gray".parse(), Ok(ColourMapType::Greyscale));
        assert!("rainbow-ish".parse::<ColourMapType>().is_err());
    }

    #[test]
    fn test_endpoints_match_first_and_last_stops() {
        for kind in ColourMapType::ALL {
            let map = ColourMap::new(kind);
            let stops = kind.stops();
            assert!(close(map.convert(0.0), stops[0].1), "{kind} low end");
            assert!(close(map.convert(1.0), stops[stops.len() - 1].1), "{kind} high end");
        }
    }

    #[test]
    fn test_out_of_range_clamps() {
        let map = ColourMap::new(ColourMapType::Greyscale);
        assert!(close(map.convert(-3.0), [0.0, 0.0, 0.0]));
        assert!(close(map.convert(7.0), [1.0, 1.0, 1.0]));
        assert!(close(map.convert(f32::NAN), [0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_greyscale_midpoint() {
        let map = ColourMap::new(ColourMapType::Greyscale);
        assert!(close(map.convert(0.5), [0.5, 0.5, 0.5]));
    }

    #[test]
    fn test_default_is_plasma() {
        assert_eq!(ColourMap::default().kind(), ColourMapType::Plasma);
    }

    #[test]
    fn test_gradient_is_continuous() {
        for kind in ColourMapType::ALL {
            let map = ColourMap::new(kind);
            let mut previous = map.convert(0.0);
            for step in 1..=200 {
                let current = map.convert(step as f32 / 200.0);
                let jump = current
                    .iter()
                    .zip(previous)
                    .map(|(a, b)| (a - b).abs())
                    .fold(0.0_f32, f32::max);
                assert!(jump < 0.05, "{kind} jumps by {jump} at step {step}");
                previous = current;
            }
        }
    }
}
