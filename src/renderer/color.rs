use std::fmt;
use std::str::FromStr;

use colorgrad::Gradient;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WaveError};

/// Named colour scale used to paint wave heights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMap {
    /// Classic rainbow: dark blue -> cyan -> yellow -> dark red.
    #[default]
    Jet,
    /// Perceptually uniform purple -> teal -> yellow.
    Viridis,
    /// Perceptually uniform indigo -> magenta -> yellow.
    Plasma,
    /// Improved rainbow with smoother luminance than jet.
    Turbo,
}

/// Jet stops (MATLAB layout): positions and hex colours.
const JET_DOMAIN: [f32; 6] = [0.0, 0.125, 0.375, 0.625, 0.875, 1.0];
const JET_COLORS: [&str; 6] = ["#00007f", "#0000ff", "#00ffff", "#ffff00", "#ff0000", "#7f0000"];

impl ColorMap {
    pub const ALL: [ColorMap; 4] = [ColorMap::Jet, ColorMap::Viridis, ColorMap::Plasma, ColorMap::Turbo];

    pub fn name(self) -> &'static str {
        match self {
            ColorMap::Jet => "jet",
            ColorMap::Viridis => "viridis",
            ColorMap::Plasma => "plasma",
            ColorMap::Turbo => "turbo",
        }
    }

    /// Cycle to the next colour map.
    pub fn next(self) -> Self {
        match self {
            ColorMap::Jet => ColorMap::Viridis,
            ColorMap::Viridis => ColorMap::Plasma,
            ColorMap::Plasma => ColorMap::Turbo,
            ColorMap::Turbo => ColorMap::Jet,
        }
    }
}

impl fmt::Display for ColorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMap {
    type Err = WaveError;

    fn from_str(s: &str) -> Result<Self> {
        ColorMap::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                WaveError::invalid("colormap", format!("unknown colour map {s:?} (jet, viridis, plasma, turbo)"))
            })
    }
}

/// A built gradient for one colour map. Build once, sample per cell.
pub struct Palette {
    map: ColorMap,
    gradient: Box<dyn Gradient>,
}

impl fmt::Debug for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Palette").field("map", &self.map).finish()
    }
}

impl Palette {
    pub fn new(map: ColorMap) -> Result<Self> {
        let gradient: Box<dyn Gradient> = match map {
            ColorMap::Jet => Box::new(
                colorgrad::GradientBuilder::new()
                    .html_colors(&JET_COLORS)
                    .domain(&JET_DOMAIN)
                    .build::<colorgrad::LinearGradient>()
                    .map_err(|e| WaveError::Palette(format!("jet: {e}")))?,
            ),
            ColorMap::Viridis => Box::new(colorgrad::preset::viridis()),
            ColorMap::Plasma => Box::new(colorgrad::preset::plasma()),
            ColorMap::Turbo => Box::new(colorgrad::preset::turbo()),
        };
        Ok(Self { map, gradient })
    }

    pub fn map(&self) -> ColorMap {
        self.map
    }

    /// Convert a [0.0, 1.0] value to RGBA. Values outside the range are clamped.
    pub fn map_to_rgba(&self, t: f64) -> [u8; 4] {
        let t = t.clamp(0.0, 1.0) as f32;
        let [r, g, b, _] = self.gradient.at(t).to_rgba8();
        [r, g, b, 255]
    }
}
