//! Colour mapping of normalized values.

use std::fmt;
use std::str::FromStr;

use neuroprobe_core::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// An 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a colour from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn named(name: &str) -> Option<Self> {
        let rgb = match name {
            "black" => Self::new(0, 0, 0),
            "white" => Self::new(255, 255, 255),
            "red" => Self::new(255, 0, 0),
            "green" => Self::new(0, 128, 0),
            "lime" => Self::new(0, 255, 0),
            "blue" => Self::new(0, 0, 255),
            "yellow" => Self::new(255, 255, 0),
            "cyan" | "aqua" => Self::new(0, 255, 255),
            "magenta" | "fuchsia" => Self::new(255, 0, 255),
            "gray" | "grey" => Self::new(128, 128, 128),
            "orange" => Self::new(255, 165, 0),
            "purple" => Self::new(128, 0, 128),
            _ => return None,
        };
        Some(rgb)
    }

    fn from_hex(hex: &str) -> Option<Self> {
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            // #rgb shorthand: each digit is doubled
            3 => {
                let d = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Some(Self::new(d(0)?, d(1)?, d(2)?))
            }
            _ => None,
        }
    }
}

impl FromStr for Rgb {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let parsed = match trimmed.strip_prefix('#') {
            Some(hex) if hex.is_ascii() => Self::from_hex(hex),
            Some(_) => None,
            None => Self::named(&trimmed.to_ascii_lowercase()),
        };
        parsed.ok_or_else(|| CoreError::InvalidConfig(format!("unrecognised colour '{}'", s)))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Maps values in `[-1, 1]` onto a list of evenly spaced colour stops.
///
/// Pure and deterministic; shares no state between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMapper {
    stops: Vec<Rgb>,
}

impl ColorMapper {
    /// Create a mapper from at least two stops.
    pub fn new(stops: Vec<Rgb>) -> Result<Self> {
        if stops.len() < 2 {
            return Err(CoreError::InvalidConfig(format!(
                "need at least 2 colour stops, got {}",
                stops.len()
            )));
        }
        Ok(Self { stops })
    }

    /// Create a mapper from colour names or hex codes.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let stops = names
            .iter()
            .map(|n| n.as_ref().parse())
            .collect::<Result<Vec<Rgb>>>()?;
        Self::new(stops)
    }

    /// The configured stops.
    #[must_use]
    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }

    /// Colour of a single value. Values outside `[-1, 1]` are clamped and NaN maps like 0.
    #[must_use]
    pub fn color_of(&self, value: f32) -> Rgb {
        let value = if value.is_nan() {
            0.0
        } else {
            value.clamp(-1.0, 1.0)
        };
        let last = self.stops.len() - 1;
        let scaled = (value + 1.0) / 2.0 * last as f32;
        let idx = (scaled.floor() as usize).min(last);
        let frac = scaled - idx as f32;

        if idx == last || frac == 0.0 {
            return self.stops[idx];
        }
        self.blend(idx, frac)
    }

    /// Interpolate from stop `idx` towards the next one.
    ///
    /// At the last stop there is no next one, so the previous stop is used.
    #[must_use]
    pub fn blend(&self, idx: usize, frac: f32) -> Rgb {
        let last = self.stops.len() - 1;
        let idx = idx.min(last);
        let next = if idx < last { idx + 1 } else { idx - 1 };
        let (a, b) = (self.stops[idx], self.stops[next]);

        let lerp = |x: u8, y: u8| -> u8 {
            let v = f32::from(x) + (f32::from(y) - f32::from(x)) * frac;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b))
    }

    /// Colours of every value in a normalized image.
    #[must_use]
    pub fn map_image(&self, values: &[f32]) -> Vec<Rgb> {
        values.iter().map(|&v| self.color_of(v)).collect()
    }
}

impl Default for ColorMapper {
    /// Blue for negative, black at zero, white for positive.
    fn default() -> Self {
        Self {
            stops: vec![Rgb::new(0, 0, 255), Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)],
        }
    }
}
