//! Engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Which extremes normalization divides by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormMode {
    /// Each image's own min/max.
    #[default]
    Local,
    /// A min/max shared across a batch of related images.
    Global,
}

/// How raw corpus bytes map to pixel values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelScale {
    /// Bytes as-is, 0–255.
    #[default]
    Raw,
    /// Bytes divided by 255, 0–1.
    Unit,
}

impl PixelScale {
    /// Convert one stored byte to a pixel value.
    #[must_use]
    pub fn apply(self, byte: u8) -> f32 {
        match self {
            PixelScale::Raw => f32::from(byte),
            PixelScale::Unit => f32::from(byte) / 255.0,
        }
    }
}

/// Configuration for the attribution and similarity engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Colour stops spread evenly over `[-1, 1]`.
    pub colour_stops: Vec<String>,
    /// Default number of similarity matches.
    pub top_k: usize,
    /// Corpus size at which similarity scans run in parallel.
    pub parallel_threshold: usize,
    /// Default normalization mode.
    pub norm_mode: NormMode,
    /// Scale applied to corpus pixels at load time.
    pub pixel_scale: PixelScale,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            colour_stops: vec!["blue".to_string(), "black".to_string(), "white".to_string()],
            top_k: 10,
            parallel_threshold: 4096,
            norm_mode: NormMode::Local,
            pixel_scale: PixelScale::Raw,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the engine cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.colour_stops.len() < 2 {
            return Err(CoreError::InvalidConfig(format!(
                "need at least 2 colour stops, got {}",
                self.colour_stops.len()
            )));
        }
        if self.parallel_threshold == 0 {
            return Err(CoreError::InvalidConfig(
                "parallel_threshold must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
