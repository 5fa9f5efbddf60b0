//! Image values paired with the extremes of their construction.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Side length of a square input image.
pub const IMAGE_SIDE: usize = 28;

/// Number of pixels in one input image.
pub const IMAGE_SIZE: usize = IMAGE_SIDE * IMAGE_SIDE;

/// A reconstructed or raw image.
///
/// `min` and `max` record the extremes observed by whatever produced the
/// image. They are not rescanned when the values are transformed, so a
/// saliency map can carry the extremes of the projection it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    values: Vec<f32>,
    min: f32,
    max: f32,
}

impl Image {
    /// Create an image with explicit extremes.
    #[must_use]
    pub fn new(values: Vec<f32>, min: f32, max: f32) -> Self {
        Self { values, min, max }
    }

    /// Create an image whose extremes are scanned from `values`.
    ///
    /// An empty vector gets `min = max = 0`.
    #[must_use]
    pub fn from_values(values: Vec<f32>) -> Self {
        let (min, max) = extremes(&values);
        Self { values, min, max }
    }

    /// An all-zero image of `len` pixels with `min = max = 0`.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
            min: 0.0,
            max: 0.0,
        }
    }

    /// Pixel values.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Consume the image, returning its pixel values.
    #[must_use]
    pub fn into_values(self) -> Vec<f32> {
        self.values
    }

    /// Smallest value recorded at construction.
    #[must_use]
    pub const fn min(&self) -> f32 {
        self.min
    }

    /// Largest value recorded at construction.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// `max(|min|, |max|)`.
    #[must_use]
    pub fn max_abs(&self) -> f32 {
        self.min.abs().max(self.max.abs())
    }

    /// Number of pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the image has no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fail with [`CoreError::DimensionMismatch`] unless the image has `expected` pixels.
    pub fn check_len(&self, expected: usize) -> Result<()> {
        if self.values.len() != expected {
            return Err(CoreError::dimension(expected, self.values.len()));
        }
        Ok(())
    }
}

/// Smallest and largest element, `(0, 0)` for an empty slice.
pub(crate) fn extremes(values: &[f32]) -> (f32, f32) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
