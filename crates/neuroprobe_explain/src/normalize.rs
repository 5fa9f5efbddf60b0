//! Scaling images into display ranges.

use neuroprobe_core::{Image, NormMode};
use serde::{Deserialize, Serialize};

/// Target range of a normalized image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormRange {
    /// `[-1, 1]`, zero stays zero.
    #[default]
    Signed,
    /// `[0, 1]`, zero maps to 0.5.
    Unit,
}

/// The widest extent seen across a batch of related images.
///
/// Owned by the caller: each session or worker keeps its own copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalNorms {
    /// Smallest `min` in the batch.
    pub min: f32,
    /// Largest `max` in the batch.
    pub max: f32,
}

impl GlobalNorms {
    /// Zero extent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to zero extent.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Widen the current extent to cover `image`.
    pub fn include(&mut self, image: &Image) {
        self.min = self.min.min(image.min());
        self.max = self.max.max(image.max());
    }

    /// Extent of a batch: `max` over image maxima, `min` over image minima.
    ///
    /// An empty batch gives zero extent.
    #[must_use]
    pub fn recompute<'a, I>(images: I) -> Self
    where
        I: IntoIterator<Item = &'a Image>,
    {
        let mut iter = images.into_iter().peekable();
        if iter.peek().is_none() {
            return Self::default();
        }
        let (min, max) = iter.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), image| {
            (lo.min(image.min()), hi.max(image.max()))
        });
        Self { min, max }
    }

    /// `max(|min|, |max|)`.
    #[must_use]
    pub fn max_abs(&self) -> f32 {
        self.min.abs().max(self.max.abs())
    }
}

/// Normalize an image to `[-1, 1]`.
///
/// Values are divided by `max(|min|, |max|)`, taken from the image itself in
/// [`NormMode::Local`] or from `norms` in [`NormMode::Global`]. A zero extent
/// yields all zeros.
#[must_use]
pub fn normalize(image: &Image, mode: NormMode, norms: &GlobalNorms) -> Vec<f32> {
    let max_abs = match mode {
        NormMode::Local => image.max_abs(),
        NormMode::Global => norms.max_abs(),
    };
    if max_abs == 0.0 {
        return vec![0.0; image.len()];
    }
    image.values().iter().map(|&v| v / max_abs).collect()
}

/// Normalize an image to the requested range.
#[must_use]
pub fn normalize_to(
    image: &Image,
    mode: NormMode,
    norms: &GlobalNorms,
    range: NormRange,
) -> Vec<f32> {
    let signed = normalize(image, mode, norms);
    match range {
        NormRange::Signed => signed,
        NormRange::Unit => signed.into_iter().map(|s| (s + 1.0) / 2.0).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_normalize() {
        let image = Image::from_values(vec![-2.0, 1.0, 4.0]);
        let out = normalize(&image, NormMode::Local, &GlobalNorms::new());
        assert_eq!(out, vec![-0.5, 0.25, 1.0]);
    }

    #[test]
    fn test_zero_image_never_divides() {
        let image = Image::zeros(784);
        let out = normalize(&image, NormMode::Local, &GlobalNorms::new());
        assert!(out.iter().all(|&v| v == 0.0));

        let out = normalize(&image, NormMode::Global, &GlobalNorms::new());
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_global_normalize_uses_shared_extent() {
        let image = Image::from_values(vec![1.0, -1.0]);
        let norms = GlobalNorms { min: -4.0, max: 2.0 };
        let out = normalize(&image, NormMode::Global, &norms);
        assert_eq!(out, vec![0.25, -0.25]);
    }

    #[test]
    fn test_local_uses_carried_extremes() {
        // Extremes wider than the values: output stays inside [-0.5, 0.5]
        let image = Image::new(vec![1.0, -1.0], -2.0, 2.0);
        let out = normalize(&image, NormMode::Local, &GlobalNorms::new());
        assert_eq!(out, vec![0.5, -0.5]);
    }

    #[test]
    fn test_recompute() {
        let images = vec![
            Image::new(vec![], -3.0, 2.0),
            Image::new(vec![], 0.0, 5.0),
            Image::new(vec![], -4.0, -1.0),
        ];
        let norms = GlobalNorms::recompute(&images);
        assert_eq!(norms.max, 5.0);
        assert_eq!(norms.min, -4.0);
    }

    #[test]
    fn test_recompute_keeps_negative_max() {
        let images = vec![Image::new(vec![], -3.0, -1.0)];
        let norms = GlobalNorms::recompute(&images);
        assert_eq!(norms.max, -1.0);
        assert_eq!(norms.max_abs(), 3.0);
    }

    #[test]
    fn test_recompute_empty_batch() {
        assert_eq!(GlobalNorms::recompute(&Vec::<Image>::new()), GlobalNorms::new());
    }

    #[test]
    fn test_include_and_reset() {
        let mut norms = GlobalNorms::new();
        norms.include(&Image::new(vec![], -1.0, 3.0));
        norms.include(&Image::new(vec![], -6.0, 0.5));
        assert_eq!(norms, GlobalNorms { min: -6.0, max: 3.0 });
        norms.reset();
        assert_eq!(norms, GlobalNorms::new());
    }

    #[test]
    fn test_unit_range() {
        let image = Image::from_values(vec![-2.0, 0.0, 2.0]);
        let out = normalize_to(&image, NormMode::Local, &GlobalNorms::new(), NormRange::Unit);
        assert_eq!(out, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_norm_range_serde() {
        let json = serde_json::to_string(&NormRange::Unit).unwrap();
        assert_eq!(json, "\"unit\"");
        let decoded: NormRange = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, NormRange::Unit);
    }
}
