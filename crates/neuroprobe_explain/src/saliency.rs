//! Input-conditioned saliency.

use neuroprobe_core::{CoreError, Image, Result, IMAGE_SIZE};
use serde::{Deserialize, Serialize};

/// Pointwise product of a projection and a concrete input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Saliency {
    /// The product image, carrying the projection's extremes.
    pub image: Image,
    /// Sum of all products (the projection · input dot product).
    pub total: f32,
}

/// Multiply a projection with an input image pixel by pixel.
///
/// The result keeps `projection.min()`/`projection.max()` so it is displayed
/// on the projection's scale.
///
/// # Errors
///
/// [`CoreError::DimensionMismatch`] unless both `projection` and `input`
/// are 784 pixels.
pub fn saliency(projection: &Image, input: &[f32]) -> Result<Saliency> {
    projection.check_len(IMAGE_SIZE)?;
    if input.len() != IMAGE_SIZE {
        return Err(CoreError::dimension(IMAGE_SIZE, input.len()));
    }

    let values: Vec<f32> = projection
        .values()
        .iter()
        .zip(input)
        .map(|(&p, &x)| p * x)
        .collect();
    let total = values.iter().sum();

    tracing::trace!(total, "saliency dot product");
    Ok(Saliency {
        image: Image::new(values, projection.min(), projection.max()),
        total,
    })
}
