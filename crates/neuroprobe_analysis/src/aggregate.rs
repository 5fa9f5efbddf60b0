//! Similarity-weighted averaging of search results.

use ndarray::{Array1, ArrayView1};
use neuroprobe_core::{CoreError, Image, Result};

use crate::similarity::SimilarityResult;

/// Average the matched images, weighting each by its similarity.
///
/// Each image is scaled by `s_r / Σ s` before summing, so a single result is
/// reproduced exactly. If any of those weights overflows (similarities that
/// nearly cancel), the weighted sum is accumulated first and divided by `Σ s`
/// once. When the similarities sum to exactly zero the weighted sum is
/// returned unnormalized.
///
/// # Errors
///
/// [`CoreError::EmptyInput`] for an empty result list and
/// [`CoreError::DimensionMismatch`] if the images differ in length.
pub fn aggregate(results: &[SimilarityResult]) -> Result<Image> {
    let first = results
        .first()
        .ok_or_else(|| CoreError::EmptyInput("aggregate needs at least one result".to_string()))?;
    let dim = first.image.len();
    if let Some(bad) = results.iter().find(|r| r.image.len() != dim) {
        return Err(CoreError::dimension(dim, bad.image.len()));
    }

    let total: f32 = results.iter().map(|r| r.similarity).sum();
    if total == 0.0 {
        tracing::warn!(
            results = results.len(),
            "similarities sum to zero, returning unnormalized sum"
        );
        return Ok(Image::from_values(weighted_sum(results, 1.0).to_vec()));
    }

    let weights_finite = results.iter().all(|r| (r.similarity / total).is_finite());
    let acc = if weights_finite {
        weighted_sum(results, total)
    } else {
        tracing::debug!(total, "similarity weights overflow, dividing after summing");
        weighted_sum(results, 1.0) / total
    };

    Ok(Image::from_values(acc.to_vec()))
}

/// `Σ_r image_r · (s_r / divisor)`.
fn weighted_sum(results: &[SimilarityResult], divisor: f32) -> Array1<f32> {
    let dim = results.first().map_or(0, |r| r.image.len());
    let mut acc = Array1::<f32>::zeros(dim);
    for result in results {
        let image = ArrayView1::from(result.image.as_slice());
        acc.scaled_add(result.similarity / divisor, &image);
    }
    acc
}
