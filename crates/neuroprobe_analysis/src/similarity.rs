//! Exact brute-force similarity search.

use std::cmp::Ordering;
use std::time::Instant;

use ndarray::{ArrayView1, ArrayView2, Axis};
use neuroprobe_core::{CoreError, EngineConfig, Image, IndexedImageSource, Result, IMAGE_SIZE};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One corpus match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// Corpus index.
    pub index: usize,
    /// The corpus image.
    pub image: Vec<f32>,
    /// Dot product with the query (unbounded, unnormalized).
    pub similarity: f32,
}

/// Configuration for similarity scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Corpus size at which the scan is split across the rayon pool.
    pub parallel_threshold: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 4096,
        }
    }
}

impl From<&EngineConfig> for SearchConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            parallel_threshold: config.parallel_threshold,
        }
    }
}

/// The `k` corpus images with the largest dot product against `query`.
///
/// See [`top_k_with_config`].
pub fn top_k<S>(query: &Image, corpus: &S, k: usize) -> Result<Vec<SimilarityResult>>
where
    S: IndexedImageSource + ?Sized,
{
    top_k_with_config(query, corpus, k, &SearchConfig::default())
}

/// The `k` corpus images with the largest dot product against `query`.
///
/// Every image is scored; there is no approximation. Results are sorted by
/// descending similarity with ties in ascending index order, and number
/// `min(k, corpus.len())`. Similarity is the plain dot product, so brighter
/// images score higher. NaN scores (from NaN pixels or weights) rank below
/// every number.
///
/// # Errors
///
/// [`CoreError::DimensionMismatch`] if the query is not 784 pixels or a
/// corpus image differs in length from the query. `k == 0` and an empty
/// corpus are not errors; both give an empty result.
pub fn top_k_with_config<S>(
    query: &Image,
    corpus: &S,
    k: usize,
    config: &SearchConfig,
) -> Result<Vec<SimilarityResult>>
where
    S: IndexedImageSource + ?Sized,
{
    query.check_len(IMAGE_SIZE)?;
    let n = corpus.len();
    if k == 0 || n == 0 {
        return Ok(Vec::new());
    }

    let start = Instant::now();
    let q = ArrayView1::from(query.values());
    let parallel = n >= config.parallel_threshold;

    let scores = match corpus.as_matrix() {
        Some(matrix) => score_matrix(matrix, q, parallel)?,
        None => score_indexed(corpus, q, parallel)?,
    };

    let mut ranked: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();
    // Stable: equal scores keep ascending index order
    ranked.sort_by(|a, b| descending(a.1, b.1));
    ranked.truncate(k);

    let results = ranked
        .into_iter()
        .map(|(index, similarity)| {
            Ok(SimilarityResult {
                index,
                image: corpus.image_at(index)?.to_vec(),
                similarity,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        corpus = n,
        k,
        parallel,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "similarity scan"
    );
    Ok(results)
}

/// Descending order with NaN last.
fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    }
}

fn score_matrix(
    matrix: ArrayView2<'_, f32>,
    query: ArrayView1<'_, f32>,
    parallel: bool,
) -> Result<Vec<f32>> {
    if matrix.ncols() != query.len() {
        return Err(CoreError::dimension(query.len(), matrix.ncols()));
    }
    let scores = if parallel {
        matrix
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| row.dot(&query))
            .collect()
    } else {
        matrix.outer_iter().map(|row| row.dot(&query)).collect()
    };
    Ok(scores)
}

fn score_indexed<S>(corpus: &S, query: ArrayView1<'_, f32>, parallel: bool) -> Result<Vec<f32>>
where
    S: IndexedImageSource + ?Sized,
{
    let score = |index: usize| -> Result<f32> {
        let row = corpus.image_at(index)?;
        if row.len() != query.len() {
            return Err(CoreError::dimension(query.len(), row.len()));
        }
        Ok(row.dot(&query))
    };

    if parallel {
        (0..corpus.len()).into_par_iter().map(score).collect()
    } else {
        (0..corpus.len()).map(score).collect()
    }
}
