//! In-memory image corpus and labels.

use std::path::Path;

use ndarray::{Array2, ArrayView1, ArrayView2};
use neuroprobe_core::{CoreError, IndexedImageSource, PixelScale};

use crate::error::{DataError, Result};
use crate::idx::{parse_idx_images, parse_idx_labels};

/// A corpus of equally sized images stored as one row-major `(N, D)` matrix.
///
/// Similarity search scans the rows in place without copying.
#[derive(Debug, Clone)]
pub struct ImageCorpus {
    pixels: Array2<f32>,
}

impl ImageCorpus {
    /// Wrap an existing `(N, D)` matrix.
    #[must_use]
    pub fn from_array(pixels: Array2<f32>) -> Self {
        Self { pixels }
    }

    /// Build a corpus from individual images.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidShape`] if the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let n = rows.len();
        let dim = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != dim) {
            return Err(DataError::InvalidShape(format!(
                "image {} has {} pixels, expected {}",
                i,
                row.len(),
                dim
            )));
        }
        let flat: Vec<f32> = rows.into_iter().flatten().collect();
        let pixels = Array2::from_shape_vec((n, dim), flat)
            .map_err(|e| DataError::InvalidShape(e.to_string()))?;
        Ok(Self { pixels })
    }

    /// Decode an IDX image file held in memory.
    pub fn from_idx_bytes(bytes: &[u8], scale: PixelScale) -> Result<Self> {
        let parsed = parse_idx_images(bytes)?;
        let flat: Vec<f32> = parsed.pixels.iter().map(|&b| scale.apply(b)).collect();
        let pixels = Array2::from_shape_vec((parsed.count, parsed.image_len()), flat)
            .map_err(|e| DataError::InvalidShape(e.to_string()))?;

        tracing::debug!(
            images = parsed.count,
            rows = parsed.rows,
            cols = parsed.cols,
            "decoded IDX corpus"
        );
        Ok(Self { pixels })
    }

    /// Read and decode an IDX image file.
    pub fn from_idx_file<P: AsRef<Path>>(path: P, scale: PixelScale) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_idx_bytes(&bytes, scale)
    }

    /// Pixels per image.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.pixels.ncols()
    }

    /// Copy of one image's pixels.
    pub fn image_vec(&self, index: usize) -> Result<Vec<f32>> {
        Ok(self.image_at(index)?.to_vec())
    }
}

impl IndexedImageSource for ImageCorpus {
    fn len(&self) -> usize {
        self.pixels.nrows()
    }

    fn image_at(&self, index: usize) -> neuroprobe_core::Result<ArrayView1<'_, f32>> {
        if index >= self.pixels.nrows() {
            return Err(CoreError::out_of_range(index, self.pixels.nrows()));
        }
        Ok(self.pixels.row(index))
    }

    fn as_matrix(&self) -> Option<ArrayView2<'_, f32>> {
        Some(self.pixels.view())
    }
}

/// Class labels parallel to an [`ImageCorpus`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<u8>,
}

impl LabelSet {
    /// Wrap raw labels.
    #[must_use]
    pub fn new(labels: Vec<u8>) -> Self {
        Self { labels }
    }

    /// Decode an IDX label file held in memory.
    pub fn from_idx_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(parse_idx_labels(bytes)?))
    }

    /// Read and decode an IDX label file.
    pub fn from_idx_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_idx_bytes(&bytes)
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if there are no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label of one image.
    pub fn label_at(&self, index: usize) -> Result<u8> {
        self.labels
            .get(index)
            .copied()
            .ok_or(DataError::IndexOutOfBounds {
                index,
                length: self.labels.len(),
            })
    }
}
