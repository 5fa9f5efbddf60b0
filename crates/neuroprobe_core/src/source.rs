//! Random access into an image corpus.

use ndarray::{ArrayView1, ArrayView2};

use crate::error::{CoreError, Result};

/// A corpus of fixed-width images addressable by index.
///
/// Implementations must answer [`image_at`](Self::image_at) in time
/// independent of the corpus size.
pub trait IndexedImageSource: Sync {
    /// Number of images.
    fn len(&self) -> usize;

    /// Check if the corpus holds no images.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The image at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IndexOutOfRange`] if `index >= len()`.
    fn image_at(&self, index: usize) -> Result<ArrayView1<'_, f32>>;

    /// The whole corpus as a row-major `(len, dim)` matrix, if it is stored that way.
    fn as_matrix(&self) -> Option<ArrayView2<'_, f32>> {
        None
    }
}

impl IndexedImageSource for Vec<Vec<f32>> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn image_at(&self, index: usize) -> Result<ArrayView1<'_, f32>> {
        self.get(index)
            .map(|row| ArrayView1::from(row.as_slice()))
            .ok_or_else(|| CoreError::out_of_range(index, Vec::len(self)))
    }
}
