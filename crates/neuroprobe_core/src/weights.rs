//! Read-only weights of a 784 → H → C perceptron.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{CoreError, Result};
use crate::image::IMAGE_SIZE;

/// The two weight matrices and bias vectors of a trained network.
///
/// Immutable once built; every consumer borrows views.
#[derive(Debug, Clone)]
pub struct WeightStore {
    /// Input → hidden weights (784, H).
    w1: Array2<f32>,
    /// Hidden biases (H).
    b1: Array1<f32>,
    /// Hidden → output weights (H, C).
    w2: Array2<f32>,
    /// Output biases (C).
    b2: Array1<f32>,
}

impl WeightStore {
    /// Create a weight store, validating every shape against `W1`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DimensionMismatch`] if `W1` does not have 784 rows
    /// or if any bias or `W2` disagrees with the hidden/output widths.
    pub fn new(
        w1: Array2<f32>,
        b1: Array1<f32>,
        w2: Array2<f32>,
        b2: Array1<f32>,
    ) -> Result<Self> {
        let (n_inputs, n_hidden) = w1.dim();
        if n_inputs != IMAGE_SIZE {
            return Err(CoreError::dimension(IMAGE_SIZE, n_inputs));
        }
        if b1.len() != n_hidden {
            return Err(CoreError::dimension(n_hidden, b1.len()));
        }
        if w2.nrows() != n_hidden {
            return Err(CoreError::dimension(n_hidden, w2.nrows()));
        }
        if b2.len() != w2.ncols() {
            return Err(CoreError::dimension(w2.ncols(), b2.len()));
        }

        tracing::debug!(n_inputs, n_hidden, n_classes = w2.ncols(), "weight store ready");
        Ok(Self { w1, b1, w2, b2 })
    }

    /// Input → hidden weights `(784, H)`.
    #[must_use]
    pub fn input_weights(&self) -> ArrayView2<'_, f32> {
        self.w1.view()
    }

    /// Hidden biases `(H)`.
    #[must_use]
    pub fn hidden_bias(&self) -> ArrayView1<'_, f32> {
        self.b1.view()
    }

    /// Hidden → output weights `(H, C)`.
    #[must_use]
    pub fn output_weights(&self) -> ArrayView2<'_, f32> {
        self.w2.view()
    }

    /// Output biases `(C)`.
    #[must_use]
    pub fn output_bias(&self) -> ArrayView1<'_, f32> {
        self.b2.view()
    }

    /// Number of input pixels.
    #[must_use]
    pub fn n_inputs(&self) -> usize {
        self.w1.nrows()
    }

    /// Number of hidden units `H`.
    #[must_use]
    pub fn n_hidden(&self) -> usize {
        self.w1.ncols()
    }

    /// Number of output classes `C`.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.w2.ncols()
    }

    /// Incoming weights of one hidden unit, one per input pixel.
    pub fn hidden_column(&self, unit: usize) -> Result<ArrayView1<'_, f32>> {
        if unit >= self.n_hidden() {
            return Err(CoreError::out_of_range(unit, self.n_hidden()));
        }
        Ok(self.w1.column(unit))
    }
}
