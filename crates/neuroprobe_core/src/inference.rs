//! Forward passes that produce the activations used as modulation.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::weights::WeightStore;

/// Output of one forward pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardPass {
    /// Index of the most probable class.
    pub prediction: usize,
    /// Per-layer activations: hidden first, output last.
    pub activations: Vec<Vec<f32>>,
}

impl ForwardPass {
    /// Hidden-layer activations, if the pass recorded them.
    #[must_use]
    pub fn hidden(&self) -> Option<&[f32]> {
        if self.activations.len() < 2 {
            return None;
        }
        self.activations.first().map(Vec::as_slice)
    }

    /// Output-layer activations.
    #[must_use]
    pub fn output(&self) -> Option<&[f32]> {
        self.activations.last().map(Vec::as_slice)
    }
}

/// Runs the trained network on one input image.
pub trait InferenceRunner {
    /// Forward `input` through the network.
    fn forward(&self, input: &[f32]) -> Result<ForwardPass>;
}

/// Dense ReLU → softmax network backed by a [`WeightStore`].
#[derive(Debug, Clone, Copy)]
pub struct DenseNetwork<'a> {
    store: &'a WeightStore,
}

impl<'a> DenseNetwork<'a> {
    /// Wrap a weight store.
    #[must_use]
    pub fn new(store: &'a WeightStore) -> Self {
        Self { store }
    }
}

impl InferenceRunner for DenseNetwork<'_> {
    fn forward(&self, input: &[f32]) -> Result<ForwardPass> {
        if input.len() != self.store.n_inputs() {
            return Err(CoreError::dimension(self.store.n_inputs(), input.len()));
        }

        let x = ArrayView1::from(input);
        let hidden = (x.dot(&self.store.input_weights()) + self.store.hidden_bias())
            .mapv(|z| z.max(0.0));
        let logits = hidden.dot(&self.store.output_weights()) + self.store.output_bias();
        let output = softmax(&logits);
        let prediction = argmax(&output);

        tracing::debug!(prediction, "forward pass");
        Ok(ForwardPass {
            prediction,
            activations: vec![hidden.to_vec(), output.to_vec()],
        })
    }
}

fn softmax(logits: &Array1<f32>) -> Array1<f32> {
    let max = logits.fold(f32::NEG_INFINITY, |m, &z| m.max(z));
    let exp = logits.mapv(|z| (z - max).exp());
    let sum = exp.sum();
    if sum > 0.0 {
        exp / sum
    } else {
        exp
    }
}

/// Index of the first maximum.
fn argmax(values: &Array1<f32>) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best, best_val), (i, &v)| {
            if v > best_val {
                (i, v)
            } else {
                (best, best_val)
            }
        })
        .0
}
