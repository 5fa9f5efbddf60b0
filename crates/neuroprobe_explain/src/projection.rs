//! Projection of hidden units back into input-pixel space.

use ndarray::{Array1, ArrayView1};
use neuroprobe_core::{CoreError, Image, Result, Selection, WeightStore};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::normalize::GlobalNorms;

/// Per-hidden-unit multipliers applied during projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modulation {
    values: Vec<f32>,
}

impl Modulation {
    /// Wrap a hidden activation vector (or any length-H weighting).
    #[must_use]
    pub fn from_activations(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Top-down weighting towards a set of output classes.
    ///
    /// `m[j]` is the sum of `W2[j][c]` over the selected classes, multiplied
    /// by `hidden[j]` when hidden activations are supplied.
    ///
    /// # Errors
    ///
    /// [`CoreError::IndexOutOfRange`] for an unknown class and
    /// [`CoreError::DimensionMismatch`] for activations of the wrong length.
    pub fn from_class_weights<I>(
        store: &WeightStore,
        classes: I,
        hidden: Option<&[f32]>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let n_hidden = store.n_hidden();
        let n_classes = store.n_classes();
        let w2 = store.output_weights();

        let mut values = Array1::<f32>::zeros(n_hidden);
        for class in classes {
            if class >= n_classes {
                return Err(CoreError::out_of_range(class, n_classes));
            }
            values += &w2.column(class);
        }

        if let Some(hidden) = hidden {
            if hidden.len() != n_hidden {
                return Err(CoreError::dimension(n_hidden, hidden.len()));
            }
            values.zip_mut_with(&ArrayView1::from(hidden), |m, &a| *m *= a);
        }

        Ok(Self {
            values: values.to_vec(),
        })
    }

    /// The multipliers, one per hidden unit.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of hidden units covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the modulation is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Split units by the sign of their multiplier.
    #[must_use]
    pub fn partition(&self) -> SelectionPartition {
        let mut partition = SelectionPartition::default();
        for (unit, &m) in self.values.iter().enumerate() {
            if m > 0.0 {
                partition.positive.insert(unit);
            } else if m < 0.0 {
                partition.negative.insert(unit);
            }
            if m != 0.0 {
                partition.hyperplane.insert(unit);
            }
        }
        partition
    }
}

/// Selections derived from the sign of a [`Modulation`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionPartition {
    /// Units with a positive multiplier.
    pub positive: Selection,
    /// Units with a negative multiplier.
    pub negative: Selection,
    /// Units with a non-zero multiplier.
    pub hyperplane: Selection,
}

/// Positive, negative and combined decodings produced together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodingTriple {
    /// Decoding of the positively modulated units.
    pub positive: Image,
    /// Decoding of the negatively modulated units.
    pub negative: Image,
    /// Decoding of every modulated unit.
    pub hyperplane: Image,
}

impl DecodingTriple {
    /// The three images in positive, negative, hyperplane order.
    #[must_use]
    pub fn images(&self) -> [&Image; 3] {
        [&self.positive, &self.negative, &self.hyperplane]
    }

    /// Shared extremes of the triple.
    #[must_use]
    pub fn global_norms(&self) -> GlobalNorms {
        GlobalNorms::recompute(self.images())
    }
}

/// Builds input-space images from weighted sums of hidden-unit weight vectors.
///
/// The weight store is only ever borrowed immutably.
#[derive(Debug, Clone, Copy)]
pub struct Projector<'a> {
    store: &'a WeightStore,
}

impl<'a> Projector<'a> {
    /// Create a projector over a weight store.
    #[must_use]
    pub fn new(store: &'a WeightStore) -> Self {
        Self { store }
    }

    /// The underlying weights.
    #[must_use]
    pub fn store(&self) -> &'a WeightStore {
        self.store
    }

    /// Project a selection into pixel space.
    ///
    /// `value[i] = Σ_{j ∈ selection} W1[i][j] · weight(j)` where `weight(j)` is 1
    /// without modulation, `|m[j]|` when `use_absolute`, and `m[j]` otherwise.
    /// An empty selection yields an all-zero image with `min = max = 0`.
    ///
    /// # Errors
    ///
    /// [`CoreError::IndexOutOfRange`] if the selection names a unit `>= H`,
    /// [`CoreError::DimensionMismatch`] if the modulation length is not `H`.
    pub fn project(
        &self,
        selection: &Selection,
        modulation: Option<&[f32]>,
        use_absolute: bool,
    ) -> Result<Image> {
        let n_hidden = self.store.n_hidden();
        selection.validate(n_hidden)?;
        if let Some(m) = modulation {
            if m.len() != n_hidden {
                return Err(CoreError::dimension(n_hidden, m.len()));
            }
        }

        let w1 = self.store.input_weights();
        let mut values = Array1::<f32>::zeros(self.store.n_inputs());
        for unit in selection {
            let weight = match modulation {
                None => 1.0,
                Some(m) if use_absolute => m[unit].abs(),
                Some(m) => m[unit],
            };
            values.scaled_add(weight, &w1.column(unit));
        }

        tracing::debug!(
            units = selection.len(),
            modulated = modulation.is_some(),
            use_absolute,
            "projected selection"
        );
        Ok(Image::from_values(values.to_vec()))
    }

    /// Project the positive, negative and hyperplane partitions of a modulation.
    pub fn decode(&self, modulation: &Modulation, use_absolute: bool) -> Result<DecodingTriple> {
        let partition = modulation.partition();
        let m = Some(modulation.values());
        Ok(DecodingTriple {
            positive: self.project(&partition.positive, m, use_absolute)?,
            negative: self.project(&partition.negative, m, use_absolute)?,
            hyperplane: self.project(&partition.hyperplane, m, use_absolute)?,
        })
    }

    /// One unweighted image per hidden unit.
    #[must_use]
    pub fn feature_encodings(&self) -> Vec<Image> {
        let w1 = self.store.input_weights();
        (0..self.store.n_hidden())
            .into_par_iter()
            .map(|unit| Image::from_values(w1.column(unit).to_vec()))
            .collect()
    }
}
