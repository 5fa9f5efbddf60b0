//! Per-analyst probing state.

use std::collections::BTreeSet;

use neuroprobe_core::{CoreError, ForwardPass, Image, Result, Selection, WeightStore};

use crate::normalize::GlobalNorms;
use crate::projection::{DecodingTriple, Modulation, Projector};

/// Selection, output-class toggles, the latest forward pass and global norms
/// for one analyst.
///
/// Sessions are independent values; nothing here is shared between them.
#[derive(Debug, Clone, Default)]
pub struct ProbeSession {
    selection: Selection,
    classes: BTreeSet<usize>,
    forward: Option<ForwardPass>,
    global_norms: GlobalNorms,
}

impl ProbeSession {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected hidden units.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Mutable access to the selected hidden units.
    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Flip a hidden unit in or out of the selection.
    pub fn toggle_unit(&mut self, unit: usize) -> bool {
        self.selection.toggle(unit)
    }

    /// Flip an output class in or out, returning the new membership.
    pub fn toggle_class(&mut self, class: usize) -> bool {
        if self.classes.remove(&class) {
            false
        } else {
            self.classes.insert(class);
            true
        }
    }

    /// Selected output classes in ascending order.
    pub fn classes(&self) -> impl Iterator<Item = usize> + '_ {
        self.classes.iter().copied()
    }

    /// Record the latest forward pass.
    pub fn set_forward(&mut self, pass: ForwardPass) {
        self.forward = Some(pass);
    }

    /// The latest forward pass.
    #[must_use]
    pub fn forward(&self) -> Option<&ForwardPass> {
        self.forward.as_ref()
    }

    /// Forget the latest forward pass.
    pub fn clear_forward(&mut self) {
        self.forward = None;
    }

    /// Global norms of the most recent batch.
    #[must_use]
    pub fn global_norms(&self) -> GlobalNorms {
        self.global_norms
    }

    /// Replace the global norms.
    pub fn set_global_norms(&mut self, norms: GlobalNorms) {
        self.global_norms = norms;
    }

    /// Modulation from the selected classes, weighted by the latest hidden
    /// activations when a forward pass has been recorded.
    ///
    /// `None` when no class is selected.
    pub fn modulation(&self, store: &WeightStore) -> Result<Option<Modulation>> {
        if self.classes.is_empty() {
            return Ok(None);
        }
        let hidden = self.forward.as_ref().and_then(ForwardPass::hidden);
        Modulation::from_class_weights(store, self.classes(), hidden).map(Some)
    }

    /// Unweighted projection of the selected units.
    pub fn project_selection(&self, projector: &Projector<'_>) -> Result<Image> {
        projector.project(&self.selection, None, false)
    }

    /// Projection of the selected units weighted by the latest hidden
    /// activations, or by their magnitudes when `use_absolute` is set.
    ///
    /// # Errors
    ///
    /// [`CoreError::EmptyInput`] when no forward pass has been recorded.
    pub fn project_by_activation(
        &self,
        projector: &Projector<'_>,
        use_absolute: bool,
    ) -> Result<Image> {
        let hidden = self
            .forward
            .as_ref()
            .and_then(ForwardPass::hidden)
            .ok_or_else(|| CoreError::EmptyInput("no forward pass recorded".to_string()))?;
        projector.project(&self.selection, Some(hidden), use_absolute)
    }

    /// Decode the selected classes into a triple and store its global norms.
    ///
    /// `None` when no class is selected; the stored norms are left untouched.
    pub fn decode(
        &mut self,
        projector: &Projector<'_>,
        use_absolute: bool,
    ) -> Result<Option<DecodingTriple>> {
        let Some(modulation) = self.modulation(projector.store())? else {
            return Ok(None);
        };
        let triple = projector.decode(&modulation, use_absolute)?;
        self.global_norms = triple.global_norms();
        Ok(Some(triple))
    }
}
