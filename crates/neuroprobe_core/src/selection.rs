//! Sets of hidden-unit indices.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A set of hidden-unit indices.
///
/// Membership is the only semantic; iteration is in ascending index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    units: BTreeSet<usize>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select every unit in `[0, hidden)`.
    #[must_use]
    pub fn all(hidden: usize) -> Self {
        (0..hidden).collect()
    }

    /// Add a unit. Returns `true` if it was not already selected.
    pub fn insert(&mut self, unit: usize) -> bool {
        self.units.insert(unit)
    }

    /// Remove a unit. Returns `true` if it was selected.
    pub fn remove(&mut self, unit: usize) -> bool {
        self.units.remove(&unit)
    }

    /// Flip membership of a unit, returning the new membership.
    pub fn toggle(&mut self, unit: usize) -> bool {
        if self.units.remove(&unit) {
            false
        } else {
            self.units.insert(unit);
            true
        }
    }

    /// Check membership.
    #[must_use]
    pub fn contains(&self, unit: usize) -> bool {
        self.units.contains(&unit)
    }

    /// Number of selected units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if no unit is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.units.clear();
    }

    /// Iterate over selected units in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.units.iter().copied()
    }

    /// Fail with [`CoreError::IndexOutOfRange`] if any unit is `>= hidden`.
    pub fn validate(&self, hidden: usize) -> Result<()> {
        match self.units.iter().next_back() {
            Some(&last) if last >= hidden => Err(CoreError::out_of_range(last, hidden)),
            _ => Ok(()),
        }
    }
}

impl FromIterator<usize> for Selection {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            units: iter.into_iter().collect(),
        }
    }
}

impl Extend<usize> for Selection {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        self.units.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter().copied()
    }
}
