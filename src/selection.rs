//! Selection state for the active layer's live shapes.
//!
//! A selection is a set of positional indices into the active layer's
//! feature sequence. Indices only mean something for the layer that was
//! active when they were recorded, so the engine clears the selection on
//! every layer switch, deletion, or visibility change.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::BTreeSet;

/// Set of selected feature indices, kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: BTreeSet<usize>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a click on the shape at `index`.
    ///
    /// Without `additive`, the selection becomes `{index}` unless it already
    /// was exactly `{index}`, in which case it empties. With `additive`,
    /// `index` is flipped and other members are untouched.
    pub fn toggle(&mut self, index: usize, additive: bool) {
        if additive {
            if !self.indices.remove(&index) {
                self.indices.insert(index);
            }
            return;
        }
        let sole = self.indices.len() == 1 && self.indices.contains(&index);
        self.indices.clear();
        if !sole {
            self.indices.insert(index);
        }
    }

    /// Empty the selection.
    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Drop indices that no longer address a feature.
    pub fn truncate(&mut self, count: usize) {
        self.indices.retain(|&i| i < count);
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Selected indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Selected indices in ascending order, collected.
    #[must_use]
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    /// When exactly two indices are selected and `target` is one of them,
    /// return the other one.
    #[must_use]
    pub fn partner_of(&self, target: usize) -> Option<usize> {
        if self.indices.len() != 2 || !self.indices.contains(&target) {
            return None;
        }
        self.iter().find(|&i| i != target)
    }
}
