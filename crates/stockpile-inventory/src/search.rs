//! Search results and grouping.

use serde::{Deserialize, Serialize};

use crate::entry::{GroupedEntry, IndexedEntry};
use crate::stacking;

/// A fixed, ordered list of entries captured together with their positions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResult<T> {
    entries: Vec<IndexedEntry<T>>,
}

impl<T> SearchResult<T> {
    /// Wrap captured entries.
    #[must_use]
    pub fn new(entries: Vec<IndexedEntry<T>>) -> Self {
        Self { entries }
    }

    /// Number of captured entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry by result position.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&IndexedEntry<T>> {
        self.entries.get(position)
    }

    /// Captured entries in container order.
    #[must_use]
    pub fn as_slice(&self) -> &[IndexedEntry<T>] {
        &self.entries
    }

    /// Iterate over the captured entries.
    pub fn iter(&self) -> std::slice::Iter<'_, IndexedEntry<T>> {
        self.entries.iter()
    }

    /// Container positions of the captured entries.
    #[must_use]
    pub fn indexes(&self) -> Vec<usize> {
        self.entries.iter().map(IndexedEntry::index).collect()
    }

    /// Sum of the captured quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        stacking::total_quantity(self.entries.iter().map(IndexedEntry::quantity))
    }
}

impl<T: PartialEq + Clone> SearchResult<T> {
    /// Collapse entries holding equal items.
    ///
    /// Each distinct item keeps the position of its first occurrence. Its
    /// quantity is the sum of every contributing entry and its indexes list
    /// every contributing position in encounter order.
    #[must_use]
    pub fn group(&self) -> Vec<GroupedEntry<T>> {
        let mut groups: Vec<GroupedEntry<T>> = Vec::new();
        for indexed in &self.entries {
            let item = indexed.entry().item_slot();
            match groups.iter_mut().find(|group| group.item_slot() == item) {
                Some(group) => group.absorb(indexed.quantity(), indexed.index()),
                None => groups.push(GroupedEntry::new(
                    item.clone(),
                    u64::from(indexed.quantity()),
                    &[indexed.index()],
                )),
            }
        }
        groups
    }
}

impl<T> FromIterator<IndexedEntry<T>> for SearchResult<T> {
    fn from_iter<I: IntoIterator<Item = IndexedEntry<T>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for SearchResult<T> {
    type Item = IndexedEntry<T>;
    type IntoIter = std::vec::IntoIter<IndexedEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a SearchResult<T> {
    type Item = &'a IndexedEntry<T>;
    type IntoIter = std::slice::Iter<'a, IndexedEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
