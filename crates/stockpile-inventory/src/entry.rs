//! Entry value types.
//!
//! An [`Entry`] is one (item, quantity) stack. [`IndexedEntry`] adds the
//! position the entry held when it was captured, and [`GroupedEntry`] adds
//! every position that contributed to an aggregated quantity.
//!
//! The item is optional: `None` is the "null" item and is a valid key in
//! both containers.
//!
//! ```
//! use stockpile_inventory::entry::{Entry, GroupedEntry, IndexedEntry};
//!
//! let entry = Entry::new("wood", 12);
//! assert_eq!(entry.to_string(), "wood x12");
//!
//! let indexed = IndexedEntry::new("wood", 12, 3);
//! assert_eq!(indexed.to_string(), "3. wood x12");
//!
//! let grouped = GroupedEntry::new("wood", 20, &[0, 4]);
//! assert_eq!(grouped.to_string(), "wood x20 at indexes 0, 4");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// An immutable (item, quantity) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry<T> {
    /// Item key, `None` for the null item.
    item: Option<T>,
    /// Quantity held by this stack.
    quantity: u32,
}

impl<T> Entry<T> {
    /// Create an entry.
    #[must_use]
    pub fn new(item: impl Into<Option<T>>, quantity: u32) -> Self {
        Self {
            item: item.into(),
            quantity,
        }
    }

    /// Get the item, `None` for the null item.
    #[must_use]
    pub const fn item(&self) -> Option<&T> {
        self.item.as_ref()
    }

    /// Get the quantity.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Check if this entry holds the null item.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.item.is_none()
    }

    /// Split into `(item, quantity)`.
    #[must_use]
    pub fn into_parts(self) -> (Option<T>, u32) {
        (self.item, self.quantity)
    }

    pub(crate) fn item_slot(&self) -> &Option<T> {
        &self.item
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}

impl<T: PartialEq> Entry<T> {
    /// Check if this entry holds `item`.
    #[must_use]
    pub fn holds(&self, item: &Option<T>) -> bool {
        self.item == *item
    }
}

impl<T: fmt::Display> fmt::Display for Entry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.item {
            Some(item) => write!(f, "{item} x{}", self.quantity),
            None => write!(f, "NULL x{}", self.quantity),
        }
    }
}

impl<T> From<(T, u32)> for Entry<T> {
    fn from((item, quantity): (T, u32)) -> Self {
        Self::new(item, quantity)
    }
}

/// An entry together with the position it held when captured.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexedEntry<T> {
    #[serde(flatten)]
    entry: Entry<T>,
    index: usize,
}

impl<T> IndexedEntry<T> {
    /// Create an indexed entry.
    #[must_use]
    pub fn new(item: impl Into<Option<T>>, quantity: u32, index: usize) -> Self {
        Self {
            entry: Entry::new(item, quantity),
            index,
        }
    }

    /// Attach an index to an existing entry.
    #[must_use]
    pub const fn from_entry(entry: Entry<T>, index: usize) -> Self {
        Self { entry, index }
    }

    /// Get the underlying entry.
    #[must_use]
    pub const fn entry(&self) -> &Entry<T> {
        &self.entry
    }

    /// Get the item.
    #[must_use]
    pub const fn item(&self) -> Option<&T> {
        self.entry.item()
    }

    /// Get the quantity.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.entry.quantity()
    }

    /// Get the captured index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Split into `(item, quantity, index)`.
    #[must_use]
    pub fn into_parts(self) -> (Option<T>, u32, usize) {
        let (item, quantity) = self.entry.into_parts();
        (item, quantity, self.index)
    }
}

impl<T: fmt::Display> fmt::Display for IndexedEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.index, self.entry)
    }
}

/// An aggregated entry listing every position that contributed to it.
///
/// The quantity is a sum over many stacks and is not bounded by a stack
/// size. The index list is always owned by the entry: [`GroupedEntry::new`]
/// and [`GroupedEntry::set_indexes`] copy the caller's slice, so later
/// changes to the caller's buffer never show up here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupedEntry<T> {
    item: Option<T>,
    quantity: u64,
    indexes: Vec<usize>,
}

impl<T> GroupedEntry<T> {
    /// Create a grouped entry, copying `indexes`.
    #[must_use]
    pub fn new(item: impl Into<Option<T>>, quantity: u64, indexes: &[usize]) -> Self {
        Self {
            item: item.into(),
            quantity,
            indexes: indexes.to_vec(),
        }
    }

    /// Get the item.
    #[must_use]
    pub const fn item(&self) -> Option<&T> {
        self.item.as_ref()
    }

    /// Check if this group holds the null item.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.item.is_none()
    }

    /// Get the summed quantity.
    #[must_use]
    pub const fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Get the contributing indexes in encounter order.
    #[must_use]
    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    /// Replace the indexes with a copy of `indexes`.
    pub fn set_indexes(&mut self, indexes: &[usize]) {
        self.indexes = indexes.to_vec();
    }

    /// Replace the quantity.
    pub fn set_quantity(&mut self, quantity: u64) {
        self.quantity = quantity;
    }

    /// Split into `(item, quantity, indexes)`.
    #[must_use]
    pub fn into_parts(self) -> (Option<T>, u64, Vec<usize>) {
        (self.item, self.quantity, self.indexes)
    }

    pub(crate) fn item_slot(&self) -> &Option<T> {
        &self.item
    }

    pub(crate) fn absorb(&mut self, quantity: u32, index: usize) {
        self.quantity += u64::from(quantity);
        self.indexes.push(index);
    }
}

impl<T: fmt::Display> fmt::Display for GroupedEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.item {
            Some(item) => write!(f, "{item} x{} at indexes ", self.quantity)?,
            None => write!(f, "NULL x{} at indexes ", self.quantity)?,
        }
        for (i, index) in self.indexes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}
