//! Order-preserving multi-slot inventory list.
//!
//! A [`StackList`] may hold many entries for the same item. Adding never
//! overflows: the last existing entry for the item is topped up, and the
//! rest is cut into full stacks plus a remainder that are placed at the
//! requested position.
//!
//! ```
//! use stockpile_inventory::prelude::*;
//!
//! let mut list = StackList::new(99).unwrap();
//! list.add("arrow", 281).unwrap();
//!
//! let quantities: Vec<u32> = list.iter().map(Entry::quantity).collect();
//! assert_eq!(quantities, vec![99, 99, 83]);
//! ```

use std::ops::Index;

use stockpile_common::{InventoryError, InventoryResult};
use tracing::trace;

use crate::config::InventoryConfig;
use crate::cursor::{EntryCursor, EntrySource};
use crate::entry::Entry;
use crate::events::{ChangeCallback, ChangeSet, SubscriptionId};
use crate::search::SearchResult;
use crate::stacking::{self, TryAddResult, TryRemoveResult, DEFAULT_STACK_SIZE};
use crate::stacks::{validate_quantity, Stacks};

/// Ordered stacks where an item may occupy any number of entries.
#[derive(Debug)]
pub struct StackList<T> {
    stacks: Stacks<T>,
}

impl<T> Default for StackList<T> {
    fn default() -> Self {
        Self {
            stacks: Stacks::from_entries(DEFAULT_STACK_SIZE, Vec::new()),
        }
    }
}

impl<T> StackList<T> {
    /// Creates an empty list.
    pub fn new(stack_size: u32) -> InventoryResult<Self> {
        Ok(Self {
            stacks: Stacks::new(stack_size, 0)?,
        })
    }

    /// Creates an empty list from settings.
    pub fn with_config(config: &InventoryConfig) -> InventoryResult<Self> {
        Ok(Self {
            stacks: Stacks::new(config.stack_size, config.initial_capacity)?,
        })
    }

    pub(crate) fn from_stacks(stacks: Stacks<T>) -> Self {
        Self { stacks }
    }

    /// Returns the stack size.
    #[must_use]
    pub const fn stack_size(&self) -> u32 {
        self.stacks.stack_size()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    /// Returns true if the list holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stacks.len() == 0
    }

    /// Returns the modification counter.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.stacks.version()
    }

    /// Entries in list order.
    #[must_use]
    pub fn entries(&self) -> &[Entry<T>] {
        self.stacks.entries()
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry<T>> {
        self.stacks.entries().iter()
    }

    /// Starts a fail-fast cursor over this list.
    #[must_use]
    pub fn cursor(&self) -> EntryCursor {
        EntryCursor::new(self)
    }

    /// Get an entry by position.
    pub fn get(&self, index: usize) -> InventoryResult<&Entry<T>> {
        self.stacks.get(index)
    }

    /// Sum of every entry's quantity.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.stacks.total_quantity()
    }

    /// Sum of the quantities of matching entries.
    pub fn quantity_where<F>(&self, predicate: F) -> u64
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        self.stacks.quantity_where(predicate)
    }

    /// Positions of matching entries, ascending.
    pub fn indexes_where<F>(&self, predicate: F) -> Vec<usize>
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        self.stacks.indexes_where(predicate)
    }

    /// Registers a change callback.
    pub fn subscribe(&mut self, callback: ChangeCallback<T>) -> SubscriptionId {
        self.stacks.subscribe(callback)
    }

    /// Removes a change callback.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.stacks.unsubscribe(id)
    }

    /// Returns the number of change callbacks.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.stacks.subscriber_count()
    }
}

impl<T: Clone> StackList<T> {
    /// Capture matching entries with their positions.
    pub fn search<F>(&self, predicate: F) -> SearchResult<T>
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        self.stacks.search(predicate)
    }

    /// Capture every entry with its position.
    #[must_use]
    pub fn snapshot(&self) -> SearchResult<T> {
        self.stacks.search(|_| true)
    }

    /// Exchange the entries at `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) -> InventoryResult<()> {
        self.stacks.swap(a, b)
    }

    /// Change the stack size. Shrinking truncates oversized entries.
    pub fn set_stack_size(&mut self, stack_size: u32) -> InventoryResult<()> {
        self.stacks.set_stack_size(stack_size)
    }

    /// Add `quantity` to every matching entry, or to none if any would overflow.
    ///
    /// Matched entries are grown in place; nothing is split off.
    pub fn add_where<F>(&mut self, predicate: F, quantity: u32) -> InventoryResult<()>
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        self.stacks.add_where(predicate, quantity)
    }

    /// Add up to `quantity` to every matching entry.
    pub fn try_add_where<F>(&mut self, predicate: F, quantity: u32) -> InventoryResult<TryAddResult>
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        self.stacks.try_add_where(predicate, quantity)
    }

    /// Remove exactly `quantity` across matching entries, last entry first.
    pub fn remove_where<F>(&mut self, predicate: F, quantity: u32) -> InventoryResult<()>
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        self.stacks.remove_where(predicate, quantity)
    }

    /// Remove up to `quantity` across matching entries, last entry first.
    pub fn try_remove_where<F>(
        &mut self,
        predicate: F,
        quantity: u32,
    ) -> InventoryResult<TryRemoveResult>
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        self.stacks.try_remove_where(predicate, quantity)
    }

    /// Delete every matching entry. Returns how many were deleted.
    pub fn clear_where<F>(&mut self, predicate: F) -> usize
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        self.stacks.clear_where(predicate)
    }

    /// Delete every entry.
    pub fn clear(&mut self) {
        self.stacks.clear();
    }
}

impl<T: PartialEq + Clone> StackList<T> {
    /// Add `quantity` of `item`, new stacks going to the end.
    pub fn add(&mut self, item: impl Into<Option<T>>, quantity: u32) -> InventoryResult<()> {
        let end = self.stacks.len();
        self.place(end, item.into(), quantity)
    }

    /// Same as [`add`](Self::add).
    pub fn insert_last(
        &mut self,
        item: impl Into<Option<T>>,
        quantity: u32,
    ) -> InventoryResult<()> {
        self.add(item, quantity)
    }

    /// Add `quantity` of `item`, new stacks going to the front.
    pub fn insert_first(
        &mut self,
        item: impl Into<Option<T>>,
        quantity: u32,
    ) -> InventoryResult<()> {
        self.place(0, item.into(), quantity)
    }

    /// Add `quantity` of `item`, new stacks going in at `index`.
    ///
    /// `index` may equal the length, which appends.
    pub fn insert(
        &mut self,
        index: usize,
        item: impl Into<Option<T>>,
        quantity: u32,
    ) -> InventoryResult<()> {
        self.place(index, item.into(), quantity)
    }

    fn place(&mut self, index: usize, item: Option<T>, quantity: u32) -> InventoryResult<()> {
        validate_quantity(quantity)?;
        let len = self.stacks.len();
        if index > len {
            return Err(InventoryError::out_of_range(index, len));
        }

        let stack_size = self.stacks.stack_size();
        let last = self.stacks.last_index_of(&item);
        let plan = stacking::plan_fill(
            quantity,
            stack_size,
            last.map(|i| self.stacks.entries()[i].quantity()),
        );

        let mut changes = ChangeSet::new();
        if let Some(i) = last.filter(|_| plan.top_up > 0) {
            let entry = &mut self.stacks.entries_mut()[i];
            let before = entry.clone();
            entry.set_quantity(before.quantity() + plan.top_up);
            changes.updated(before, entry.clone());
        }

        let created: Vec<Entry<T>> = plan
            .new_stacks
            .iter()
            .map(|&stack| Entry::new(item.clone(), stack))
            .collect();
        for entry in &created {
            changes.added(entry.clone());
        }
        trace!(
            "List placed {} at {}: top up {}, {} new entries",
            quantity,
            index,
            plan.top_up,
            created.len()
        );
        self.stacks.entries_mut().splice(index..index, created);

        self.stacks.commit(changes);
        Ok(())
    }

    /// Remove exactly `quantity` of `item`, last entry first.
    pub fn remove(&mut self, item: impl Into<Option<T>>, quantity: u32) -> InventoryResult<()> {
        let item = item.into();
        self.stacks.remove_where(|entry| entry.holds(&item), quantity)
    }

    /// Remove up to `quantity` of `item`, last entry first.
    pub fn try_remove(
        &mut self,
        item: impl Into<Option<T>>,
        quantity: u32,
    ) -> InventoryResult<TryRemoveResult> {
        let item = item.into();
        self.stacks.try_remove_where(|entry| entry.holds(&item), quantity)
    }

    /// Delete every entry of `item`. Returns false if there was none.
    pub fn clear_item(&mut self, item: impl Into<Option<T>>) -> bool {
        let item = item.into();
        self.stacks.clear_where(|entry| entry.holds(&item)) > 0
    }

    /// Total quantity of `item` across its entries, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, item: impl Into<Option<T>>) -> u64 {
        self.stacks.quantity_of(&item.into())
    }

    /// Position of the first entry of `item`.
    #[must_use]
    pub fn index_of(&self, item: impl Into<Option<T>>) -> Option<usize> {
        self.stacks.index_of(&item.into())
    }

    /// Position of the last entry of `item`.
    #[must_use]
    pub fn last_index_of(&self, item: impl Into<Option<T>>) -> Option<usize> {
        self.stacks.last_index_of(&item.into())
    }

    /// Check if the list holds `item`.
    #[must_use]
    pub fn contains(&self, item: impl Into<Option<T>>) -> bool {
        self.index_of(item).is_some()
    }
}

impl<T> Index<usize> for StackList<T> {
    type Output = Entry<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.stacks.entries()[index]
    }
}

impl<T> EntrySource<T> for StackList<T> {
    fn entries(&self) -> &[Entry<T>] {
        self.stacks.entries()
    }

    fn version(&self) -> u64 {
        self.stacks.version()
    }
}

impl<'a, T> IntoIterator for &'a StackList<T> {
    type Item = &'a Entry<T>;
    type IntoIter = std::slice::Iter<'a, Entry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
