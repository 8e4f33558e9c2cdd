//! Deduplicating inventory table.
//!
//! A [`StackTable`] holds at most one entry per distinct item and never
//! splits: an entry is capped at the stack size and adding past it is an
//! error (exact API) or is clamped (`try_*` API).
//!
//! ```
//! use stockpile_inventory::prelude::*;
//!
//! let mut table = StackTable::new(99).unwrap();
//! table.add("potion", 50).unwrap();
//! assert!(table.add("potion", 50).is_err());
//!
//! let result = table.try_add("potion", 50).unwrap();
//! assert_eq!(result, TryAddResult::new(49, 1));
//! assert_eq!(table.quantity_of("potion"), 99);
//! ```

use std::ops::Index;

use stockpile_common::InventoryResult;
use tracing::trace;

use crate::config::InventoryConfig;
use crate::cursor::{EntryCursor, EntrySource};
use crate::entry::Entry;
use crate::events::{ChangeCallback, ChangeSet, SubscriptionId};
use crate::search::SearchResult;
use crate::stacking::{self, TryAddResult, TryRemoveResult, DEFAULT_STACK_SIZE};
use crate::stacks::{validate_quantity, Stacks};

/// One entry per distinct item, each capped at the stack size.
#[derive(Debug)]
pub struct StackTable<T> {
    stacks: Stacks<T>,
}

impl<T> Default for StackTable<T> {
    fn default() -> Self {
        Self {
            stacks: Stacks::from_entries(DEFAULT_STACK_SIZE, Vec::new()),
        }
    }
}

impl<T> StackTable<T> {
    /// Creates an empty table.
    pub fn new(stack_size: u32) -> InventoryResult<Self> {
        Ok(Self {
            stacks: Stacks::new(stack_size, 0)?,
        })
    }

    /// Creates an empty table from settings.
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

    /// Returns true if the table holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stacks.len() == 0
    }

    /// Returns the modification counter.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.stacks.version()
    }

    /// Entries in table order.
    #[must_use]
    pub fn entries(&self) -> &[Entry<T>] {
        self.stacks.entries()
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry<T>> {
        self.stacks.entries().iter()
    }

    /// Starts a fail-fast cursor over this table.
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

impl<T: Clone> StackTable<T> {
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

impl<T: PartialEq + Clone> StackTable<T> {
    /// Add `quantity` of `item`.
    ///
    /// Fails with [`Overflow`](stockpile_common::InventoryError::Overflow)
    /// and changes nothing if the entry would exceed the stack size.
    pub fn add(&mut self, item: impl Into<Option<T>>, quantity: u32) -> InventoryResult<()> {
        validate_quantity(quantity)?;
        let item = item.into();
        let stack_size = self.stacks.stack_size();
        let mut changes = ChangeSet::new();

        match self.stacks.index_of(&item) {
            Some(i) => {
                let entry = &mut self.stacks.entries_mut()[i];
                let total = stacking::checked_fill(entry.quantity(), quantity, stack_size)?;
                let before = entry.clone();
                entry.set_quantity(total);
                changes.updated(before, entry.clone());
                trace!("Table entry {} grew to {}", i, total);
            }
            None => {
                stacking::checked_fill(0, quantity, stack_size)?;
                let entry = Entry::new(item, quantity);
                self.stacks.entries_mut().push(entry.clone());
                changes.added(entry);
                trace!("Table entry created with {}", quantity);
            }
        }

        self.stacks.commit(changes);
        Ok(())
    }

    /// Add as much of `quantity` of `item` as fits.
    pub fn try_add(
        &mut self,
        item: impl Into<Option<T>>,
        quantity: u32,
    ) -> InventoryResult<TryAddResult> {
        validate_quantity(quantity)?;
        let item = item.into();
        let stack_size = self.stacks.stack_size();
        let mut changes = ChangeSet::new();

        let (added, not_added) = match self.stacks.index_of(&item) {
            Some(i) => {
                let entry = &mut self.stacks.entries_mut()[i];
                let (added, not_added) =
                    stacking::clamp_fill(entry.quantity(), quantity, stack_size);
                if added > 0 {
                    let before = entry.clone();
                    entry.set_quantity(before.quantity() + added);
                    changes.updated(before, entry.clone());
                }
                (added, not_added)
            }
            None => {
                let (added, not_added) = stacking::clamp_fill(0, quantity, stack_size);
                let entry = Entry::new(item, added);
                self.stacks.entries_mut().push(entry.clone());
                changes.added(entry);
                (added, not_added)
            }
        };

        let result = TryAddResult::new(u64::from(added), u64::from(not_added));
        if !result.is_complete() {
            trace!("Table try add clamped: {} added, {} rejected", added, not_added);
        }
        self.stacks.commit(changes);
        Ok(result)
    }

    /// Remove exactly `quantity` of `item`.
    pub fn remove(&mut self, item: impl Into<Option<T>>, quantity: u32) -> InventoryResult<()> {
        let item = item.into();
        self.stacks.remove_where(|entry| entry.holds(&item), quantity)
    }

    /// Remove up to `quantity` of `item`.
    pub fn try_remove(
        &mut self,
        item: impl Into<Option<T>>,
        quantity: u32,
    ) -> InventoryResult<TryRemoveResult> {
        let item = item.into();
        self.stacks.try_remove_where(|entry| entry.holds(&item), quantity)
    }

    /// Delete the entry for `item`. Returns false if there was none.
    pub fn clear_item(&mut self, item: impl Into<Option<T>>) -> bool {
        let item = item.into();
        self.stacks.clear_where(|entry| entry.holds(&item)) > 0
    }

    /// Quantity held of `item`, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, item: impl Into<Option<T>>) -> u64 {
        self.stacks.quantity_of(&item.into())
    }

    /// Position of the entry for `item`.
    #[must_use]
    pub fn index_of(&self, item: impl Into<Option<T>>) -> Option<usize> {
        self.stacks.index_of(&item.into())
    }

    /// Check if the table holds `item`.
    #[must_use]
    pub fn contains(&self, item: impl Into<Option<T>>) -> bool {
        self.index_of(item).is_some()
    }
}

impl<T> Index<usize> for StackTable<T> {
    type Output = Entry<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.stacks.entries()[index]
    }
}

impl<T> EntrySource<T> for StackTable<T> {
    fn entries(&self) -> &[Entry<T>] {
        self.stacks.entries()
    }

    fn version(&self) -> u64 {
        self.stacks.version()
    }
}

impl<'a, T> IntoIterator for &'a StackTable<T> {
    type Item = &'a Entry<T>;
    type IntoIter = std::slice::Iter<'a, Entry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use stockpile_common::{InventoryError, ValidationError};

    use super::*;
    use crate::events::ChangeEvent;

    type Log = Arc<Mutex<Vec<ChangeEvent<&'static str>>>>;

    fn table(stack_size: u32) -> (StackTable<&'static str>, Log) {
        let mut table = StackTable::new(stack_size).expect("positive stack size");
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        table.subscribe(Box::new(move |event| sink.lock().push(event.clone())));
        (table, log)
    }

    #[test]
    fn test_add_merges_into_one_entry() {
        let (mut table, log) = table(99);
        table.add("wood", 10).expect("fits");
        table.add("stone", 3).expect("fits");
        table.add("wood", 15).expect("fits");

        assert_eq!(table.len(), 2);
        assert_eq!(table[0], Entry::new("wood", 25));
        assert_eq!(table[1], Entry::new("stone", 3));

        let log = log.lock();
        assert_eq!(log.len(), 3);
        assert!(log[0].old_values.is_empty());
        assert_eq!(log[2].old_values, vec![Entry::new("wood", 10)]);
        assert_eq!(log[2].new_values, vec![Entry::new("wood", 25)]);
    }

    #[test]
    fn test_add_overflow_changes_nothing() {
        let (mut table, log) = table(99);
        table.add("wood", 50).expect("fits");

        assert_eq!(
            table.add("wood", 50),
            Err(InventoryError::Overflow {
                capacity: 99,
                current: 50,
                requested: 50
            })
        );
        assert_eq!(table.quantity_of("wood"), 50);
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_add_new_item_over_stack_size() {
        let (mut table, _) = table(10);
        assert!(matches!(
            table.add("wood", 11),
            Err(InventoryError::Overflow { current: 0, .. })
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn test_try_add_clamps() {
        let (mut table, log) = table(99);
        table.add("wood", 50).expect("fits");

        let result = table.try_add("wood", 50).expect("valid quantity");

        assert_eq!(result, TryAddResult::new(49, 1));
        assert_eq!(result.total(), 50);
        assert_eq!(table.quantity_of("wood"), 99);
        assert_eq!(log.lock().len(), 2);

        let full = table.try_add("wood", 5).expect("valid quantity");
        assert_eq!(full, TryAddResult::new(0, 5));
        assert_eq!(log.lock().len(), 2);
    }

    #[test]
    fn test_try_add_new_item_over_stack_size() {
        let (mut table, _) = table(10);
        let result = table.try_add("wood", 25).expect("valid quantity");
        assert_eq!(result, TryAddResult::new(10, 15));
        assert_eq!(table.entries(), &[Entry::new("wood", 10)]);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let (mut table, log) = table(10);
        let zero = Err(InventoryError::Validation(ValidationError::ZeroQuantity));
        assert_eq!(table.add("wood", 0), zero);
        assert_eq!(table.try_add("wood", 0).map(|_| ()), zero);
        assert_eq!(table.remove("wood", 0), zero);
        assert_eq!(table.try_remove("wood", 0).map(|_| ()), zero);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_null_item_is_a_key() {
        let (mut table, _) = table(10);
        table.add(None, 3).expect("fits");
        table.add("wood", 1).expect("fits");
        table.add(None, 2).expect("fits");

        assert_eq!(table.len(), 2);
        assert_eq!(table.quantity_of(None), 5);
        assert_eq!(table.index_of(None), Some(0));
        assert_eq!(table[0].to_string(), "NULL x5");
    }

    #[test]
    fn test_remove_and_round_trip() {
        let (mut table, _) = table(99);
        table.add("wood", 40).expect("fits");
        let before = table.quantity_of("wood");

        table.add("wood", 30).expect("fits");
        table.remove("wood", 30).expect("enough");

        assert_eq!(table.quantity_of("wood"), before);
    }

    #[test]
    fn test_remove_deletes_empty_entry() {
        let (mut table, log) = table(99);
        table.add("wood", 40).expect("fits");
        table.remove("wood", 40).expect("enough");

        assert!(table.is_empty());
        assert_eq!(log.lock()[1].old_values, vec![Entry::new("wood", 40)]);
        assert!(log.lock()[1].new_values.is_empty());
    }

    #[test]
    fn test_remove_insufficient() {
        let (mut table, _) = table(99);
        table.add("wood", 4).expect("fits");

        assert_eq!(
            table.remove("wood", 5),
            Err(InventoryError::InsufficientStock {
                requested: 5,
                available: 4
            })
        );
        assert_eq!(
            table.remove("stone", 1),
            Err(InventoryError::InsufficientStock {
                requested: 1,
                available: 0
            })
        );
        assert_eq!(table.quantity_of("wood"), 4);
    }

    #[test]
    fn test_try_remove() {
        let (mut table, _) = table(99);
        table.add("wood", 4).expect("fits");

        assert_eq!(table.try_remove("wood", 5), Ok(TryRemoveResult::new(4, 1)));
        assert_eq!(table.try_remove("wood", 5), Ok(TryRemoveResult::new(0, 5)));
        assert!(table.is_empty());
    }

    #[test]
    fn test_remove_where_spans_items_newest_first() {
        let (mut table, _) = table(99);
        table.add("oak", 10).expect("fits");
        table.add("pine", 10).expect("fits");
        table.add("birch", 10).expect("fits");

        table
            .remove_where(|e| e.item().is_some_and(|item| item != &"pine"), 15)
            .expect("enough");

        assert_eq!(table.entries(), &[Entry::new("oak", 5), Entry::new("pine", 10)]);
    }

    #[test]
    fn test_add_where_all_or_nothing() {
        let (mut table, log) = table(20);
        table.add("oak", 10).expect("fits");
        table.add("pine", 18).expect("fits");

        assert!(table.add_where(|_| true, 5).is_err());
        assert_eq!(table.quantity_of("oak"), 10);
        assert_eq!(table.quantity_of("pine"), 18);
        assert_eq!(table.add_where(|e| e.holds(&Some("fir")), 1), Err(InventoryError::NoMatch));

        table.add_where(|_| true, 2).expect("fits");
        assert_eq!(table.quantity_where(|_| true), 32);
        assert_eq!(log.lock().len(), 3);
    }

    #[test]
    fn test_try_add_where() {
        let (mut table, _) = table(20);
        table.add("oak", 10).expect("fits");
        table.add("pine", 18).expect("fits");

        let result = table.try_add_where(|_| true, 5).expect("valid quantity");
        assert_eq!(result, TryAddResult::new(7, 3));
        assert_eq!(table.quantity_of("oak"), 15);
        assert_eq!(table.quantity_of("pine"), 20);

        let none = table.try_add_where(|_| false, 5).expect("valid quantity");
        assert_eq!(none, TryAddResult::new(0, 5));
    }

    #[test]
    fn test_clear_item() {
        let (mut table, log) = table(20);
        table.add("oak", 10).expect("fits");

        assert!(!table.clear_item("pine"));
        assert!(table.clear_item("oak"));
        assert!(!table.contains("oak"));
        assert_eq!(log.lock().len(), 2);
    }

    #[test]
    fn test_clear_twice_notifies_once() {
        let (mut table, log) = table(20);
        table.add("oak", 10).expect("fits");
        table.add("pine", 10).expect("fits");

        table.clear();
        table.clear();

        assert!(table.is_empty());
        let log = log.lock();
        assert_eq!(log.len(), 3);
        assert_eq!(log[2].old_values.len(), 2);
    }

    #[test]
    fn test_get_and_swap() {
        let (mut table, _) = table(20);
        table.add("oak", 1).expect("fits");
        table.add("pine", 2).expect("fits");

        table.swap(0, 1).expect("in range");
        assert_eq!(table.get(0), Ok(&Entry::new("pine", 2)));
        assert_eq!(table.index_of("oak"), Some(1));
        assert_eq!(table.get(2), Err(InventoryError::out_of_range(2, 2)));
        assert!(table.swap(0, 5).is_err());
    }

    #[test]
    fn test_shrink_truncates() {
        let (mut table, log) = table(99);
        table.add("oak", 90).expect("fits");
        table.add("pine", 5).expect("fits");

        table.set_stack_size(10).expect("positive");

        assert_eq!(table.entries(), &[Entry::new("oak", 10), Entry::new("pine", 5)]);
        assert_eq!(log.lock().len(), 3);
        assert!(table.add("pine", 6).is_err());
    }

    #[test]
    fn test_search_and_cursor() {
        let (mut table, _) = table(99);
        table.add("oak", 3).expect("fits");
        table.add("pine", 9).expect("fits");

        let found = table.search(|e| e.quantity() > 5);
        assert_eq!(found.indexes(), vec![1]);
        assert_eq!(table.snapshot().len(), 2);

        let mut cursor = table.cursor();
        assert_eq!(cursor.next(&table), Ok(Some(&Entry::new("oak", 3))));
        table.add("oak", 1).expect("fits");
        assert!(matches!(
            cursor.next(&table),
            Err(InventoryError::ConcurrentModification { .. })
        ));
    }

    #[test]
    fn test_with_config() {
        let config = InventoryConfig::with_stack_size(7).initial_capacity(4);
        let table: StackTable<&str> = StackTable::with_config(&config).expect("valid config");
        assert_eq!(table.stack_size(), 7);

        let bad = InventoryConfig {
            stack_size: 0,
            initial_capacity: 0,
        };
        assert!(StackTable::<&str>::with_config(&bad).is_err());
        assert_eq!(StackTable::<&str>::default().stack_size(), DEFAULT_STACK_SIZE);
    }
}
