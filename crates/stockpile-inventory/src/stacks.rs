//! Shared stack storage.
//!
//! [`Stacks`] owns the ordered entries, the stack size, the modification
//! version and the subscribers. Everything that behaves the same for the
//! deduplicating table and the multi-slot list lives here: queries, removal,
//! clearing, swapping, predicate-driven adds and stack size changes. The
//! containers only add their own insertion rules on top.

use stockpile_common::{InventoryError, InventoryResult, ValidationError};
use tracing::{debug, trace};

use crate::entry::{Entry, IndexedEntry};
use crate::events::{ChangeCallback, ChangeNotifier, ChangeSet, SubscriptionId};
use crate::search::SearchResult;
use crate::stacking::{self, TryAddResult, TryRemoveResult};

/// Entries plus the bookkeeping every container needs.
#[derive(Debug)]
pub(crate) struct Stacks<T> {
    entries: Vec<Entry<T>>,
    stack_size: u32,
    version: u64,
    notifier: ChangeNotifier<T>,
}

pub(crate) fn validate_quantity(quantity: u32) -> InventoryResult<()> {
    if quantity == 0 {
        return Err(ValidationError::ZeroQuantity.into());
    }
    Ok(())
}

pub(crate) fn validate_stack_size(stack_size: u32) -> InventoryResult<()> {
    if stack_size == 0 {
        return Err(ValidationError::ZeroStackSize.into());
    }
    Ok(())
}

impl<T> Stacks<T> {
    pub(crate) fn new(stack_size: u32, capacity: usize) -> InventoryResult<Self> {
        validate_stack_size(stack_size)?;
        Ok(Self {
            entries: Vec::with_capacity(capacity),
            stack_size,
            version: 0,
            notifier: ChangeNotifier::new(),
        })
    }

    /// Build from already validated entries.
    pub(crate) fn from_entries(stack_size: u32, entries: Vec<Entry<T>>) -> Self {
        Self {
            entries,
            stack_size,
            version: 0,
            notifier: ChangeNotifier::new(),
        }
    }

    pub(crate) fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<Entry<T>> {
        &mut self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) const fn stack_size(&self) -> u32 {
        self.stack_size
    }

    pub(crate) const fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn subscribe(&mut self, callback: ChangeCallback<T>) -> SubscriptionId {
        self.notifier.subscribe(callback)
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.notifier.len()
    }

    /// Publish the changes of one call. Nothing happens if it changed nothing.
    pub(crate) fn commit(&mut self, changes: ChangeSet<T>) {
        if changes.is_empty() {
            return;
        }
        self.version += 1;
        self.notifier.notify(changes);
    }

    pub(crate) fn get(&self, index: usize) -> InventoryResult<&Entry<T>> {
        self.entries
            .get(index)
            .ok_or_else(|| InventoryError::out_of_range(index, self.entries.len()))
    }

    pub(crate) fn check_index(&self, index: usize) -> InventoryResult<()> {
        if index >= self.entries.len() {
            return Err(InventoryError::out_of_range(index, self.entries.len()));
        }
        Ok(())
    }

    pub(crate) fn total_quantity(&self) -> u64 {
        stacking::total_quantity(self.entries.iter().map(Entry::quantity))
    }

    /// Positions matching `predicate`, ascending.
    pub(crate) fn indexes_where<F>(&self, mut predicate: F) -> Vec<usize>
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| predicate(entry).then_some(i))
            .collect()
    }

    pub(crate) fn quantity_where<F>(&self, mut predicate: F) -> u64
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        stacking::total_quantity(
            self.entries
                .iter()
                .filter(|&entry| predicate(entry))
                .map(Entry::quantity),
        )
    }
}

impl<T: Clone> Stacks<T> {
    pub(crate) fn search<F>(&self, mut predicate: F) -> SearchResult<T>
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        self.entries
            .iter()
            .enumerate()
            .filter(|&(_, entry)| predicate(entry))
            .map(|(i, entry)| IndexedEntry::from_entry(entry.clone(), i))
            .collect()
    }

    /// Exchange two entries.
    pub(crate) fn swap(&mut self, a: usize, b: usize) -> InventoryResult<()> {
        self.check_index(a)?;
        self.check_index(b)?;
        if a == b {
            return Ok(());
        }

        let mut changes = ChangeSet::new();
        changes.removed(self.entries[a].clone());
        changes.removed(self.entries[b].clone());
        self.entries.swap(a, b);
        changes.added(self.entries[a].clone());
        changes.added(self.entries[b].clone());

        trace!("Swapped entries {} and {}", a, b);
        self.commit(changes);
        Ok(())
    }

    /// Change the stack size, truncating entries that no longer fit.
    pub(crate) fn set_stack_size(&mut self, stack_size: u32) -> InventoryResult<()> {
        validate_stack_size(stack_size)?;
        let previous = self.stack_size;
        self.stack_size = stack_size;
        if stack_size >= previous {
            return Ok(());
        }

        let mut changes = ChangeSet::new();
        for entry in &mut self.entries {
            if entry.quantity() > stack_size {
                let before = entry.clone();
                entry.set_quantity(stack_size);
                changes.updated(before, entry.clone());
            }
        }

        debug!(
            "Stack size {} -> {}, truncated {} entries",
            previous,
            stack_size,
            changes.old_len()
        );
        self.commit(changes);
        Ok(())
    }

    /// Add `quantity` to every matching entry, all or nothing.
    pub(crate) fn add_where<F>(&mut self, predicate: F, quantity: u32) -> InventoryResult<()>
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        validate_quantity(quantity)?;
        let matches = self.indexes_where(predicate);
        if matches.is_empty() {
            return Err(InventoryError::NoMatch);
        }

        let mut totals = Vec::with_capacity(matches.len());
        for &i in &matches {
            totals.push(stacking::checked_fill(
                self.entries[i].quantity(),
                quantity,
                self.stack_size,
            )?);
        }

        let mut changes = ChangeSet::new();
        for (&i, total) in matches.iter().zip(totals) {
            let before = self.entries[i].clone();
            self.entries[i].set_quantity(total);
            changes.updated(before, self.entries[i].clone());
        }

        trace!("Added {} to each of {} matches", quantity, matches.len());
        self.commit(changes);
        Ok(())
    }

    /// Add `quantity` to every matching entry, clamped per entry.
    pub(crate) fn try_add_where<F>(
        &mut self,
        predicate: F,
        quantity: u32,
    ) -> InventoryResult<TryAddResult>
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        validate_quantity(quantity)?;
        let matches = self.indexes_where(predicate);
        if matches.is_empty() {
            return Ok(TryAddResult::new(0, u64::from(quantity)));
        }

        let mut result = TryAddResult::default();
        let mut changes = ChangeSet::new();
        for i in matches {
            let current = self.entries[i].quantity();
            let (added, not_added) = stacking::clamp_fill(current, quantity, self.stack_size);
            result.added += u64::from(added);
            result.not_added += u64::from(not_added);
            if added > 0 {
                let before = self.entries[i].clone();
                self.entries[i].set_quantity(current + added);
                changes.updated(before, self.entries[i].clone());
            }
        }

        self.commit(changes);
        Ok(result)
    }

    /// Drain up to `quantity` from `positions`, given in drain order.
    ///
    /// Positions must be descending so deleting an emptied entry never
    /// shifts an entry still to be visited.
    fn drain(&mut self, positions: &[usize], quantity: u32, changes: &mut ChangeSet<T>) -> u32 {
        let stacks: Vec<u32> = positions
            .iter()
            .map(|&i| self.entries[i].quantity())
            .collect();
        let (takes, removed) = stacking::plan_drain(&stacks, quantity);

        for (&i, take) in positions.iter().zip(takes) {
            let before = self.entries[i].clone();
            let left = before.quantity() - take;
            if left == 0 {
                self.entries.remove(i);
                changes.removed(before);
            } else {
                self.entries[i].set_quantity(left);
                changes.updated(before, self.entries[i].clone());
            }
        }

        trace!("Drained {} of {} requested", removed, quantity);
        removed
    }

    /// Remove exactly `quantity` from matching entries, newest first.
    pub(crate) fn remove_where<F>(&mut self, predicate: F, quantity: u32) -> InventoryResult<()>
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        validate_quantity(quantity)?;
        let mut positions = self.indexes_where(predicate);
        positions.reverse();

        let available =
            stacking::total_quantity(positions.iter().map(|&i| self.entries[i].quantity()));
        if available < u64::from(quantity) {
            return Err(InventoryError::InsufficientStock {
                requested: quantity,
                available,
            });
        }

        let mut changes = ChangeSet::new();
        self.drain(&positions, quantity, &mut changes);
        self.commit(changes);
        Ok(())
    }

    /// Remove as much of `quantity` as matching entries hold, newest first.
    pub(crate) fn try_remove_where<F>(
        &mut self,
        predicate: F,
        quantity: u32,
    ) -> InventoryResult<TryRemoveResult>
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        validate_quantity(quantity)?;
        let mut positions = self.indexes_where(predicate);
        positions.reverse();

        let mut changes = ChangeSet::new();
        let removed = self.drain(&positions, quantity, &mut changes);
        self.commit(changes);
        Ok(TryRemoveResult::new(u64::from(removed), u64::from(quantity - removed)))
    }

    /// Delete every matching entry. Returns the number of entries deleted.
    pub(crate) fn clear_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Entry<T>) -> bool,
    {
        let mut changes = ChangeSet::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if predicate(&entry) {
                changes.removed(entry);
            } else {
                kept.push(entry);
            }
        }
        self.entries = kept;

        let cleared = changes.old_len();
        if cleared > 0 {
            debug!("Cleared {} entries", cleared);
        }
        self.commit(changes);
        cleared
    }

    /// Delete every entry.
    pub(crate) fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let mut changes = ChangeSet::new();
        for entry in self.entries.drain(..) {
            changes.removed(entry);
        }
        debug!("Cleared all entries");
        self.commit(changes);
    }
}

impl<T: PartialEq> Stacks<T> {
    pub(crate) fn index_of(&self, item: &Option<T>) -> Option<usize> {
        self.entries.iter().position(|entry| entry.holds(item))
    }

    pub(crate) fn last_index_of(&self, item: &Option<T>) -> Option<usize> {
        self.entries.iter().rposition(|entry| entry.holds(item))
    }

    pub(crate) fn quantity_of(&self, item: &Option<T>) -> u64 {
        self.quantity_where(|entry| entry.holds(item))
    }
}
