//! Fail-fast cursors.
//!
//! Borrowing iterators (`iter()`) cannot observe a mutation, the borrow
//! checker forbids it. An [`EntryCursor`] holds no borrow, so the container
//! can be mutated between steps; the cursor notices through the container's
//! version counter and refuses to continue.
//!
//! ```
//! use stockpile_inventory::prelude::*;
//!
//! let mut list = StackList::new(10).unwrap();
//! list.add("arrow", 25).unwrap();
//!
//! let mut cursor = list.cursor();
//! assert_eq!(cursor.next(&list).unwrap().map(Entry::quantity), Some(10));
//!
//! list.remove("arrow", 1).unwrap();
//! assert!(cursor.next(&list).is_err());
//! ```

use stockpile_common::{InventoryError, InventoryResult};

use crate::entry::Entry;

/// A container a cursor can walk.
pub trait EntrySource<T> {
    /// Entries in container order.
    fn entries(&self) -> &[Entry<T>];

    /// Modification counter, bumped by every call that changes an entry.
    fn version(&self) -> u64;
}

/// Detached position over an [`EntrySource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryCursor {
    position: usize,
    version: u64,
}

impl EntryCursor {
    /// Start at the first entry of `source`.
    #[must_use]
    pub fn new<T, S: EntrySource<T> + ?Sized>(source: &S) -> Self {
        Self {
            position: 0,
            version: source.version(),
        }
    }

    /// Position of the next entry to be returned.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Version captured when the cursor was created.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Step to the next entry.
    ///
    /// Returns `Ok(None)` once exhausted and an error if `source` changed
    /// since the cursor was created.
    pub fn next<'a, T, S: EntrySource<T> + ?Sized>(
        &mut self,
        source: &'a S,
    ) -> InventoryResult<Option<&'a Entry<T>>> {
        let found = source.version();
        if found != self.version {
            return Err(InventoryError::ConcurrentModification {
                expected: self.version,
                found,
            });
        }
        let entry = source.entries().get(self.position);
        if entry.is_some() {
            self.position += 1;
        }
        Ok(entry)
    }
}
