//! Change notification.
//!
//! Every mutating call on a container collects the entries it touched into a
//! [`ChangeSet`] and fires it as a single [`ChangeEvent`] once the mutation
//! is complete. Calls that end up changing nothing fire nothing.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::entry::Entry;

/// The entries affected by one mutating call.
///
/// An entry that grew or shrank appears in both lists: its previous state in
/// `old_values` and its new state in `new_values`. Created entries only
/// appear in `new_values`, deleted entries only in `old_values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent<T> {
    /// Entries as they were before the call.
    pub old_values: Vec<Entry<T>>,
    /// Entries as they are after the call.
    pub new_values: Vec<Entry<T>>,
}

impl<T> ChangeEvent<T> {
    /// Sum of the old quantities.
    #[must_use]
    pub fn old_quantity(&self) -> u64 {
        self.old_values.iter().map(|e| u64::from(e.quantity())).sum()
    }

    /// Sum of the new quantities.
    #[must_use]
    pub fn new_quantity(&self) -> u64 {
        self.new_values.iter().map(|e| u64::from(e.quantity())).sum()
    }
}

/// Collects old and new values while a call is in progress.
#[derive(Debug)]
pub(crate) struct ChangeSet<T> {
    old_values: Vec<Entry<T>>,
    new_values: Vec<Entry<T>>,
}

impl<T> Default for ChangeSet<T> {
    fn default() -> Self {
        Self {
            old_values: Vec::new(),
            new_values: Vec::new(),
        }
    }
}

impl<T> ChangeSet<T> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn removed(&mut self, entry: Entry<T>) {
        self.old_values.push(entry);
    }

    pub(crate) fn added(&mut self, entry: Entry<T>) {
        self.new_values.push(entry);
    }

    pub(crate) fn updated(&mut self, before: Entry<T>, after: Entry<T>) {
        self.old_values.push(before);
        self.new_values.push(after);
    }

    pub(crate) fn old_len(&self) -> usize {
        self.old_values.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.old_values.is_empty() && self.new_values.is_empty()
    }

    pub(crate) fn into_event(self) -> ChangeEvent<T> {
        ChangeEvent {
            old_values: self.old_values,
            new_values: self.new_values,
        }
    }
}

/// Callback type for change notifications.
pub type ChangeCallback<T> = Box<dyn Fn(&ChangeEvent<T>) + Send + Sync>;

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Ordered list of subscribers, invoked synchronously in registration order.
pub struct ChangeNotifier<T> {
    callbacks: Vec<(SubscriptionId, ChangeCallback<T>)>,
    next_id: u64,
}

impl<T> Default for ChangeNotifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ChangeNotifier<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}

impl<T> ChangeNotifier<T> {
    /// Creates a notifier with no subscribers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            callbacks: Vec::new(),
            next_id: 1,
        }
    }

    /// Registers a callback.
    pub fn subscribe(&mut self, callback: ChangeCallback<T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        debug!("Subscriber {} registered", id.0);
        id
    }

    /// Removes a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sub, _)| *sub != id);
        before != self.callbacks.len()
    }

    /// Returns the number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Returns true if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Fires `changes` as one event. Returns false if there was nothing to report.
    pub(crate) fn notify(&self, changes: ChangeSet<T>) -> bool {
        if changes.is_empty() {
            return false;
        }
        let event = changes.into_event();
        trace!(
            "Change: {} -> {} entries, quantity {} -> {}",
            event.old_values.len(),
            event.new_values.len(),
            event.old_quantity(),
            event.new_quantity()
        );
        for (_, callback) in &self.callbacks {
            callback(&event);
        }
        true
    }
}
