//! Stack capacity arithmetic.
//!
//! Pure functions deciding how a quantity fills an existing stack, spills
//! into new stacks and drains out of several stacks. The containers apply
//! these plans and record the resulting changes.
//!
//! ```
//! use stockpile_inventory::stacking::plan_fill;
//!
//! // 281 units into stacks of 99 with no partial stack to top up
//! let plan = plan_fill(281, 99, None);
//! assert_eq!(plan.top_up, 0);
//! assert_eq!(plan.new_stacks, vec![99, 99, 83]);
//! ```

use serde::{Deserialize, Serialize};
use stockpile_common::{InventoryError, InventoryResult};
use tracing::trace;

/// Default stack size.
pub const DEFAULT_STACK_SIZE: u32 = 64;

/// Outcome of a `try_add*` call.
///
/// Predicate adds apply the requested quantity to every match, so the
/// counts are summed over all matches and can exceed the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TryAddResult {
    /// Quantity actually applied.
    pub added: u64,
    /// Quantity rejected for lack of capacity or matches.
    pub not_added: u64,
}

impl TryAddResult {
    /// Create a result.
    #[must_use]
    pub const fn new(added: u64, not_added: u64) -> Self {
        Self { added, not_added }
    }

    /// Requested quantity (`added + not_added`).
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.added + self.not_added
    }

    /// Check if everything was applied.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.not_added == 0
    }
}

/// Outcome of a `try_remove*` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TryRemoveResult {
    /// Quantity actually removed.
    pub removed: u64,
    /// Quantity that could not be removed.
    pub not_removed: u64,
}

impl TryRemoveResult {
    /// Create a result.
    #[must_use]
    pub const fn new(removed: u64, not_removed: u64) -> Self {
        Self {
            removed,
            not_removed,
        }
    }

    /// Requested quantity (`removed + not_removed`).
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.removed + self.not_removed
    }

    /// Check if everything was removed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.not_removed == 0
    }
}

/// How a quantity is spread over an existing partial stack and new stacks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FillPlan {
    /// Amount added to the existing partial stack.
    pub top_up: u32,
    /// Quantities of the stacks to create, in fill order.
    pub new_stacks: Vec<u32>,
}

/// Free space left in a stack holding `current`.
#[must_use]
pub const fn remaining_capacity(current: u32, stack_size: u32) -> u32 {
    stack_size.saturating_sub(current)
}

/// Cut `quantity` into full stacks followed by one remainder stack.
///
/// No remainder stack is produced when `quantity` divides evenly.
#[must_use]
pub fn split_into_stacks(quantity: u32, stack_size: u32) -> Vec<u32> {
    if quantity == 0 || stack_size == 0 {
        return Vec::new();
    }
    let full = quantity / stack_size;
    let remainder = quantity % stack_size;
    let mut stacks = vec![stack_size; full as usize];
    if remainder != 0 {
        stacks.push(remainder);
    }
    stacks
}

/// Plan adding `requested` units.
///
/// `last_stack` is the quantity of the last existing stack of the item, if
/// any. Only that stack is topped up; earlier partial stacks are left alone.
#[must_use]
pub fn plan_fill(requested: u32, stack_size: u32, last_stack: Option<u32>) -> FillPlan {
    let top_up = last_stack
        .map(|current| remaining_capacity(current, stack_size).min(requested))
        .unwrap_or(0);
    let new_stacks = split_into_stacks(requested - top_up, stack_size);
    trace!(
        "Fill {} (stack size {}): top up {}, {} new stacks",
        requested,
        stack_size,
        top_up,
        new_stacks.len()
    );
    FillPlan { top_up, new_stacks }
}

/// Total after adding `requested` to `current`, or an overflow error.
pub fn checked_fill(current: u32, requested: u32, stack_size: u32) -> InventoryResult<u32> {
    match current.checked_add(requested) {
        Some(total) if total <= stack_size => Ok(total),
        _ => Err(InventoryError::Overflow {
            capacity: stack_size,
            current,
            requested,
        }),
    }
}

/// Split `requested` into the amount that fits and the amount that does not.
#[must_use]
pub fn clamp_fill(current: u32, requested: u32, stack_size: u32) -> (u32, u32) {
    let added = remaining_capacity(current, stack_size).min(requested);
    (added, requested - added)
}

/// Plan draining `requested` units from stacks listed in drain order.
///
/// Returns the amount taken from each stack (same order, stopping at the
/// first stack that is not needed) and the total taken.
#[must_use]
pub fn plan_drain(stacks: &[u32], requested: u32) -> (Vec<u32>, u32) {
    let mut remaining = requested;
    let mut takes = Vec::new();
    for &quantity in stacks {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(quantity);
        takes.push(take);
        remaining -= take;
    }
    (takes, requested - remaining)
}

/// Exact sum of quantities.
///
/// Each stack is bounded by a `u32` stack size but a list may hold any
/// number of stacks, so sums are widened.
#[must_use]
pub fn total_quantity<I: IntoIterator<Item = u32>>(quantities: I) -> u64 {
    quantities.into_iter().map(u64::from).sum()
}
