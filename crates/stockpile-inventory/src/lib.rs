//! # Stockpile Inventory
//!
//! Quantity-tracked inventory containers bounded by a stack size:
//! - [`StackTable`]: one entry per distinct item, strict capacity
//! - [`StackList`]: many entries per item, overflow splits into new stacks
//! - Entry value types and search result grouping
//! - One change notification per mutating call
//! - Fail-fast cursors and JSON snapshots
//!
//! ```
//! use stockpile_inventory::prelude::*;
//!
//! let mut list = StackList::new(99).unwrap();
//! list.add("arrow", 99).unwrap();
//! list.add("arrow", 78).unwrap();
//! list.add("arrow", 99).unwrap();
//! let quantities: Vec<u32> = list.iter().map(Entry::quantity).collect();
//! assert_eq!(quantities, vec![99, 99, 78]);
//!
//! list.remove("arrow", 99).unwrap();
//! let quantities: Vec<u32> = list.iter().map(Entry::quantity).collect();
//! assert_eq!(quantities, vec![99, 78]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod cursor;
pub mod entry;
pub mod events;
pub mod list;
pub mod search;
pub mod snapshot;
pub mod stacking;
mod stacks;
pub mod table;

pub use stockpile_common::{ConfigError, SchemaVersion, StockpileError, StockpileResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::cursor::*;
    pub use crate::entry::*;
    pub use crate::events::*;
    pub use crate::list::*;
    pub use crate::search::*;
    pub use crate::stacking::{TryAddResult, TryRemoveResult, DEFAULT_STACK_SIZE};
    pub use crate::table::*;
    pub use stockpile_common::{InventoryError, InventoryResult, ValidationError};
}

pub use prelude::*;
