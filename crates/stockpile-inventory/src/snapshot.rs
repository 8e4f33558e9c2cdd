//! Serialization of whole containers.
//!
//! Both containers serialize as
//! `{ "schema": ..., "stack_size": n, "entries": [...] }`, preserving entry
//! order. Loading checks the schema version and every container invariant,
//! so a hand-edited snapshot cannot produce an oversized or duplicated
//! entry. Subscribers are not part of a snapshot.
//!
//! [`StackTable::from_json`] and [`StackList::from_json`] read the schema
//! first and report an unreadable one as
//! [`StockpileError::VersionMismatch`].
//!
//! ```
//! use stockpile_inventory::prelude::*;
//!
//! let mut list = StackList::new(10).unwrap();
//! list.add("arrow".to_string(), 12).unwrap();
//!
//! let json = list.to_json().unwrap();
//! let restored = StackList::<String>::from_json(&json).unwrap();
//! assert_eq!(restored.entries(), list.entries());
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use stockpile_common::{SchemaVersion, StockpileError, StockpileResult};
use tracing::warn;

use crate::entry::Entry;
use crate::list::StackList;
use crate::stacks::Stacks;
use crate::table::StackTable;

#[derive(Serialize)]
struct SnapshotRef<'a, T> {
    schema: SchemaVersion,
    stack_size: u32,
    entries: &'a [Entry<T>],
}

#[derive(Deserialize)]
struct SchemaHeader {
    #[serde(default)]
    schema: SchemaVersion,
}

/// Reject JSON written with a schema this build cannot read.
fn check_schema(source: &str) -> StockpileResult<()> {
    let header: SchemaHeader = serde_json::from_str(source)?;
    if SchemaVersion::SNAPSHOT.can_read(&header.schema) {
        return Ok(());
    }
    warn!(
        "Rejected inventory snapshot with schema {} (expected {})",
        header.schema,
        SchemaVersion::SNAPSHOT
    );
    Err(StockpileError::VersionMismatch {
        expected: SchemaVersion::SNAPSHOT,
        actual: header.schema,
    })
}

#[derive(Deserialize)]
struct Snapshot<T> {
    #[serde(default)]
    schema: SchemaVersion,
    stack_size: u32,
    entries: Vec<Entry<T>>,
}

impl<T> Snapshot<T> {
    /// Check the invariants shared by both containers.
    fn validate(&self) -> Result<(), String> {
        if !SchemaVersion::SNAPSHOT.can_read(&self.schema) {
            return Err(format!(
                "unsupported snapshot schema {} (expected {})",
                self.schema,
                SchemaVersion::SNAPSHOT
            ));
        }
        if self.stack_size == 0 {
            return Err("stack size must be positive".to_string());
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.quantity() == 0 || entry.quantity() > self.stack_size {
                return Err(format!(
                    "entry {} has quantity {} outside 1..={}",
                    i,
                    entry.quantity(),
                    self.stack_size
                ));
            }
        }
        Ok(())
    }

    fn into_stacks(self) -> Stacks<T> {
        Stacks::from_entries(self.stack_size, self.entries)
    }
}

impl<T: PartialEq> Snapshot<T> {
    fn validate_unique(&self) -> Result<(), String> {
        for (i, entry) in self.entries.iter().enumerate() {
            if self.entries[..i]
                .iter()
                .any(|earlier| earlier.item_slot() == entry.item_slot())
            {
                return Err(format!("entry {i} duplicates an earlier item"));
            }
        }
        Ok(())
    }
}

fn rejected<E: serde::de::Error>(reason: String) -> E {
    warn!("Rejected inventory snapshot: {}", reason);
    E::custom(reason)
}

impl<T: Serialize> Serialize for StackTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SnapshotRef {
            schema: SchemaVersion::SNAPSHOT,
            stack_size: self.stack_size(),
            entries: self.entries(),
        }
        .serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de> + PartialEq> Deserialize<'de> for StackTable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let snapshot = Snapshot::<T>::deserialize(deserializer)?;
        snapshot.validate().map_err(rejected::<D::Error>)?;
        snapshot.validate_unique().map_err(rejected::<D::Error>)?;
        Ok(Self::from_stacks(snapshot.into_stacks()))
    }
}

impl<T: Serialize> Serialize for StackList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SnapshotRef {
            schema: SchemaVersion::SNAPSHOT,
            stack_size: self.stack_size(),
            entries: self.entries(),
        }
        .serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for StackList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let snapshot = Snapshot::<T>::deserialize(deserializer)?;
        snapshot.validate().map_err(rejected::<D::Error>)?;
        Ok(Self::from_stacks(snapshot.into_stacks()))
    }
}

impl<T: Serialize> StackTable<T> {
    /// Serialize to JSON.
    pub fn to_json(&self) -> StockpileResult<String> {
        serde_json::to_string(self).map_err(StockpileError::from)
    }
}

impl<T: for<'de> Deserialize<'de> + PartialEq> StackTable<T> {
    /// Load from JSON.
    pub fn from_json(source: &str) -> StockpileResult<Self> {
        check_schema(source)?;
        serde_json::from_str(source).map_err(StockpileError::from)
    }
}

impl<T: Serialize> StackList<T> {
    /// Serialize to JSON.
    pub fn to_json(&self) -> StockpileResult<String> {
        serde_json::to_string(self).map_err(StockpileError::from)
    }
}

impl<T: for<'de> Deserialize<'de>> StackList<T> {
    /// Load from JSON.
    pub fn from_json(source: &str) -> StockpileResult<Self> {
        check_schema(source)?;
        serde_json::from_str(source).map_err(StockpileError::from)
    }
}
