// ==============================================
// END-TO-END SCENARIOS (integration)
// ==============================================
//
// Walkthroughs over the public API only: the quantity layouts players see
// after common sequences of pickups, drops and reconfiguration.

use std::sync::Arc;

use parking_lot::Mutex;
use stockpile_inventory::prelude::*;
use stockpile_inventory::{SchemaVersion, StockpileError};

fn quantities<T>(entries: &[Entry<T>]) -> Vec<u32> {
    entries.iter().map(Entry::quantity).collect()
}

#[test]
fn pickup_overflow_in_table_is_clamped_by_try_add() {
    let mut table = StackTable::new(99).expect("positive");
    table.add("herb", 50).expect("fits");

    assert!(matches!(
        table.add("herb", 50),
        Err(InventoryError::Overflow { capacity: 99, .. })
    ));
    assert_eq!(table.quantity_of("herb"), 50);

    let result = table.try_add("herb", 50).expect("valid");
    assert_eq!(result, TryAddResult::new(49, 1));
    assert_eq!(table.quantity_of("herb"), 99);
}

#[test]
fn list_pickups_and_drops_follow_last_stack() {
    let mut list = StackList::new(99).expect("positive");
    list.add("arrow", 281).expect("valid");
    assert_eq!(quantities(list.entries()), vec![99, 99, 83]);

    list.clear();
    list.add("arrow", 99).expect("valid");
    list.add("arrow", 78).expect("valid");
    list.add("arrow", 99).expect("valid");
    assert_eq!(quantities(list.entries()), vec![99, 99, 78]);

    list.remove("arrow", 99).expect("enough");
    assert_eq!(quantities(list.entries()), vec![99, 78]);
}

#[test]
fn clear_twice_notifies_once() {
    let mut list = StackList::new(10).expect("positive");
    let events: Arc<Mutex<Vec<ChangeEvent<&str>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    list.add("arrow", 12).expect("valid");
    list.subscribe(Box::new(move |event| {
        sink.lock().push(event.clone());
    }));

    list.clear();
    list.clear();

    assert!(list.is_empty());
    let events = events.lock();
    assert_eq!(events.len(), 1);
    assert_eq!(quantities(&events[0].old_values), vec![10, 2]);
    assert!(events[0].new_values.is_empty());
}

#[test]
fn grouping_a_mixed_search() {
    let result = SearchResult::new(vec![
        IndexedEntry::new("A", 1, 0),
        IndexedEntry::new("B", 5, 1),
        IndexedEntry::new("A", 3, 2),
    ]);

    let grouped = result.group();

    assert_eq!(grouped[0], GroupedEntry::new("A", 4, &[0, 2]));
    assert_eq!(grouped[1], GroupedEntry::new("B", 5, &[1]));
    assert_eq!(grouped[0].to_string(), "A x4 at indexes 0, 2");
}

#[test]
fn shrinking_stack_size_is_one_event() {
    let mut table = StackTable::new(50).expect("positive");
    table.add("coal", 40).expect("fits");
    table.add("iron", 30).expect("fits");
    table.add("gold", 5).expect("fits");

    let events = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&events);
    table.subscribe(Box::new(move |_| *sink.lock() += 1));

    table.set_stack_size(20).expect("positive");
    assert_eq!(quantities(table.entries()), vec![20, 20, 5]);
    assert_eq!(*events.lock(), 1);

    table.set_stack_size(80).expect("positive");
    assert_eq!(quantities(table.entries()), vec![20, 20, 5]);
    assert_eq!(*events.lock(), 1);

    assert_eq!(
        table.set_stack_size(0),
        Err(InventoryError::Validation(ValidationError::ZeroStackSize))
    );
}

#[test]
fn cursor_fails_fast_after_mutation() {
    let mut list = StackList::new(10).expect("positive");
    list.add("arrow", 30).expect("valid");

    let mut cursor = list.cursor();
    let mut seen = Vec::new();
    while let Some(entry) = cursor.next(&list).expect("unchanged") {
        seen.push(entry.quantity());
    }
    assert_eq!(seen, vec![10, 10, 10]);

    let mut cursor = list.cursor();
    cursor.next(&list).expect("unchanged");
    list.swap(0, 1).expect("in range");
    list.swap(0, 0).expect("in range");
    assert!(matches!(
        cursor.next(&list),
        Err(InventoryError::ConcurrentModification { .. })
    ));
}

#[test]
fn configured_containers_round_trip_through_json() {
    let config = InventoryConfig::from_toml_str("stack_size = 16").expect("valid");
    let mut list: StackList<String> = StackList::with_config(&config).expect("valid");
    list.add("torch".to_string(), 40).expect("valid");
    list.insert_first(None, 3).expect("valid");

    let json = list.to_json().expect("serialize");
    let restored = StackList::<String>::from_json(&json).expect("deserialize");

    assert_eq!(restored.stack_size(), 16);
    assert_eq!(quantities(restored.entries()), vec![3, 16, 16, 8]);
    assert_eq!(restored.entries(), list.entries());

    let future = json.replace(
        &format!("\"major\":{}", SchemaVersion::SNAPSHOT.major),
        "\"major\":9",
    );
    assert!(matches!(
        StackList::<String>::from_json(&future),
        Err(StockpileError::VersionMismatch { .. })
    ));
}
