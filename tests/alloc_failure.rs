// ChainMap behavior when the allocator refuses memory.
//
// A budgeted global allocator lets the current thread perform a fixed
// number of allocations before returning null. Each test checks that the
// failing call reports which part could not be stored and that len and
// every lookup are exactly as before the call.
use chain_hashmap::{ChainMap, DuplicateKeys, MapConfig};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::ptr;

struct Budgeted;

thread_local! {
    // None: unlimited. Some(n): n more allocations succeed.
    static BUDGET: Cell<Option<usize>> = const { Cell::new(None) };
}

fn take_one() -> bool {
    BUDGET
        .try_with(|b| match b.get() {
            None => true,
            Some(0) => false,
            Some(n) => {
                b.set(Some(n - 1));
                true
            }
        })
        .unwrap_or(true)
}

unsafe impl GlobalAlloc for Budgeted {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if take_one() {
            System.alloc(layout)
        } else {
            ptr::null_mut()
        }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if take_one() {
            System.realloc(ptr, layout, new_size)
        } else {
            ptr::null_mut()
        }
    }
}

#[global_allocator]
static GLOBAL: Budgeted = Budgeted;

fn with_budget<R>(allocations: usize, f: impl FnOnce() -> R) -> R {
    BUDGET.with(|b| b.set(Some(allocations)));
    let r = f();
    BUDGET.with(|b| b.set(None));
    r
}

// A map whose arena already has free slots, so inserts only allocate the
// key and value copies.
fn warmed_map(config: MapConfig) -> ChainMap {
    let mut m = ChainMap::with_config(config).unwrap();
    for i in 0..8 {
        m.insert(&format!("tmp{i}"), "x").unwrap();
    }
    for i in 0..8 {
        m.remove(&format!("tmp{i}"));
    }
    m.insert("name", "Surya").unwrap();
    m.insert("city", "Bangalore").unwrap();
    m
}

fn assert_sample_intact(m: &ChainMap) {
    assert_eq!(m.len(), 2);
    assert_eq!(m.get("name"), Some("Surya"));
    assert_eq!(m.get("city"), Some("Bangalore"));
    assert_eq!(m.get("age"), None);
    assert!(!m.contains_key("age"));
}

// Test: the key copy is the first allocation of an insert into a warm arena.
// Verifies: Err names "key"; the map is untouched and usable afterwards.
#[test]
fn key_copy_failure_leaves_map_unchanged() {
    let mut m = warmed_map(MapConfig::new().initial_capacity(4));
    let err = with_budget(0, || m.insert("age", "24")).unwrap_err();
    assert_eq!(err.what(), "key");
    assert_sample_intact(&m);

    m.insert("age", "24").unwrap();
    assert_eq!(m.get("age"), Some("24"));
    assert_eq!(m.len(), 3);
}

// Test: the value copy fails after the key copy succeeded.
// Verifies: Err names "value"; the already-copied key is discarded.
#[test]
fn value_copy_failure_leaves_map_unchanged() {
    let mut m = warmed_map(MapConfig::new().initial_capacity(4));
    let err = with_budget(1, || m.insert("age", "24")).unwrap_err();
    assert_eq!(err.what(), "value");
    assert_sample_intact(&m);
}

// Test: growing the entry arena fails.
// Empty key and value never allocate, so the only allocation an insert can
// attempt is arena growth; keep inserting until it is refused.
// Verifies: Err names "entry"; len and lookups match the state before the call.
#[test]
fn entry_storage_failure_leaves_map_unchanged() {
    let mut m = ChainMap::with_capacity(4);
    m.insert("name", "Surya").unwrap();

    let mut failed = None;
    for _ in 0..64 {
        let before = m.len();
        match with_budget(0, || m.insert("", "")) {
            Ok(()) => assert_eq!(m.len(), before + 1),
            Err(e) => {
                failed = Some((e, before));
                break;
            }
        }
    }
    let (err, before) = failed.expect("arena never needed to grow");
    assert_eq!(err.what(), "entry");
    assert_eq!(m.len(), before);
    assert_eq!(m.get("name"), Some("Surya"));
    assert_eq!(m.get(""), (before > 1).then_some(""));

    m.insert("city", "Bangalore").unwrap();
    assert_eq!(m.get("city"), Some("Bangalore"));
}

// Test: a fresh map has no arena room for its first entry.
// Verifies: the very first insert under a zero budget fails cleanly.
#[test]
fn first_insert_failure_leaves_map_empty() {
    let mut m = ChainMap::with_capacity(4);
    assert!(with_budget(0, || m.insert("name", "Surya")).is_err());
    assert!(m.is_empty());
    assert_eq!(m.get("name"), None);

    m.insert("name", "Surya").unwrap();
    assert_eq!(m.get("name"), Some("Surya"));
}

// Test: overwriting under the Replace policy only copies the value.
// Verifies: Err names "value"; the old value and len are kept.
#[test]
fn replace_failure_keeps_old_value() {
    let cfg = MapConfig::new()
        .initial_capacity(4)
        .duplicates(DuplicateKeys::Replace);
    let mut m = warmed_map(cfg);
    let err = with_budget(0, || m.insert("name", "Kumar")).unwrap_err();
    assert_eq!(err.what(), "value");
    assert_sample_intact(&m);

    m.insert("name", "Kumar").unwrap();
    assert_eq!(m.get("name"), Some("Kumar"));
    assert_eq!(m.len(), 2);
}

// Test: resize cannot obtain the doubled bucket array.
// Verifies: capacity, len and every lookup are unchanged; a later resize works.
#[test]
fn resize_failure_keeps_old_buckets() {
    let mut m = warmed_map(MapConfig::new().initial_capacity(4));
    with_budget(0, || m.resize());
    assert_eq!(m.capacity(), 4);
    assert_sample_intact(&m);

    m.resize();
    assert_eq!(m.capacity(), 8);
    assert_sample_intact(&m);
}
