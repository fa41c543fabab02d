//! Integration tests for CacheStore
//!
//! Tests sparse merging, window reads, gaps, scoping, and invalidation.

use std::sync::Arc;

use grove_cache::CacheStore;
use grove_foundation::{Entity, Window};
use grove_query::{
    CacheKey, FieldKind, FieldSpec, FilterCriterion, FilterSortContext, QuerySchema, SortCriterion,
};

#[derive(Clone, Debug, PartialEq)]
struct Tree {
    sapling_id: String,
    height_cm: u32,
}

impl Entity for Tree {
    type Id = String;

    fn id(&self) -> String {
        self.sapling_id.clone()
    }
}

fn tree(n: usize) -> Tree {
    Tree {
        sapling_id: format!("S-{n:04}"),
        height_cm: u32::try_from(n).unwrap() * 3,
    }
}

fn trees(range: std::ops::Range<usize>) -> Vec<Tree> {
    range.map(tree).collect()
}

fn context() -> FilterSortContext {
    FilterSortContext::new(Arc::new(
        QuerySchema::new()
            .with_field(FieldSpec::new("sapling_id", FieldKind::Text))
            .with_field(FieldSpec::new("height_cm", FieldKind::Number)),
    ))
}

fn key_sorted_by(field: &str) -> CacheKey {
    context()
        .with_order([SortCriterion::asc(field)])
        .unwrap()
        .key()
        .unwrap()
}

// =============================================================================
// Merging and Reading
// =============================================================================

#[test]
fn pages_fill_the_sparse_index() {
    let key = key_sorted_by("sapling_id");
    let mut store = CacheStore::new();

    store.merge(&key, 0, trees(0..10), 25);
    store.merge(&key, 20, trees(20..25), 25);

    let read = store.get_window(&key, Window::new(0, 25));
    assert_eq!(read.total, Some(25));
    assert_eq!(read.missing_count(), 10);
    assert_eq!(read.slots[9], Some(&tree(9)));
    assert_eq!(read.slots[10], None);
    assert_eq!(read.slots[24], Some(&tree(24)));

    let resident: Vec<usize> = read.resident().map(|(p, _)| p).collect();
    assert_eq!(resident.len(), 15);
    assert_eq!(resident[10], 20);
}

#[test]
fn window_is_clamped_to_total() {
    let key = key_sorted_by("sapling_id");
    let mut store = CacheStore::new();
    store.merge(&key, 20, trees(20..25), 25);

    let read = store.get_window(&key, Window::new(20, 10));
    assert_eq!(read.window, Window::new(20, 5));
    assert!(read.is_complete());
}

#[test]
fn lookup_by_position_and_id() {
    let key = key_sorted_by("sapling_id");
    let mut store = CacheStore::new();
    store.merge(&key, 0, trees(0..3), 3);

    assert_eq!(store.get(&key, 2).map(|t| t.height_cm), Some(6));
    assert_eq!(store.entity(&key, &"S-0001".to_string()), Some(&tree(1)));
    assert_eq!(store.ids_in_window(&key, Window::new(0, 10)).len(), 3);
}

#[test]
fn remerging_a_page_is_idempotent() {
    let key = key_sorted_by("sapling_id");
    let mut store = CacheStore::new();
    store.merge(&key, 0, trees(0..10), 25);
    let report = store.merge(&key, 0, trees(0..10), 25);

    assert_eq!(report.written, 10);
    assert_eq!(report.replaced, 0);
    assert_eq!(store.resident_len(&key), 10);
}

#[test]
fn shrinking_total_prunes_tail() {
    let key = key_sorted_by("sapling_id");
    let mut store = CacheStore::new();
    store.merge(&key, 0, trees(0..10), 25);
    store.merge(&key, 20, trees(20..25), 25);

    let report = store.merge(&key, 0, trees(0..10), 12);
    assert_eq!(report.pruned, 5);
    assert_eq!(store.total(&key), Some(12));
    assert!(store.get(&key, 20).is_none());
    assert!(store.entity(&key, &"S-0020".to_string()).is_none());
}

// =============================================================================
// Gaps
// =============================================================================

#[test]
fn first_gap_runs_to_end_of_window() {
    let key = key_sorted_by("sapling_id");
    let mut store = CacheStore::new();
    assert_eq!(
        store.first_gap(&key, Window::new(0, 10)),
        Some(Window::new(0, 10))
    );

    store.merge(&key, 0, trees(0..10), 25);
    assert_eq!(store.first_gap(&key, Window::new(0, 10)), None);
    assert_eq!(
        store.first_gap(&key, Window::new(5, 10)),
        Some(Window::new(10, 5))
    );
    assert_eq!(
        store.first_gap(&key, Window::new(20, 10)),
        Some(Window::new(20, 10))
    );
    assert_eq!(store.first_gap(&key, Window::new(30, 10)), None);
}

// =============================================================================
// Scoping
// =============================================================================

#[test]
fn different_sort_is_a_different_scope() {
    let by_id = key_sorted_by("sapling_id");
    let by_height = key_sorted_by("height_cm");
    let mut store = CacheStore::new();
    store.merge(&by_id, 0, trees(0..10), 25);

    assert!(!store.is_active(&by_height));
    assert_eq!(store.get_window(&by_height, Window::new(0, 10)).missing_count(), 10);

    let report = store.merge(&by_height, 0, trees(0..10), 25);
    assert!(report.rescoped);
    assert!(!store.is_active(&by_id));
}

#[test]
fn invalidate_only_affects_active_key() {
    let key = key_sorted_by("sapling_id");
    let other = context()
        .with_filter(FilterCriterion::contains("sapling_id", "S-00"))
        .unwrap()
        .key()
        .unwrap();
    let mut store = CacheStore::new();
    store.merge(&key, 0, trees(0..10), 25);

    assert!(!store.invalidate(&other));
    assert_eq!(store.resident_len(&key), 10);
    assert!(store.invalidate(&key));
    assert_eq!(store.total(&key), None);
    assert_eq!(store.active_key(), None);
}

#[test]
fn snapshot_does_not_see_later_merges() {
    let key = key_sorted_by("sapling_id");
    let mut store = CacheStore::new();
    store.merge(&key, 0, trees(0..10), 25);
    let snapshot = store.snapshot();

    store.merge(&key, 10, trees(10..20), 25);
    store.clear();

    assert_eq!(snapshot.resident_len(&key), 10);
    assert_eq!(store.resident_len(&key), 0);
}
