//! Integration tests for SelectionTracker

use grove_cache::{Coverage, SelectionTracker};

#[test]
fn selection_is_by_identifier() {
    let mut sel = SelectionTracker::new();
    sel.select("S-0003".to_string());
    sel.select("S-0007".to_string());

    // A re-sorted page presents the same ids in a different order.
    let page = ["S-0007".to_string(), "S-0001".to_string(), "S-0003".to_string()];
    assert_eq!(sel.coverage(&page), Coverage::Partial);
    assert!(sel.is_selected(&"S-0003".to_string()));
}

#[test]
fn header_checkbox_cycle() {
    let mut sel = SelectionTracker::new();
    let page: Vec<u64> = (100..110).collect();

    sel.select_all(page.iter().copied());
    assert_eq!(sel.coverage(&page), Coverage::All);

    sel.deselect(&105);
    assert_eq!(sel.coverage(&page), Coverage::Partial);

    sel.deselect_all(&page);
    assert_eq!(sel.coverage(&page), Coverage::None);
    assert!(sel.is_empty());
}

#[test]
fn selections_outside_page_are_kept() {
    let mut sel = SelectionTracker::new();
    sel.select(1u64);
    sel.select_all(10..20u64);
    let page: Vec<u64> = (10..20).collect();
    sel.deselect_all(&page);
    assert_eq!(sel.len(), 1);
    assert_eq!(sel.selected_ids().into_iter().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn snapshot_is_independent() {
    let mut sel = SelectionTracker::new();
    sel.toggle('a');
    let snapshot = sel.selected_ids();
    sel.clear();
    assert!(sel.is_empty());
    assert!(snapshot.contains(&'a'));
}
