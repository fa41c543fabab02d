//! Integration tests for FilterSortContext

use std::sync::Arc;

use grove_foundation::ErrorKind;
use grove_query::{
    FieldKind, FieldSpec, FilterCriterion, FilterSortContext, QuerySchema, SortCriterion, key_of,
};

fn context() -> FilterSortContext {
    FilterSortContext::new(Arc::new(
        QuerySchema::new()
            .with_field(FieldSpec::new("name", FieldKind::Text))
            .with_field(FieldSpec::new("species", FieldKind::Text))
            .with_field(FieldSpec::new("height_cm", FieldKind::Number)),
    ))
}

// =============================================================================
// Filters
// =============================================================================

#[test]
fn filters_are_replaced_per_field() {
    let ctx = context()
        .with_filter(FilterCriterion::contains("name", "oak"))
        .unwrap()
        .with_filter(FilterCriterion::contains("name", "elm"))
        .unwrap();
    assert_eq!(ctx.filters().count(), 1);
    assert_eq!(
        ctx.filter("name"),
        Some(&FilterCriterion::contains("name", "elm"))
    );
}

#[test]
fn original_context_is_untouched() {
    let base = context();
    let filtered = base
        .with_filter(FilterCriterion::contains("species", "birch"))
        .unwrap();
    assert!(base.is_unfiltered());
    assert!(!filtered.is_unfiltered());
    assert!(base.invalidated_by(&filtered));
}

#[test]
fn removing_filters() {
    let ctx = context()
        .with_filter(FilterCriterion::contains("name", "oak"))
        .unwrap()
        .with_filter(FilterCriterion::contains("species", "quercus"))
        .unwrap()
        .with_order([SortCriterion::asc("height_cm")])
        .unwrap();

    let one_less = ctx.without_filter("name");
    assert_eq!(one_less.filters().count(), 1);

    let none = ctx.without_filters();
    assert!(none.is_unfiltered());
    assert_eq!(none.order().count(), 1);
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn order_keeps_significance() {
    let ctx = context()
        .with_order([SortCriterion::desc("height_cm"), SortCriterion::asc("name")])
        .unwrap();
    let fields: Vec<_> = ctx.order().map(|s| s.field.as_str()).collect();
    assert_eq!(fields, vec!["height_cm", "name"]);
}

#[test]
fn duplicate_sort_field_is_rejected() {
    let err = context()
        .with_order([SortCriterion::desc("name"), SortCriterion::asc("name")])
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateSortField(_)));
}

#[test]
fn identical_contexts_do_not_invalidate() {
    let a = context()
        .with_filter(FilterCriterion::contains("name", "oak"))
        .unwrap();
    let b = context()
        .with_filter(FilterCriterion::contains("name", "oak"))
        .unwrap();
    assert!(!a.invalidated_by(&b));
    assert_eq!(key_of(&a).unwrap(), key_of(&b).unwrap());
}
