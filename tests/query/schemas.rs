//! Integration tests for QuerySchema validation

use std::sync::Arc;

use grove_foundation::ErrorKind;
use grove_query::{
    FieldKind, FieldSpec, FilterCriterion, FilterOperator, FilterSortContext, FilterValue,
    QuerySchema, SortCriterion,
};

fn plots() -> QuerySchema {
    QuerySchema::new()
        .with_field(FieldSpec::new("name", FieldKind::Text))
        .with_field(FieldSpec::new("available", FieldKind::Number))
        .with_field(FieldSpec::new("opened_on", FieldKind::Date))
        .with_field(FieldSpec::new("giftable", FieldKind::Flag))
        .with_field(FieldSpec::choice("region", ["north", "south"]))
        .with_field(FieldSpec::new("remarks", FieldKind::Text).unsortable())
}

// =============================================================================
// Filters
// =============================================================================

#[test]
fn accepts_well_formed_filters() {
    let schema = plots();
    let accepted = [
        FilterCriterion::contains("name", "ridge"),
        FilterCriterion::equals("available", FilterValue::Number(12)),
        FilterCriterion::new(
            "available",
            FilterOperator::Between,
            FilterValue::NumberRange(1, 10),
        ),
        FilterCriterion::new(
            "opened_on",
            FilterOperator::Between,
            FilterValue::TextRange("2023-01-01".into(), "2023-12-31".into()),
        ),
        FilterCriterion::equals("giftable", FilterValue::Flag(true)),
        FilterCriterion::any_of("region", ["north"]),
        FilterCriterion::new("remarks", FilterOperator::IsEmpty, FilterValue::None),
    ];
    for criterion in &accepted {
        assert!(schema.validate_filter(criterion).is_ok(), "{criterion:?}");
    }
}

#[test]
fn rejects_operator_outside_field_kind() {
    let err = plots()
        .validate_filter(&FilterCriterion::contains("available", "3"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::OperatorNotSupported { .. }));
}

#[test]
fn rejects_wrong_value_shape() {
    let schema = plots();
    let cases = [
        FilterCriterion::equals("available", FilterValue::text("many")),
        FilterCriterion::new("remarks", FilterOperator::IsEmpty, FilterValue::text("x")),
        FilterCriterion::any_of("region", Vec::<String>::new()),
        FilterCriterion::any_of("region", ["east"]),
        FilterCriterion::new(
            "available",
            FilterOperator::Between,
            FilterValue::NumberRange(10, 1),
        ),
    ];
    for criterion in &cases {
        let err = schema.validate_filter(criterion).unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::ValueShapeMismatch { .. }),
            "{criterion:?} gave {err}"
        );
    }
}

// =============================================================================
// Sorting
// =============================================================================

#[test]
fn sort_validation() {
    let schema = plots();
    assert!(schema.validate_sort(&SortCriterion::asc("name")).is_ok());

    let err = schema.validate_sort(&SortCriterion::desc("remarks")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotSortable(_)));

    let err = schema.validate_sort(&SortCriterion::desc("planted")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownField(_)));
}

#[test]
fn rejection_context_reaches_the_caller() {
    let context = FilterSortContext::new(Arc::new(plots()));
    let err = context
        .with_filter(FilterCriterion::any_of("region", ["east"]))
        .unwrap_err();
    let rendered = err.context.as_ref().map(ToString::to_string).unwrap();
    assert_eq!(rendered, "\n  while validating filter `region is_any_of`");

    let err = context.with_order([SortCriterion::asc("remarks")]).unwrap_err();
    assert!(err.context.unwrap().notes[0].contains("remarks"));
}

#[test]
fn schema_lists_fields() {
    let schema = plots();
    assert_eq!(schema.len(), 6);
    assert!(!schema.is_empty());
    assert_eq!(schema.field("region").map(|f| f.kind), Some(FieldKind::Choice));
}
