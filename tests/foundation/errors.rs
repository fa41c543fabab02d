//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use grove_foundation::{Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_unknown_field() {
    let err = Error::unknown_field("colour");
    assert!(matches!(err.kind, ErrorKind::UnknownField(_)));
    assert!(format!("{err}").contains("colour"));
}

#[test]
fn error_operator_not_supported() {
    let err = Error::operator_not_supported("height_cm", "starts_with", "number");
    assert!(matches!(err.kind, ErrorKind::OperatorNotSupported { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("starts_with"));
    assert!(msg.contains("number"));
}

#[test]
fn error_value_shape_mismatch() {
    let err = Error::value_shape_mismatch("habitat", "a list");
    assert!(matches!(err.kind, ErrorKind::ValueShapeMismatch { .. }));
    assert_eq!(format!("{err}"), "filter on habitat expects a list");
}

#[test]
fn error_sort_errors() {
    let err = Error::not_sortable("notes");
    assert!(matches!(err.kind, ErrorKind::NotSortable(_)));

    let err = Error::duplicate_sort_field("planted_on");
    assert!(matches!(err.kind, ErrorKind::DuplicateSortField(_)));
    assert!(format!("{err}").contains("planted_on"));
}

#[test]
fn error_key_encoding() {
    let err = Error::key_encoding("buffer full");
    assert!(matches!(err.kind, ErrorKind::KeyEncoding(_)));
    assert!(format!("{err}").contains("buffer full"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_is_optional() {
    let err = Error::unknown_field("x");
    assert!(err.context.is_none());
}

#[test]
fn context_display() {
    let context = ErrorContext::new()
        .with_source("plots")
        .with_note("while restoring saved view")
        .with_note("column 3");
    let err = Error::not_sortable("notes").with_context(context);

    let rendered = err.context.as_ref().map(ToString::to_string).unwrap();
    assert_eq!(rendered, "in plots\n  while restoring saved view\n  column 3");
}

#[test]
fn errors_are_std_errors() {
    fn takes_std_error(_: &dyn std::error::Error) {}
    takes_std_error(&Error::new(ErrorKind::KeyEncoding("unencodable".into())));
}
