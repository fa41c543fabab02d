//! Error types for Grove.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Transport failures are deliberately not represented here: they belong
//! to the fetch layer and never escape a cache.

use std::fmt;

use thiserror::Error;

/// Convenience alias used throughout Grove.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Grove operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an unknown field error.
    #[must_use]
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownField(field.into()))
    }

    /// Creates an unsupported operator error.
    #[must_use]
    pub fn operator_not_supported(
        field: impl Into<String>,
        operator: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::OperatorNotSupported {
            field: field.into(),
            operator: operator.into(),
            kind: kind.into(),
        })
    }

    /// Creates a value shape mismatch error.
    #[must_use]
    pub fn value_shape_mismatch(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValueShapeMismatch {
            field: field.into(),
            expected: expected.into(),
        })
    }

    /// Creates a not-sortable error.
    #[must_use]
    pub fn not_sortable(field: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotSortable(field.into()))
    }

    /// Creates a duplicate sort field error.
    #[must_use]
    pub fn duplicate_sort_field(field: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateSortField(field.into()))
    }

    /// Creates a cache key encoding error.
    #[must_use]
    pub fn key_encoding(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::KeyEncoding(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The field is not declared in the query schema.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The operator cannot be applied to the field's kind.
    #[error("operator {operator} not supported on {kind} field {field}")]
    OperatorNotSupported {
        /// The field the filter targets.
        field: String,
        /// The rejected operator.
        operator: String,
        /// The declared kind of the field.
        kind: String,
    },

    /// The filter value does not have the shape its operator requires.
    #[error("filter on {field} expects {expected}")]
    ValueShapeMismatch {
        /// The field the filter targets.
        field: String,
        /// Description of the expected value shape.
        expected: String,
    },

    /// The field is declared but cannot be sorted on.
    #[error("field is not sortable: {0}")]
    NotSortable(String),

    /// The same field appears twice in a sort list.
    #[error("field appears more than once in sort order: {0}")]
    DuplicateSortField(String),

    /// A context could not be encoded into a cache key.
    #[error("cache key encoding failed: {0}")]
    KeyEncoding(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The collection or screen that raised the error (e.g. `plots`).
    pub source: Option<String>,
    /// Additional notes, innermost first.
    pub notes: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source collection.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
        }
        for note in &self.notes {
            write!(f, "\n  {note}")?;
        }
        Ok(())
    }
}
