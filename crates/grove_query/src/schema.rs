//! Query schemas.
//!
//! A schema declares which fields of a collection can be filtered and
//! sorted on, and what kind of data each holds. Contexts validate every
//! criterion against their schema so that no unkeyable or meaningless
//! query ever reaches the fetch layer.

use std::fmt;

use grove_foundation::{Error, ErrorContext, Result};
use im::OrdMap;

use crate::criterion::{FilterCriterion, FilterOperator, FilterValue, SortCriterion};

// =============================================================================
// Field Kind
// =============================================================================

/// Kind of data a field holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Integer.
    Number,
    /// ISO-8601 date.
    Date,
    /// One of a fixed set of values.
    Choice,
    /// Boolean.
    Flag,
}

impl FieldKind {
    /// Returns true if `operator` is meaningful for this kind.
    #[must_use]
    pub const fn supports(self, operator: FilterOperator) -> bool {
        use FilterOperator as Op;
        match self {
            Self::Text => matches!(
                operator,
                Op::Contains
                    | Op::Equals
                    | Op::NotEquals
                    | Op::StartsWith
                    | Op::EndsWith
                    | Op::IsAnyOf
                    | Op::IsEmpty
                    | Op::IsNotEmpty
            ),
            Self::Number | Self::Date => matches!(
                operator,
                Op::Equals
                    | Op::NotEquals
                    | Op::GreaterThan
                    | Op::GreaterOrEqual
                    | Op::LessThan
                    | Op::LessOrEqual
                    | Op::Between
                    | Op::IsEmpty
                    | Op::IsNotEmpty
            ),
            Self::Choice => matches!(
                operator,
                Op::Equals | Op::NotEquals | Op::IsAnyOf | Op::IsEmpty | Op::IsNotEmpty
            ),
            Self::Flag => matches!(operator, Op::Equals),
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Choice => "choice",
            Self::Flag => "flag",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Field Spec
// =============================================================================

/// Declaration of one queryable field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as understood by the server.
    pub name: String,
    /// Kind of data.
    pub kind: FieldKind,
    /// Whether the server can order by this field.
    pub sortable: bool,
    /// Allowed values for choice fields. Empty means unrestricted.
    pub choices: Vec<String>,
}

impl FieldSpec {
    /// Creates a sortable field of the given kind.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            sortable: true,
            choices: Vec::new(),
        }
    }

    /// Creates a choice field restricted to `choices`.
    #[must_use]
    pub fn choice<I, S>(name: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            ..Self::new(name, FieldKind::Choice)
        }
    }

    /// Marks the field as filter-only.
    #[must_use]
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    fn allows_choice(&self, value: &str) -> bool {
        self.choices.is_empty() || self.choices.iter().any(|c| c == value)
    }
}

// =============================================================================
// Query Schema
// =============================================================================

/// The set of queryable fields of one collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuerySchema {
    fields: OrdMap<String, FieldSpec>,
}

impl QuerySchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field declaration, replacing any previous one of the same name.
    #[must_use]
    pub fn with_field(mut self, spec: FieldSpec) -> Self {
        self.fields.insert(spec.name.clone(), spec);
        self
    }

    /// Returns the declaration for `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Returns the number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates declarations in field-name order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values()
    }

    /// Validates a filter criterion.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is undeclared, the operator does not
    /// apply to the field's kind, or the operand has the wrong shape. The
    /// error carries a note naming the rejected criterion.
    pub fn validate_filter(&self, criterion: &FilterCriterion) -> Result<()> {
        self.check_filter(criterion).map_err(|e| {
            e.with_context(ErrorContext::new().with_note(format!(
                "while validating filter `{} {}`",
                criterion.field, criterion.operator
            )))
        })
    }

    /// Validates a sort criterion.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is undeclared or not sortable. The error
    /// carries a note naming the rejected field.
    pub fn validate_sort(&self, criterion: &SortCriterion) -> Result<()> {
        self.check_sort(criterion).map_err(|e| {
            e.with_context(
                ErrorContext::new()
                    .with_note(format!("while validating sort on `{}`", criterion.field)),
            )
        })
    }

    fn check_filter(&self, criterion: &FilterCriterion) -> Result<()> {
        let spec = self
            .field(&criterion.field)
            .ok_or_else(|| Error::unknown_field(&criterion.field))?;

        if !spec.kind.supports(criterion.operator) {
            return Err(Error::operator_not_supported(
                &spec.name,
                criterion.operator.name(),
                spec.kind.name(),
            ));
        }

        let mismatch = |expected: &str| Err(Error::value_shape_mismatch(&spec.name, expected));

        match (criterion.operator, &criterion.value) {
            (op, FilterValue::None) if op.is_nullary() => Ok(()),
            (op, _) if op.is_nullary() => mismatch("no value"),

            (FilterOperator::IsAnyOf, FilterValue::List(values)) => {
                if values.is_empty() {
                    mismatch("a non-empty list")
                } else if spec.kind == FieldKind::Choice
                    && !values.iter().all(|v| spec.allows_choice(v))
                {
                    mismatch("values from the declared choices")
                } else {
                    Ok(())
                }
            }
            (FilterOperator::IsAnyOf, _) => mismatch("a list"),

            (FilterOperator::Between, FilterValue::NumberRange(lo, hi))
                if spec.kind == FieldKind::Number =>
            {
                if lo <= hi {
                    Ok(())
                } else {
                    mismatch("an ascending number range")
                }
            }
            (FilterOperator::Between, FilterValue::TextRange(lo, hi))
                if spec.kind == FieldKind::Date =>
            {
                if lo <= hi {
                    Ok(())
                } else {
                    mismatch("an ascending date range")
                }
            }
            (FilterOperator::Between, _) => mismatch("a range"),

            (_, value) => match (spec.kind, value) {
                (FieldKind::Text | FieldKind::Date, FilterValue::Text(_))
                | (FieldKind::Number, FilterValue::Number(_))
                | (FieldKind::Flag, FilterValue::Flag(_)) => Ok(()),
                (FieldKind::Choice, FilterValue::Text(v)) if spec.allows_choice(v) => Ok(()),
                (FieldKind::Choice, FilterValue::Text(_)) => {
                    mismatch("a value from the declared choices")
                }
                (FieldKind::Text | FieldKind::Date | FieldKind::Choice, _) => mismatch("text"),
                (FieldKind::Number, _) => mismatch("a number"),
                (FieldKind::Flag, _) => mismatch("a flag"),
            },
        }
    }

    fn check_sort(&self, criterion: &SortCriterion) -> Result<()> {
        let spec = self
            .field(&criterion.field)
            .ok_or_else(|| Error::unknown_field(&criterion.field))?;
        if spec.sortable {
            Ok(())
        } else {
            Err(Error::not_sortable(&spec.name))
        }
    }
}
