//! Individual filter and sort terms.
//!
//! Criteria are plain data: they are validated against a
//! [`QuerySchema`](crate::QuerySchema) when added to a context, and
//! forwarded verbatim to the data-fetch collaborator.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Filter Operator
// =============================================================================

/// Comparison applied by a filter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Substring match.
    Contains,
    /// Exact match.
    Equals,
    /// Negated exact match.
    NotEquals,
    /// Prefix match.
    StartsWith,
    /// Suffix match.
    EndsWith,
    /// Strictly greater (numbers) or strictly after (dates).
    GreaterThan,
    /// Greater or equal.
    GreaterOrEqual,
    /// Strictly less (numbers) or strictly before (dates).
    LessThan,
    /// Less or equal.
    LessOrEqual,
    /// Inclusive range.
    Between,
    /// Membership in a list of values.
    IsAnyOf,
    /// Field is null or blank.
    IsEmpty,
    /// Field is present.
    IsNotEmpty,
}

impl FilterOperator {
    /// Returns the operator's wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::GreaterThan => "greater_than",
            Self::GreaterOrEqual => "greater_or_equal",
            Self::LessThan => "less_than",
            Self::LessOrEqual => "less_or_equal",
            Self::Between => "between",
            Self::IsAnyOf => "is_any_of",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
        }
    }

    /// Returns true if the operator takes no operand.
    #[must_use]
    pub const fn is_nullary(self) -> bool {
        matches!(self, Self::IsEmpty | Self::IsNotEmpty)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Filter Value
// =============================================================================

/// Operand of a filter.
///
/// Dates travel as ISO-8601 text (`2024-03-01`), which sorts correctly as a
/// string and needs no calendar dependency here.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    /// No operand (for `is_empty` / `is_not_empty`).
    None,
    /// Text operand (text, date, and choice fields).
    Text(String),
    /// Integer operand.
    Number(i64),
    /// Boolean operand.
    Flag(bool),
    /// List operand (for `is_any_of`).
    List(Vec<String>),
    /// Inclusive integer range.
    NumberRange(i64, i64),
    /// Inclusive text range (dates).
    TextRange(String, String),
}

impl FilterValue {
    /// Creates a text operand.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Creates a list operand.
    #[must_use]
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// Returns a short description of the operand's shape.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::None => "no value",
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Flag(_) => "flag",
            Self::List(_) => "list",
            Self::NumberRange(..) => "number range",
            Self::TextRange(..) => "text range",
        }
    }
}

// =============================================================================
// Filter Criterion
// =============================================================================

/// A single filter on one field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterCriterion {
    /// The field being filtered.
    pub field: String,
    /// The comparison.
    pub operator: FilterOperator,
    /// The operand.
    pub value: FilterValue,
}

impl FilterCriterion {
    /// Creates a filter criterion.
    #[must_use]
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Shorthand for a `contains` text filter.
    #[must_use]
    pub fn contains(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Contains, FilterValue::text(text))
    }

    /// Shorthand for an `equals` filter.
    #[must_use]
    pub fn equals(field: impl Into<String>, value: FilterValue) -> Self {
        Self::new(field, FilterOperator::Equals, value)
    }

    /// Shorthand for an `is_any_of` filter.
    #[must_use]
    pub fn any_of<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(field, FilterOperator::IsAnyOf, FilterValue::list(values))
    }
}

// =============================================================================
// Sort Criterion
// =============================================================================

/// Direction of a sort term.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// A single sort term. Sort lists are significant in order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortCriterion {
    /// The field being sorted on.
    pub field: String,
    /// The direction.
    pub direction: SortDirection,
}

impl SortCriterion {
    /// Creates an ascending sort on `field`.
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Creates a descending sort on `field`.
    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}
