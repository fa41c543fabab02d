//! Filter/sort contexts.
//!
//! A [`FilterSortContext`] is the immutable description of the query a table
//! is currently showing. All transitions return a new context; the old one is
//! untouched, which lets a scheduler compare "the query I fetched for" with
//! "the query now on screen".
//!
//! Filters are keyed by field, so insertion order never affects the key. The
//! sort list is kept exactly as given because its order changes the result.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use grove_foundation::{Error, Result};
use im::{OrdMap, Vector};

use crate::criterion::{FilterCriterion, SortCriterion};
use crate::key::CacheKey;
use crate::schema::QuerySchema;

/// Immutable filter and sort state of a collection view.
///
/// Clone is cheap: the schema is shared and the collections are persistent.
#[derive(Clone)]
pub struct FilterSortContext {
    schema: Arc<QuerySchema>,
    filters: OrdMap<String, FilterCriterion>,
    order: Vector<SortCriterion>,
}

impl FilterSortContext {
    /// Creates an unfiltered, unsorted context over `schema`.
    #[must_use]
    pub fn new(schema: Arc<QuerySchema>) -> Self {
        Self {
            schema,
            filters: OrdMap::new(),
            order: Vector::new(),
        }
    }

    /// Returns the schema this context validates against.
    #[must_use]
    pub fn schema(&self) -> &QuerySchema {
        &self.schema
    }

    /// Returns a context with `criterion` applied, replacing any existing
    /// filter on the same field.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the criterion does not fit the schema.
    pub fn with_filter(&self, criterion: FilterCriterion) -> Result<Self> {
        self.schema.validate_filter(&criterion)?;
        let mut next = self.clone();
        next.filters.insert(criterion.field.clone(), criterion);
        Ok(next)
    }

    /// Returns a context without any filter on `field`.
    ///
    /// Removing a filter that is not present yields an equal context.
    #[must_use]
    pub fn without_filter(&self, field: &str) -> Self {
        let mut next = self.clone();
        next.filters.remove(field);
        next
    }

    /// Returns a context with every filter removed and the order kept.
    #[must_use]
    pub fn without_filters(&self) -> Self {
        Self {
            filters: OrdMap::new(),
            ..self.clone()
        }
    }

    /// Returns a context with the sort list replaced by `order`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a field is unknown or unsortable, or
    /// appears more than once.
    pub fn with_order(&self, order: impl IntoIterator<Item = SortCriterion>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut validated = Vector::new();
        for criterion in order {
            self.schema.validate_sort(&criterion)?;
            if !seen.insert(criterion.field.clone()) {
                return Err(Error::duplicate_sort_field(criterion.field));
            }
            validated.push_back(criterion);
        }
        Ok(Self {
            order: validated,
            ..self.clone()
        })
    }

    /// Returns the filter on `field`, if any.
    #[must_use]
    pub fn filter(&self, field: &str) -> Option<&FilterCriterion> {
        self.filters.get(field)
    }

    /// Iterates filters in canonical (field-name) order.
    pub fn filters(&self) -> impl Iterator<Item = &FilterCriterion> {
        self.filters.values()
    }

    /// Iterates sort terms in significance order.
    pub fn order(&self) -> impl Iterator<Item = &SortCriterion> {
        self.order.iter()
    }

    /// Returns true if no filter is active.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.filters.is_empty()
    }

    /// Derives the cache key of this context.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be encoded.
    pub fn key(&self) -> Result<CacheKey> {
        CacheKey::encode(self.filters.values(), self.order.iter())
    }

    /// Returns true if switching from `self` to `next` must invalidate a
    /// cache built for `self`.
    #[must_use]
    pub fn invalidated_by(&self, next: &Self) -> bool {
        self != next
    }
}

/// Derives the cache key of `context`.
///
/// # Errors
///
/// Returns an error if the context cannot be encoded.
pub fn key_of(context: &FilterSortContext) -> Result<CacheKey> {
    context.key()
}

impl PartialEq for FilterSortContext {
    fn eq(&self, other: &Self) -> bool {
        self.filters == other.filters && self.order == other.order
    }
}

impl Eq for FilterSortContext {}

impl fmt::Debug for FilterSortContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSortContext")
            .field("filters", &self.filters.values().collect::<Vec<_>>())
            .field("order", &self.order.iter().collect::<Vec<_>>())
            .finish()
    }
}
