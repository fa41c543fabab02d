//! Filter/sort contexts and cache keys for Grove.
//!
//! This crate provides:
//! - [`QuerySchema`] - The fields a collection can be filtered and sorted on
//! - [`FilterCriterion`] / [`SortCriterion`] - Individual query terms
//! - [`FilterSortContext`] - Immutable description of the active query
//! - [`CacheKey`] - Deterministic key derived from a context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod context;
pub mod criterion;
pub mod key;
pub mod schema;

pub use context::{FilterSortContext, key_of};
pub use criterion::{FilterCriterion, FilterOperator, FilterValue, SortCriterion, SortDirection};
pub use key::CacheKey;
pub use schema::{FieldKind, FieldSpec, QuerySchema};
