//! Sparse remote-collection caches and selection tracking for Grove.
//!
//! This crate provides:
//! - [`CacheStore`] - Position-indexed, gap-tolerant cache scoped by [`CacheKey`](grove_query::CacheKey)
//! - [`WindowRead`] - The resident/missing view of one window
//! - [`SelectionTracker`] - Row selection that survives cache refills

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod selection;
pub mod store;

pub use selection::{Coverage, SelectionTracker};
pub use store::{CacheStore, MergeReport, WindowRead};
