//! Integration tests for Layer 2: Cache
//!
//! Tests for the sparse cache store and row selection.

mod selection;
mod store;
