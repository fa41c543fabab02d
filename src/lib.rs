//! Grove - Windowed caching of remote collections, and greedy allocation
//!
//! This crate re-exports all layers of the Grove system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: grove_fetch       - Debounced fetch scheduling, sessions, async driver
//! Layer 2: grove_cache       - Sparse position-indexed cache, row selection
//!          grove_alloc       - Greedy bucket allocation, plot capacity policy
//! Layer 1: grove_query       - Filter/sort context, schemas, cache keys
//! Layer 0: grove_foundation  - Core types (Window, Generation, Entity, Error)
//! ```

pub use grove_alloc as alloc;
pub use grove_cache as cache;
pub use grove_fetch as fetch;
pub use grove_foundation as foundation;
pub use grove_query as query;
