//! Entities held by a remote collection.

use std::fmt;
use std::hash::Hash;

/// A record served by a paginated remote collection.
///
/// The only thing Grove needs to know about a record is its identifier:
/// identifiers key the entity dictionary of a cache and the selection set
/// of a table. Everything else (columns, rendering) stays with the caller.
pub trait Entity: Clone {
    /// Stable identifier type.
    type Id: Clone + Eq + Ord + Hash + fmt::Debug;

    /// Returns the stable identifier of this record.
    fn id(&self) -> Self::Id;
}
