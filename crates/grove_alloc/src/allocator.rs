//! Greedy, order-preserving allocation.
//!
//! Buckets are consumed strictly in the order given: each takes as much as
//! it can before the next is considered. The order is treated as a priority
//! chosen by the caller and is never rearranged here.

use std::fmt;

use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A capacity-bounded group that receives part of an allocation.
pub trait Bucket {
    /// Identity reported back in the allocation.
    type Id: Clone + Eq + fmt::Debug;

    /// Returns this bucket's identity.
    fn identity(&self) -> Self::Id;
}

// =============================================================================
// Allocation Result
// =============================================================================

/// Quantity assigned to one bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Allocation<Id> {
    /// The bucket's identity.
    pub bucket: Id,
    /// Quantity placed in the bucket.
    pub allocated: u64,
}

/// Outcome of one allocation pass.
///
/// A non-zero `remainder` means total capacity was insufficient. That is not
/// an error; the caller decides whether to block or accept a partial plan.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AllocationResult<Id> {
    /// One entry per input bucket, in input order.
    pub allocations: Vec<Allocation<Id>>,
    /// Quantity that could not be placed.
    pub remainder: u64,
    /// The requested quantity.
    pub target: u64,
    /// Whether the capacities were computed under a diversifying policy.
    pub diversified: bool,
}

impl<Id: Clone + Eq> AllocationResult<Id> {
    /// Sum of all per-bucket allocations.
    #[must_use]
    pub fn allocated_total(&self) -> u64 {
        self.allocations.iter().map(|a| a.allocated).sum()
    }

    /// Returns true if the whole target was placed.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.remainder == 0
    }

    /// Returns the quantity allocated to `bucket`.
    ///
    /// If the same identity was listed more than once, the quantities are
    /// summed.
    #[must_use]
    pub fn allocation_for(&self, bucket: &Id) -> u64 {
        self.allocations
            .iter()
            .filter(|a| &a.bucket == bucket)
            .map(|a| a.allocated)
            .sum()
    }

    /// Iterates the buckets that received a non-zero quantity.
    pub fn nonzero(&self) -> impl Iterator<Item = &Allocation<Id>> {
        self.allocations.iter().filter(|a| a.allocated > 0)
    }
}

// =============================================================================
// Allocate
// =============================================================================

/// Distributes `target` across `buckets` greedily, in order.
///
/// Each bucket takes `min(capacity_of(bucket), remaining)`. Capacities of
/// zero or below are treated as zero. Once nothing remains, later buckets
/// receive zero. `diversify` does not change the pass itself; it is recorded
/// on the result to state which capacity policy produced the numbers.
///
/// For every input, `allocated_total() + remainder == target`.
pub fn allocate<B, F>(
    target: u64,
    buckets: &[B],
    capacity_of: F,
    diversify: bool,
) -> AllocationResult<B::Id>
where
    B: Bucket,
    F: Fn(&B) -> i64,
{
    let mut remaining = target;
    let allocations = buckets
        .iter()
        .map(|bucket| {
            let allocated = if remaining == 0 {
                0
            } else {
                let capacity = u64::try_from(capacity_of(bucket)).unwrap_or(0);
                capacity.min(remaining)
            };
            remaining -= allocated;
            Allocation {
                bucket: bucket.identity(),
                allocated,
            }
        })
        .collect();

    trace!(
        requested = target,
        remainder = remaining,
        buckets = buckets.len(),
        diversify,
        "allocated"
    );

    AllocationResult {
        allocations,
        remainder: remaining,
        target,
        diversified: diversify,
    }
}
