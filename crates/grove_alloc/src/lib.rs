//! Greedy bucket allocation for Grove.
//!
//! This crate provides:
//! - [`allocate`] - Distribute a target quantity across ordered, capacity-bounded buckets
//! - [`AllocationResult`] - Per-bucket allocation plus unplaced remainder
//! - [`CapacityPolicy`] / [`capacity_of`] - How many trees a plot can take under a policy
//!
//! The allocator is policy-free: it only consumes the integer a capacity
//! selector returns. Which inventory counts, and whether the number is
//! trimmed to diversify plantings, is decided in [`capacity`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod allocator;
pub mod capacity;

pub use allocator::{Allocation, AllocationResult, Bucket, allocate};
pub use capacity::{CapacityPolicy, HabitatScope, PlotInventory, allocate_plots, capacity_of};
