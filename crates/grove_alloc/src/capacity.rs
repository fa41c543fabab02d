//! Plot capacity policy.
//!
//! A plot reports four inventory counts: everything available, or only the
//! giftable part, each either across all habitats or for trees only. Two
//! switches pick one of the four. A third switch, diversify, trims the
//! picked number so that a single plot contributes at most one tree per
//! plant type, which spreads a large request across plots and species.

use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::allocator::{AllocationResult, Bucket, allocate};

/// Which habitats count toward capacity.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HabitatScope {
    /// Trees, shrubs, herbs and everything else.
    AllHabitats,
    /// Trees only.
    #[default]
    TreesOnly,
}

/// Switches that decide how a plot's capacity is computed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CapacityPolicy {
    /// Count inventory that cannot be gifted.
    pub include_non_giftable: bool,
    /// Habitat scope.
    pub habitat: HabitatScope,
    /// Cap each plot at its number of distinct plant types.
    pub diversify: bool,
}

impl CapacityPolicy {
    /// Giftable trees only, no diversification.
    #[must_use]
    pub const fn giftable_trees() -> Self {
        Self {
            include_non_giftable: false,
            habitat: HabitatScope::TreesOnly,
            diversify: false,
        }
    }

    /// Sets whether non-giftable inventory counts.
    #[must_use]
    pub const fn with_non_giftable(mut self, include: bool) -> Self {
        self.include_non_giftable = include;
        self
    }

    /// Sets the habitat scope.
    #[must_use]
    pub const fn with_habitat(mut self, habitat: HabitatScope) -> Self {
        self.habitat = habitat;
        self
    }

    /// Sets diversification.
    #[must_use]
    pub const fn with_diversify(mut self, diversify: bool) -> Self {
        self.diversify = diversify;
        self
    }
}

/// Inventory counts of one plot, as reported by the server.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlotInventory {
    /// Plot identifier.
    pub plot_id: u64,
    /// Display name.
    pub name: String,
    /// Available, all habitats, giftable or not.
    pub available: i64,
    /// Available trees, giftable or not.
    pub available_trees: i64,
    /// Giftable, all habitats.
    pub giftable: i64,
    /// Giftable trees.
    pub giftable_trees: i64,
    /// Number of distinct plant types with available inventory.
    pub distinct_plant_types: i64,
}

impl Bucket for PlotInventory {
    type Id = u64;

    fn identity(&self) -> u64 {
        self.plot_id
    }
}

/// Returns how many trees `plot` can take under `policy`.
///
/// The result may be zero or negative when the server reports overbooked
/// inventory; the allocator treats that as zero.
#[must_use]
pub fn capacity_of(plot: &PlotInventory, policy: &CapacityPolicy) -> i64 {
    let base = match (policy.include_non_giftable, policy.habitat) {
        (true, HabitatScope::AllHabitats) => plot.available,
        (true, HabitatScope::TreesOnly) => plot.available_trees,
        (false, HabitatScope::AllHabitats) => plot.giftable,
        (false, HabitatScope::TreesOnly) => plot.giftable_trees,
    };
    if policy.diversify {
        base.min(plot.distinct_plant_types)
    } else {
        base
    }
}

/// Distributes `target` trees across `plots`, in order, under `policy`.
#[must_use]
pub fn allocate_plots(
    target: u64,
    plots: &[PlotInventory],
    policy: &CapacityPolicy,
) -> AllocationResult<u64> {
    let result = allocate(target, plots, |p| capacity_of(p, policy), policy.diversify);
    debug!(
        requested = target,
        plots = plots.len(),
        remainder = result.remainder,
        ?policy,
        "plot allocation computed"
    );
    result
}
