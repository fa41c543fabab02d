//! Position-indexed sparse cache over a paginated server collection.
//!
//! The store keeps exactly one active scope, identified by a [`CacheKey`].
//! A scope is a sparse index (global position to identifier), an entity
//! dictionary (identifier to record), and the total the server last reported.
//! Positions are resident only once a merge has written them.

use std::collections::HashSet;

use grove_foundation::{Entity, Window};
use grove_query::CacheKey;
use im::{HashMap, OrdMap};
use tracing::{debug, trace};

// =============================================================================
// Scope
// =============================================================================

#[derive(Clone, Debug)]
struct Scope<E: Entity> {
    key: CacheKey,
    /// Global position -> identifier. Every position is `< total`.
    index: OrdMap<usize, E::Id>,
    /// Identifier -> record. Every identifier in `index` is present here.
    entities: HashMap<E::Id, E>,
    total: usize,
}

impl<E: Entity> Scope<E> {
    fn new(key: CacheKey) -> Self {
        Self {
            key,
            index: OrdMap::new(),
            entities: HashMap::new(),
            total: 0,
        }
    }

    fn get(&self, position: usize) -> Option<&E> {
        self.index.get(&position).and_then(|id| self.entities.get(id))
    }

    fn collect_garbage(&mut self) {
        let live: HashSet<&E::Id> = self.index.values().collect();
        self.entities.retain(|id, _| live.contains(id));
    }
}

// =============================================================================
// Merge Report
// =============================================================================

/// Summary of one merge, for logging and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Positions written.
    pub written: usize,
    /// Positions whose identifier changed.
    pub replaced: usize,
    /// Incoming records that fell at or beyond the reported total.
    pub dropped: usize,
    /// Previously resident positions removed because the total shrank.
    pub pruned: usize,
    /// True if the merge discarded a scope for a different key.
    pub rescoped: bool,
}

// =============================================================================
// Window Read
// =============================================================================

/// The contents of a window: one slot per position, `None` where missing.
///
/// While the total is unknown nothing can be resident, so `slots` is left
/// empty and every position of `window` counts as missing.
#[derive(Debug)]
pub struct WindowRead<'a, E> {
    /// The window actually read, clamped to the known total.
    pub window: Window,
    /// One slot per position of `window`; empty while `total` is `None`.
    pub slots: Vec<Option<&'a E>>,
    /// The total the server last reported, if this key has been fetched.
    pub total: Option<usize>,
}

impl<'a, E> WindowRead<'a, E> {
    /// Returns true if no slot is missing.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_count() == 0
    }

    /// Number of missing positions.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.window.length - self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Iterates `(position, record)` pairs for resident slots.
    pub fn resident(&self) -> impl Iterator<Item = (usize, &'a E)> + '_ {
        self.window
            .positions()
            .zip(self.slots.iter())
            .filter_map(|(p, slot)| slot.map(|e| (p, e)))
    }
}

// =============================================================================
// Cache Store
// =============================================================================

/// Sparse cache of one remote collection.
///
/// Clone is O(1) due to structural sharing, so a renderer can hold a
/// snapshot while merges continue on the original.
#[derive(Clone, Debug)]
pub struct CacheStore<E: Entity> {
    scope: Option<Scope<E>>,
}

impl<E: Entity> Default for CacheStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> CacheStore<E> {
    /// Creates an empty store with no active scope.
    #[must_use]
    pub fn new() -> Self {
        Self { scope: None }
    }

    fn scope(&self, key: &CacheKey) -> Option<&Scope<E>> {
        self.scope.as_ref().filter(|s| &s.key == key)
    }

    /// Returns the key of the active scope.
    #[must_use]
    pub fn active_key(&self) -> Option<&CacheKey> {
        self.scope.as_ref().map(|s| &s.key)
    }

    /// Returns true if `key` is the active scope.
    #[must_use]
    pub fn is_active(&self, key: &CacheKey) -> bool {
        self.scope(key).is_some()
    }

    /// Returns the total last reported for `key`.
    #[must_use]
    pub fn total(&self, key: &CacheKey) -> Option<usize> {
        self.scope(key).map(|s| s.total)
    }

    /// Returns the number of resident positions for `key`.
    #[must_use]
    pub fn resident_len(&self, key: &CacheKey) -> usize {
        self.scope(key).map_or(0, |s| s.index.len())
    }

    /// Returns the record at `position` for `key`, if resident.
    #[must_use]
    pub fn get(&self, key: &CacheKey, position: usize) -> Option<&E> {
        self.scope(key).and_then(|s| s.get(position))
    }

    /// Returns the record with identifier `id` for `key`, if resident.
    #[must_use]
    pub fn entity(&self, key: &CacheKey, id: &E::Id) -> Option<&E> {
        self.scope(key).and_then(|s| s.entities.get(id))
    }

    /// Reads a window.
    ///
    /// Once the total for `key` is known, the window is clamped to it.
    /// Positions never written for `key` are reported as missing; a key
    /// that is not the active scope reads as entirely missing without
    /// allocating a slot per position.
    #[must_use]
    pub fn get_window(&self, key: &CacheKey, window: Window) -> WindowRead<'_, E> {
        match self.scope(key) {
            Some(scope) => {
                let window = window.clamp(scope.total);
                WindowRead {
                    window,
                    slots: window.positions().map(|p| scope.get(p)).collect(),
                    total: Some(scope.total),
                }
            }
            None => WindowRead {
                window,
                slots: Vec::new(),
                total: None,
            },
        }
    }

    /// Returns the identifiers resident in `window` for `key`.
    #[must_use]
    pub fn ids_in_window(&self, key: &CacheKey, window: Window) -> Vec<E::Id> {
        self.scope(key).map_or_else(Vec::new, |s| {
            window
                .clamp(s.total)
                .positions()
                .filter_map(|p| s.index.get(&p).cloned())
                .collect()
        })
    }

    /// Returns the range that must be fetched to complete `window`.
    ///
    /// Scans left to right and stops at the first missing position; the
    /// returned range runs from there to the end of the requested window,
    /// so one window has at most one outstanding hole. Returns `None` when
    /// the window is fully resident or lies beyond the known total.
    #[must_use]
    pub fn first_gap(&self, key: &CacheKey, window: Window) -> Option<Window> {
        if window.is_empty() {
            return None;
        }
        let Some(scope) = self.scope(key) else {
            return Some(window);
        };
        let first_missing = window
            .clamp(scope.total)
            .positions()
            .find(|p| !scope.index.contains_key(p))?;
        Some(Window::new(first_missing, window.end() - first_missing))
    }

    /// Writes `entities[i]` at position `offset + i` and records `total`.
    ///
    /// Merging under a key other than the active one discards the active
    /// scope first. Records that would land at or beyond `total` are dropped,
    /// and resident positions at or beyond a shrunk `total` are pruned.
    /// Merging the same page twice leaves the store unchanged.
    pub fn merge(
        &mut self,
        key: &CacheKey,
        offset: usize,
        entities: impl IntoIterator<Item = E>,
        total: usize,
    ) -> MergeReport {
        let mut report = MergeReport::default();

        if self.scope.as_ref().is_some_and(|s| &s.key != key) {
            report.rescoped = true;
            self.scope = None;
            debug!(key = %key, "cache scope replaced by merge");
        }
        let scope = self.scope.get_or_insert_with(|| Scope::new(key.clone()));

        let mut displaced = false;

        if total < scope.total {
            let stale: Vec<usize> = scope.index.range(total..).map(|(p, _)| *p).collect();
            for position in stale {
                scope.index.remove(&position);
                report.pruned += 1;
                displaced = true;
            }
        }
        scope.total = total;

        for (i, entity) in entities.into_iter().enumerate() {
            let position = offset + i;
            if position >= total {
                report.dropped += 1;
                continue;
            }
            let id = entity.id();
            if let Some(previous) = scope.index.insert(position, id.clone()) {
                if previous != id {
                    report.replaced += 1;
                    displaced = true;
                }
            }
            scope.entities.insert(id, entity);
            report.written += 1;
        }

        if displaced {
            scope.collect_garbage();
        }

        trace!(
            key = %key,
            offset,
            total,
            written = report.written,
            replaced = report.replaced,
            dropped = report.dropped,
            pruned = report.pruned,
            "merged page"
        );
        report
    }

    /// Drops everything held for `key`.
    ///
    /// Returns true if `key` was the active scope.
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        if self.is_active(key) {
            self.scope = None;
            debug!(key = %key, "cache invalidated");
            true
        } else {
            false
        }
    }

    /// Drops the active scope, whatever its key.
    pub fn clear(&mut self) {
        self.scope = None;
    }

    /// Returns an O(1) copy sharing structure with this store.
    ///
    /// Later merges into `self` are not visible through the snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        self.clone()
    }
}
