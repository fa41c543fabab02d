//! The surface a table or picker talks to.
//!
//! A [`CollectionSession`] owns the query context, its cache, the fetch
//! scheduler and the row selection for one remote collection. Every
//! query-defining change goes through [`CollectionSession::set_context`],
//! which invalidates the old query and rewinds to the first page. The
//! selection is keyed by identifier and survives those changes.

use std::time::Instant;

use grove_cache::{CacheStore, Coverage, SelectionTracker, WindowRead};
use grove_foundation::{Entity, Generation, Result, Window};
use grove_query::{CacheKey, FilterCriterion, FilterSortContext, SortCriterion};
use tracing::debug;

use crate::config::SchedulerConfig;
use crate::fetcher::{FetchError, Page};
use crate::scheduler::{Completion, FetchScheduler, FetchTicket, RequestOutcome, SchedulerStats};

/// Result of a context change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextChange {
    /// The new context produces the same cache key; nothing was invalidated.
    Unchanged,
    /// The old query was invalidated and the first page requested.
    Reset(RequestOutcome),
}

/// One remote collection as seen by a single view.
#[derive(Clone, Debug)]
pub struct CollectionSession<E: Entity> {
    context: FilterSortContext,
    key: CacheKey,
    /// The window last requested for display.
    window: Window,
    store: CacheStore<E>,
    scheduler: FetchScheduler,
    selection: SelectionTracker<E::Id>,
}

impl<E: Entity> CollectionSession<E> {
    /// Creates a session positioned on the first page of `context`.
    ///
    /// Nothing is requested until [`request_window`](Self::request_window)
    /// or [`retry`](Self::retry) is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be encoded as a cache key.
    pub fn new(context: FilterSortContext, config: SchedulerConfig) -> Result<Self> {
        let key = context.key()?;
        let window = Window::page(0, config.page_size);
        Ok(Self {
            context,
            key,
            window,
            store: CacheStore::new(),
            scheduler: FetchScheduler::new(config),
            selection: SelectionTracker::new(),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the active query context.
    #[must_use]
    pub fn context(&self) -> &FilterSortContext {
        &self.context
    }

    /// Returns the cache key of the active context.
    #[must_use]
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Returns the window last requested for display.
    #[must_use]
    pub const fn current_window(&self) -> Window {
        self.window
    }

    /// Returns the cache.
    #[must_use]
    pub fn store(&self) -> &CacheStore<E> {
        &self.store
    }

    /// Returns an O(1) copy of the cache for rendering.
    #[must_use]
    pub fn snapshot(&self) -> CacheStore<E> {
        self.store.snapshot()
    }

    /// Returns the total the server last reported for the active query.
    #[must_use]
    pub fn total(&self) -> Option<usize> {
        self.store.total(&self.key)
    }

    /// Returns the current generation.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.scheduler.generation()
    }

    /// Returns the scheduler's diagnostic counters.
    #[must_use]
    pub const fn stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    /// Returns the scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &FetchScheduler {
        &self.scheduler
    }

    // =========================================================================
    // Windows
    // =========================================================================

    /// Requests `window` for display.
    pub fn request_window(&mut self, now: Instant, window: Window) -> RequestOutcome {
        self.window = window;
        self.scheduler
            .request_window(now, &self.store, &self.key, &self.context, window)
    }

    /// Reads the current window.
    #[must_use]
    pub fn window(&self) -> WindowRead<'_, E> {
        self.store.get_window(&self.key, self.window)
    }

    /// Reads an arbitrary window of the active query.
    #[must_use]
    pub fn read(&self, window: Window) -> WindowRead<'_, E> {
        self.store.get_window(&self.key, window)
    }

    /// Re-requests the current window, typically after a failed fetch.
    pub fn retry(&mut self, now: Instant) -> RequestOutcome {
        self.request_window(now, self.window)
    }

    /// Drops everything cached for the active query and reloads the first page.
    ///
    /// Responses to fetches issued before the refresh are discarded.
    pub fn refresh(&mut self, now: Instant) -> RequestOutcome {
        self.scheduler.invalidate(&mut self.store, &self.key);
        self.request_window(now, Window::page(0, self.scheduler.config().page_size))
    }

    /// Requests every row matching the active query.
    ///
    /// Returns `None` while the total is unknown, that is before the first
    /// page of the active query has merged. Callers that learned the total
    /// some other way can use [`export_with_total`](Self::export_with_total).
    /// The displayed window is left alone, so a later display request
    /// replaces a pending export.
    pub fn export(&mut self, now: Instant) -> Option<RequestOutcome> {
        let total = self.total()?;
        Some(self.export_with_total(now, total))
    }

    /// Requests the first `total` rows of the active query.
    pub fn export_with_total(&mut self, now: Instant, total: usize) -> RequestOutcome {
        debug!(total, key = %self.key, "export requested");
        self.scheduler.request_window(
            now,
            &self.store,
            &self.key,
            &self.context,
            Window::everything(total),
        )
    }

    // =========================================================================
    // Context Changes
    // =========================================================================

    /// Replaces the query context.
    ///
    /// If the new context yields a different cache key, the old query is
    /// invalidated and the first page of the new one is requested.
    ///
    /// # Errors
    ///
    /// Returns an error if the new context cannot be encoded as a cache key.
    pub fn set_context(&mut self, now: Instant, next: FilterSortContext) -> Result<ContextChange> {
        let next_key = next.key()?;
        if next_key == self.key {
            self.context = next;
            return Ok(ContextChange::Unchanged);
        }

        let old_key = std::mem::replace(&mut self.key, next_key);
        self.context = next;
        self.scheduler.invalidate(&mut self.store, &old_key);

        let first_page = Window::page(0, self.scheduler.config().page_size);
        Ok(ContextChange::Reset(self.request_window(now, first_page)))
    }

    /// Adds or replaces the filter on `criterion.field`.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema rejects the criterion.
    pub fn with_filter(
        &mut self,
        now: Instant,
        criterion: FilterCriterion,
    ) -> Result<ContextChange> {
        let next = self.context.with_filter(criterion)?;
        self.set_context(now, next)
    }

    /// Removes the filter on `field`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the new context cannot be encoded as a cache key.
    pub fn without_filter(&mut self, now: Instant, field: &str) -> Result<ContextChange> {
        let next = self.context.without_filter(field);
        self.set_context(now, next)
    }

    /// Replaces the sort order.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema rejects a term or a field repeats.
    pub fn with_order(
        &mut self,
        now: Instant,
        order: impl IntoIterator<Item = SortCriterion>,
    ) -> Result<ContextChange> {
        let next = self.context.with_order(order)?;
        self.set_context(now, next)
    }

    // =========================================================================
    // Fetch Loop
    // =========================================================================

    /// Returns when the pending fetch becomes due.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Issues the pending fetch if it is due.
    pub fn poll(&mut self, now: Instant) -> Option<FetchTicket> {
        self.scheduler.poll(now)
    }

    /// Applies the response to `ticket`.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: std::result::Result<Page<E>, FetchError>,
    ) -> Completion {
        self.scheduler.complete(&mut self.store, ticket, result)
    }

    /// Forgets a fetch whose response will never arrive.
    ///
    /// Returns true if `ticket` was in flight for the current query.
    pub fn abandon(&mut self, ticket: &FetchTicket) -> bool {
        self.scheduler.abandon(ticket)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Returns the selection.
    #[must_use]
    pub fn selection(&self) -> &SelectionTracker<E::Id> {
        &self.selection
    }

    /// Returns the selection for modification.
    pub fn selection_mut(&mut self) -> &mut SelectionTracker<E::Id> {
        &mut self.selection
    }

    /// Flips the selection of `id`. Returns the new state.
    pub fn toggle(&mut self, id: E::Id) -> bool {
        self.selection.toggle(id)
    }

    /// Returns how much of the resident part of the current window is selected.
    #[must_use]
    pub fn page_coverage(&self) -> Coverage {
        let ids = self.store.ids_in_window(&self.key, self.window);
        self.selection.coverage(&ids)
    }

    /// Header-checkbox toggle for the current window.
    ///
    /// Deselects the resident rows of the window if all of them are
    /// selected, and selects them otherwise. Returns the resulting coverage.
    pub fn select_page(&mut self) -> Coverage {
        let ids = self.store.ids_in_window(&self.key, self.window);
        if self.selection.coverage(&ids) == Coverage::All {
            self.selection.deselect_all(&ids);
        } else {
            self.selection.select_all(ids.iter().cloned());
        }
        self.selection.coverage(&ids)
    }

    /// Forgets the whole selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}
