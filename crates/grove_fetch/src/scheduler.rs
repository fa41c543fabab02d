//! Debounced, generation-stamped window fetching.
//!
//! The scheduler is a pure state machine. Callers feed it the current time
//! and the cache, and it answers with what to fetch and when:
//!
//! 1. [`FetchScheduler::request_window`] finds the first gap of a window and
//!    parks it as the pending request, resetting the quiet period.
//! 2. [`FetchScheduler::poll`] hands out a [`FetchTicket`] once the quiet
//!    period has elapsed. Requests made in between coalesce into one ticket
//!    carrying the latest range and context.
//! 3. [`FetchScheduler::complete`] merges the response if the ticket's
//!    generation is still current, and discards it otherwise.
//!
//! There is no transport cancellation. A superseded fetch is allowed to
//! finish and is then ignored.

use std::time::Instant;

use grove_cache::{CacheStore, MergeReport};
use grove_foundation::{Entity, Generation, Window};
use grove_query::{CacheKey, FilterSortContext};
use tracing::{debug, trace, warn};

use crate::config::SchedulerConfig;
use crate::fetcher::{FetchError, Page, PageQuery};

// =============================================================================
// Tickets and Outcomes
// =============================================================================

/// An issued fetch, to be returned to [`FetchScheduler::complete`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    /// Sequence number, unique per scheduler.
    pub id: u64,
    /// Generation the fetch was issued under.
    pub generation: Generation,
    /// Cache scope the response belongs to.
    pub key: CacheKey,
    /// What to send to the server.
    pub query: PageQuery,
}

/// Result of a window request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Every position of the window is resident (or beyond the total).
    Resident,
    /// The missing range is already being fetched for the current generation.
    InFlight,
    /// A fetch for `range` will be issued at `deadline` unless superseded.
    Scheduled {
        /// The missing range.
        range: Window,
        /// When the quiet period ends.
        deadline: Instant,
    },
}

/// Result of completing a ticket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The page was merged into the cache.
    Merged(MergeReport),
    /// The ticket answered a superseded query; the response was discarded.
    Stale,
    /// The fetch failed; the positions stay missing.
    Failed(FetchError),
}

impl Completion {
    /// Returns true if the page was merged.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }

    /// Returns true if the response was discarded as stale.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

/// Counters for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Window requests received.
    pub requested: u64,
    /// Pending requests replaced by a later one before being issued.
    pub coalesced: u64,
    /// Tickets handed out.
    pub issued: u64,
    /// Responses merged.
    pub merged: u64,
    /// Responses discarded as stale.
    pub stale: u64,
    /// Fetches that failed under the current generation.
    pub failed: u64,
    /// Fetches dropped before their response arrived.
    pub abandoned: u64,
}

// =============================================================================
// Scheduler
// =============================================================================

#[derive(Clone, Debug)]
struct Pending {
    key: CacheKey,
    query: PageQuery,
    deadline: Instant,
}

#[derive(Clone, Copy, Debug)]
struct InFlight {
    id: u64,
    range: Window,
}

/// Debounced, race-safe window fetcher.
#[derive(Clone, Debug)]
pub struct FetchScheduler {
    config: SchedulerConfig,
    generation: Generation,
    pending: Option<Pending>,
    /// Fetches issued under the current generation and not yet completed.
    in_flight: Vec<InFlight>,
    next_ticket: u64,
    stats: SchedulerStats,
}

impl FetchScheduler {
    /// Creates a scheduler with the given configuration.
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            generation: Generation::INITIAL,
            pending: None,
            in_flight: Vec::new(),
            next_ticket: 0,
            stats: SchedulerStats::default(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Returns the current generation.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns the diagnostic counters.
    #[must_use]
    pub const fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Returns when the pending request becomes due, if there is one.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Returns the range of the pending request, if there is one.
    #[must_use]
    pub fn pending_range(&self) -> Option<Window> {
        self.pending.as_ref().map(|p| p.query.window())
    }

    /// Number of fetches in flight for the current generation.
    #[must_use]
    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    /// Asks for `window` of the collection described by `context`.
    ///
    /// Only the latest request matters: a new request replaces the pending
    /// one and restarts the quiet period, and a request that needs nothing
    /// drops whatever was pending.
    pub fn request_window<E: Entity>(
        &mut self,
        now: Instant,
        store: &CacheStore<E>,
        key: &CacheKey,
        context: &FilterSortContext,
        window: Window,
    ) -> RequestOutcome {
        self.stats.requested += 1;

        let Some(range) = store.first_gap(key, window) else {
            self.pending = None;
            trace!(%window, "window resident");
            return RequestOutcome::Resident;
        };

        if self.in_flight.iter().any(|f| f.range.covers(range)) {
            self.pending = None;
            trace!(%range, "range already in flight");
            return RequestOutcome::InFlight;
        }

        let deadline = now + self.config.debounce;
        let replaced = self.pending.replace(Pending {
            key: key.clone(),
            query: PageQuery::for_range(context, range),
            deadline,
        });
        if let Some(previous) = replaced {
            self.stats.coalesced += 1;
            trace!(previous = %previous.query.window(), %range, "request coalesced");
        }

        RequestOutcome::Scheduled { range, deadline }
    }

    /// Issues the pending request if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<FetchTicket> {
        if self.pending.as_ref()?.deadline > now {
            return None;
        }
        let pending = self.pending.take()?;

        let id = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight.push(InFlight {
            id,
            range: pending.query.window(),
        });
        self.stats.issued += 1;

        debug!(
            ticket = id,
            generation = %self.generation,
            key = %pending.key,
            offset = pending.query.offset,
            limit = pending.query.limit,
            "fetch issued"
        );

        Some(FetchTicket {
            id,
            generation: self.generation,
            key: pending.key,
            query: pending.query,
        })
    }

    /// Applies the response to `ticket`.
    ///
    /// A response whose generation is no longer current is discarded
    /// without touching the cache, whether it succeeded or failed.
    pub fn complete<E: Entity>(
        &mut self,
        store: &mut CacheStore<E>,
        ticket: &FetchTicket,
        result: Result<Page<E>, FetchError>,
    ) -> Completion {
        if ticket.generation != self.generation {
            self.stats.stale += 1;
            debug!(
                ticket = ticket.id,
                issued = %ticket.generation,
                current = %self.generation,
                "stale response discarded"
            );
            return Completion::Stale;
        }

        self.in_flight.retain(|f| f.id != ticket.id);

        match result {
            Ok(page) => {
                let report = store.merge(&ticket.key, ticket.query.offset, page.results, page.total);
                self.stats.merged += 1;
                debug!(
                    ticket = ticket.id,
                    written = report.written,
                    total = page.total,
                    "page merged"
                );
                Completion::Merged(report)
            }
            Err(error) => {
                self.stats.failed += 1;
                warn!(ticket = ticket.id, %error, "fetch failed");
                Completion::Failed(error)
            }
        }
    }

    /// Forgets an issued fetch that will never be completed.
    ///
    /// Used when the future awaiting `ticket` is dropped. The range stops
    /// counting as in flight, so requesting it again schedules a new fetch.
    /// The cache is not touched. Returns true if the ticket was in flight
    /// for the current generation.
    pub fn abandon(&mut self, ticket: &FetchTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        let before = self.in_flight.len();
        self.in_flight.retain(|f| f.id != ticket.id);
        let abandoned = self.in_flight.len() < before;
        if abandoned {
            self.stats.abandoned += 1;
            debug!(ticket = ticket.id, range = %ticket.query.window(), "fetch abandoned");
        }
        abandoned
    }

    /// Starts a new generation and drops the cache scope for `old_key`.
    ///
    /// Pending work is forgotten; fetches still in flight will complete as
    /// [`Completion::Stale`].
    pub fn invalidate<E: Entity>(
        &mut self,
        store: &mut CacheStore<E>,
        old_key: &CacheKey,
    ) -> Generation {
        let generation = self.generation.bump();
        self.pending = None;
        self.in_flight.clear();
        store.invalidate(old_key);
        debug!(%generation, old_key = %old_key, "query invalidated");
        generation
    }
}

impl Default for FetchScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}
