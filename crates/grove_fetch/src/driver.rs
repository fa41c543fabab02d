//! Async driver for a single-threaded event loop.
//!
//! A [`FetchDriver`] pairs a shared [`CollectionSession`] with a
//! [`PageFetcher`]. UI callbacks request windows through the driver (or the
//! shared session handle) while one task keeps calling
//! [`FetchDriver::pump`], which sleeps out the quiet period, issues the
//! fetch and completes it. The session is never borrowed across an await.
//!
//! Dropping a `pump` future mid-fetch (a timeout, an unmounted view)
//! abandons its ticket, so the window can be requested again.

use std::cell::RefCell;
use std::rc::Rc;

use grove_foundation::{Entity, Result, Window};
use grove_query::FilterSortContext;
use tokio::time::{Instant, sleep_until};
use tracing::trace;

use crate::fetcher::PageFetcher;
use crate::scheduler::{Completion, FetchTicket, RequestOutcome};
use crate::session::{CollectionSession, ContextChange};

/// Drives fetches for one session on the current thread.
pub struct FetchDriver<E: Entity, F> {
    session: Rc<RefCell<CollectionSession<E>>>,
    fetcher: F,
}

impl<E: Entity, F: PageFetcher<E>> FetchDriver<E, F> {
    /// Creates a driver owning `session`.
    pub fn new(session: CollectionSession<E>, fetcher: F) -> Self {
        Self::shared(Rc::new(RefCell::new(session)), fetcher)
    }

    /// Creates a driver over a session shared with other callbacks.
    pub fn shared(session: Rc<RefCell<CollectionSession<E>>>, fetcher: F) -> Self {
        Self { session, fetcher }
    }

    /// Returns a handle to the session.
    #[must_use]
    pub fn session(&self) -> Rc<RefCell<CollectionSession<E>>> {
        Rc::clone(&self.session)
    }

    /// Returns the fetcher.
    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Requests `window` at the current time.
    pub fn request_window(&self, window: Window) -> RequestOutcome {
        let now = Instant::now().into_std();
        self.session.borrow_mut().request_window(now, window)
    }

    /// Replaces the query context at the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the new context cannot be encoded as a cache key.
    pub fn set_context(&self, context: FilterSortContext) -> Result<ContextChange> {
        let now = Instant::now().into_std();
        self.session.borrow_mut().set_context(now, context)
    }

    /// Waits for the pending fetch, performs it and completes it.
    ///
    /// Returns `None` when nothing is pending. If the request is pushed back
    /// or dropped while sleeping, waits for the new deadline instead.
    pub async fn pump(&self) -> Option<Completion> {
        loop {
            let deadline = self.session.borrow().next_deadline()?;
            sleep_until(Instant::from_std(deadline)).await;

            let now = Instant::now().into_std();
            let Some(ticket) = self.session.borrow_mut().poll(now) else {
                trace!("pending fetch moved while sleeping");
                continue;
            };

            let guard = InFlightGuard {
                session: &self.session,
                ticket: &ticket,
                armed: true,
            };
            let result = self.fetcher.fetch_page(&ticket.query).await;
            guard.disarm();
            return Some(self.session.borrow_mut().complete(&ticket, result));
        }
    }

    /// Pumps until nothing is pending. Returns every completion in order.
    pub async fn run_until_idle(&self) -> Vec<Completion> {
        let mut completions = Vec::new();
        while let Some(completion) = self.pump().await {
            completions.push(completion);
        }
        completions
    }
}

/// Abandons its ticket on drop unless disarmed first.
struct InFlightGuard<'a, E: Entity> {
    session: &'a RefCell<CollectionSession<E>>,
    ticket: &'a FetchTicket,
    armed: bool,
}

impl<E: Entity> InFlightGuard<'_, E> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<E: Entity> Drop for InFlightGuard<'_, E> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(mut session) = self.session.try_borrow_mut() {
            session.abandon(self.ticket);
        }
    }
}
