//! The data-fetch collaborator seam.
//!
//! Grove never talks to the network itself. A [`PageFetcher`] turns a
//! [`PageQuery`] into a [`Page`], or fails with a [`FetchError`].

use std::future::Future;

use grove_foundation::Window;
use grove_query::{FilterCriterion, FilterSortContext, SortCriterion};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One page request, as sent to the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    /// First position requested.
    pub offset: usize,
    /// Number of positions requested.
    pub limit: usize,
    /// Active filters, in canonical order.
    pub filters: Vec<FilterCriterion>,
    /// Sort terms, in significance order.
    pub order: Vec<SortCriterion>,
}

impl PageQuery {
    /// Builds the query for `range` under `context`.
    #[must_use]
    pub fn for_range(context: &FilterSortContext, range: Window) -> Self {
        Self {
            offset: range.offset,
            limit: range.length,
            filters: context.filters().cloned().collect(),
            order: context.order().cloned().collect(),
        }
    }

    /// The positions this query covers.
    #[must_use]
    pub const fn window(&self) -> Window {
        Window::new(self.offset, self.limit)
    }
}

/// One page of results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<E> {
    /// Size of the whole filtered collection.
    pub total: usize,
    /// Records starting at the query's offset.
    pub results: Vec<E>,
}

/// Transport-level failure of a page fetch.
///
/// A failure leaves the requested positions missing; re-requesting the same
/// window schedules a new fetch.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with an error status.
    #[error("server rejected request ({status}): {message}")]
    Rejected {
        /// Status code.
        status: u16,
        /// Server message.
        message: String,
    },

    /// The response could not be decoded.
    #[error("could not decode page: {0}")]
    Decode(String),
}

/// Fetches pages of a remote collection.
pub trait PageFetcher<E> {
    /// Fetches the page described by `query`.
    fn fetch_page(&self, query: &PageQuery) -> impl Future<Output = Result<Page<E>, FetchError>>;
}
