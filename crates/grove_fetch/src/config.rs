//! Scheduler configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Quiet period used by interactive tables and pickers.
pub const INTERACTIVE_DEBOUNCE: Duration = Duration::from_millis(300);

/// Quiet period used by heavier listing screens.
pub const LISTING_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Configuration for a [`FetchScheduler`](crate::FetchScheduler).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Quiet period after the last request before a fetch is issued.
    pub debounce: Duration,

    /// Rows per page; the first page is requested after a context change.
    pub page_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::interactive()
    }
}

impl SchedulerConfig {
    /// Configuration for interactive tables (300 ms quiet period).
    #[must_use]
    pub const fn interactive() -> Self {
        Self {
            debounce: INTERACTIVE_DEBOUNCE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Configuration for heavier listing screens (1000 ms quiet period).
    #[must_use]
    pub const fn listing() -> Self {
        Self {
            debounce: LISTING_DEBOUNCE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Configuration that issues fetches on the next poll.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            debounce: Duration::ZERO,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Builder method to set the quiet period.
    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Builder method to set the page size. Zero is raised to one.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = if page_size == 0 { 1 } else { page_size };
        self
    }
}
