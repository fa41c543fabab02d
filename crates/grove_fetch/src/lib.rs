//! Window fetching for Grove.
//!
//! This crate provides:
//! - [`FetchScheduler`] - Debounced, race-safe driver that fills cache gaps
//! - [`CollectionSession`] - The surface a table or picker talks to
//! - [`PageFetcher`] - The data-fetch collaborator seam
//! - [`FetchDriver`] - Async driver for a single-threaded event loop
//!
//! # Model
//!
//! ```text
//! request_window ──► first gap ──► pending (debounced) ──► poll ──► FetchTicket
//!                                                                      │
//!        CacheStore ◄── merge ◄── complete (generation matches) ◄──────┘
//! ```
//!
//! Every query-defining change bumps a [`Generation`](grove_foundation::Generation).
//! A response stamped with an older generation answers a superseded query
//! and is discarded, so the last query wins rather than the last response.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod driver;
pub mod fetcher;
pub mod scheduler;
pub mod session;

pub use config::SchedulerConfig;
pub use driver::FetchDriver;
pub use fetcher::{FetchError, Page, PageFetcher, PageQuery};
pub use scheduler::{Completion, FetchScheduler, FetchTicket, RequestOutcome, SchedulerStats};
pub use session::{CollectionSession, ContextChange};
