//! Core types and errors for Grove.
//!
//! This crate provides:
//! - [`Entity`] - Records with a stable identifier, as served by a remote collection
//! - [`Window`] - Contiguous ranges of global positions
//! - [`Generation`] - Monotonic epoch stamps for superseded-query detection
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod generation;
pub mod window;

pub use entity::Entity;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use generation::Generation;
pub use window::Window;
