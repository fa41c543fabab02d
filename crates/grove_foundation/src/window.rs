//! Windows over a virtual ordered collection.
//!
//! A window is the contiguous range of global positions a table or picker
//! wants to display. Windows are plain values; they carry no knowledge of
//! what is resident.

use std::fmt;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A contiguous range of global positions: `[offset, offset + length)`.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Window {
    /// First position in the window.
    pub offset: usize,
    /// Number of positions in the window.
    pub length: usize,
}

impl Window {
    /// Creates a window starting at `offset` spanning `length` positions.
    #[must_use]
    pub const fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Creates the window for a zero-based page of `page_size` rows.
    #[must_use]
    pub const fn page(index: usize, page_size: usize) -> Self {
        Self {
            offset: index.saturating_mul(page_size),
            length: page_size,
        }
    }

    /// Creates the window covering an entire collection of `total` rows.
    ///
    /// This is the degenerate request used by export paths.
    #[must_use]
    pub const fn everything(total: usize) -> Self {
        Self {
            offset: 0,
            length: total,
        }
    }

    /// One past the last position in the window.
    #[must_use]
    pub const fn end(self) -> usize {
        self.offset.saturating_add(self.length)
    }

    /// Returns true if the window covers no positions.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.length == 0
    }

    /// Returns true if `position` lies inside the window.
    #[must_use]
    pub const fn contains(self, position: usize) -> bool {
        position >= self.offset && position < self.end()
    }

    /// Returns true if every position of `other` lies inside this window.
    #[must_use]
    pub const fn covers(self, other: Window) -> bool {
        other.is_empty() || (other.offset >= self.offset && other.end() <= self.end())
    }

    /// Returns the positions of the window as a range.
    #[must_use]
    pub const fn positions(self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Returns this window truncated so that it ends at or before `total`.
    #[must_use]
    pub fn clamp(self, total: usize) -> Self {
        let offset = self.offset.min(total);
        Self {
            offset,
            length: self.end().min(total) - offset,
        }
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Window[{}..{})", self.offset, self.end())
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, +{})", self.offset, self.length)
    }
}
