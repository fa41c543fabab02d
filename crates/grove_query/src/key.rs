//! Cache keys.
//!
//! A cache key is the MessagePack encoding of a context's canonical form:
//! filters in field-name order, sort terms in the order given. Two contexts
//! share a key exactly when their encodings are byte-identical.

use std::fmt;
use std::sync::Arc;

use grove_foundation::{Error, Result};
use serde::Serialize;

use crate::criterion::{FilterCriterion, SortCriterion};

/// Deterministic key identifying the scope of a cache.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    bytes: Arc<[u8]>,
}

#[derive(Serialize)]
struct CanonicalQuery<'a> {
    filters: Vec<&'a FilterCriterion>,
    order: Vec<&'a SortCriterion>,
}

impl CacheKey {
    /// Encodes a canonical query into a key.
    ///
    /// `filters` must already be in canonical (field-name) order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be encoded.
    pub fn encode<'a>(
        filters: impl IntoIterator<Item = &'a FilterCriterion>,
        order: impl IntoIterator<Item = &'a SortCriterion>,
    ) -> Result<Self> {
        let query = CanonicalQuery {
            filters: filters.into_iter().collect(),
            order: order.into_iter().collect(),
        };
        let bytes = rmp_serde::to_vec(&query).map_err(|e| Error::key_encoding(e.to_string()))?;
        Ok(Self {
            bytes: bytes.into(),
        })
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns a stable 64-bit FNV-1a fingerprint, for logs.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0100_0000_01b3;
        self.bytes
            .iter()
            .fold(OFFSET, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({:016x})", self.fingerprint())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.fingerprint())
    }
}
