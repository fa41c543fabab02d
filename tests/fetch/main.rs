//! Integration tests for Layer 3: Fetch
//!
//! Tests for the collection session and the async driver against an
//! in-memory server.

mod server;
