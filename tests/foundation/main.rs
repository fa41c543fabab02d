//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Window, Generation, Entity, and Error.

mod errors;
