//! Integration tests for Layer 2: Allocation
//!
//! Tests for greedy bucket allocation and plot capacity policy.
