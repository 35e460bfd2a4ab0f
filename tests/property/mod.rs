//! Property-based tests for state comparison and reducer composition

mod shallow_equality;
