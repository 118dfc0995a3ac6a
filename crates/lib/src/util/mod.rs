//! Shared utilities.
//!
//! Test doubles used across the crate's unit tests.

#[cfg(test)]
pub mod testutil;
