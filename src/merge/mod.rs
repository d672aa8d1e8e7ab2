//! Merge module - Deep merge of record layers.
//!
//! Later layers override earlier ones, recursing wherever both sides are
//! records.

mod deep;

#[cfg(test)]
mod merge_test;

pub use deep::*;
