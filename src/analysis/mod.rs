//! Analysis modules.
//!
//! Aggregation of candidate responses into per-skill groupings.

pub mod aggregator;

pub use aggregator::*;
