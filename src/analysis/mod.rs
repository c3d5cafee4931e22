//! In-memory aggregation.
//!
//! The dashboard pipelines fetch rows, group them here, and hand the
//! groupings to the chart renderer.

pub mod aggregator;

pub use aggregator::*;
