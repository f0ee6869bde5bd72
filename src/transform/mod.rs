//! Transformation module.
//!
//! Flattens validated snapshots into table rows and derives the aggregates
//! the dashboard charts.

pub mod aggregate;
pub mod flatten;

pub use aggregate::*;
pub use flatten::*;
