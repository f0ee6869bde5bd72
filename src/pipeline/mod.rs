//! Pipeline orchestration module.
//!
//! Main upload pipeline that coordinates:
//! - Per-file validation
//! - Flattening
//! - Aggregation

pub mod context;
pub mod ingestion;

pub use context::*;
pub use ingestion::*;
