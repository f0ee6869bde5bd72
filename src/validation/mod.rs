//! Snapshot validation module.
//!
//! Turns uploaded bytes into typed instance records:
//! - JSON parsing with per-file error attribution
//! - Required-field and shape checks
//! - Lenient mapping of optional application fields

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
