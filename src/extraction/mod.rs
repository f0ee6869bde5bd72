//! Field extraction helpers.
//!
//! Scalar and list conversion used when mapping parsed JSON onto typed records.

pub mod json_value;

pub use json_value::*;
