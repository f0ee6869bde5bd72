//! Structured logging with batch context.
//!
//! Every pipeline log line carries the batch_id, and the file name when it
//! concerns one uploaded file.

pub mod structured;

pub use structured::*;
