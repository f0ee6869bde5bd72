//! AppDash Core - ingestion pipeline for instance/application dashboards
//!
//! Turns uploaded JSON snapshots of compute instances into the flat table,
//! aggregates and exports a dashboard renders. Optionally exposed to Python
//! via PyO3 (feature `python`).
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `pipeline` - Upload processing orchestrator
//! - `validation` - Per-file parsing and schema checks
//! - `extraction` - Lenient JSON scalar conversion
//! - `transform` - Flattening, default-fill and aggregation
//! - `filter` - Row filters for table views
//! - `export` - CSV and JSON records rendering
//! - `session` - Per-session result cache
//! - `logging` - Structured logging with batch context
//!
//! ## Example
//!
//! ```
//! use appdash_core::{process_uploads, BatchContext, UploadedFile};
//!
//! let files = vec![UploadedFile::new(
//!     "host-1.json",
//!     r#"{"instance_id": "i-1", "instance_name": "host-1",
//!         "applications": [{"name": "nginx", "type": "container"}]}"#,
//! )];
//! let result = process_uploads(&BatchContext::new(), &files);
//! assert_eq!(result.flat_table.len(), 1);
//! assert_eq!(result.aggregates.type_distribution["container"], 1);
//! ```

pub mod error;
pub mod export;
pub mod extraction;
pub mod filter;
pub mod logging;
pub mod pipeline;
pub mod session;
pub mod transform;
pub mod validation;

#[cfg(feature = "python")]
mod python;

pub use error::{ErrorKind, ExportError, FileError};
pub use export::{to_csv, to_json_records, FLAT_ROW_COLUMNS};
pub use filter::RowFilter;
pub use pipeline::{process_uploads, BatchContext, PipelineResult, PipelineWarning, UploadedFile};
pub use transform::{Aggregates, FlatRow};
pub use validation::{ApplicationRecord, InstanceRecord};

/// Initialize the module-level logger.
///
/// Safe to call repeatedly; `RUST_LOG` overrides the default level.
pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}
