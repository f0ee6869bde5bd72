//! Per-file loader: raw upload bytes to a typed `InstanceRecord`.
//!
//! Each file is judged on its own. A rejection is returned as a value so the
//! caller can keep processing the rest of the batch.

use serde_json::Value;

use crate::error::FileError;
use crate::logging::structured::LogContext;
use crate::validation::schema::{check_instance, InstanceRecord};

/// Largest accepted upload.
pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024; // 50MB

/// Result of loading one uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Valid {
        record: InstanceRecord,
        /// Non-fatal notes (skipped port/pid entries).
        notes: Vec<String>,
    },
    Invalid(FileError),
}

impl FileOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, FileOutcome::Valid { .. })
    }
}

/// Parse and validate one uploaded snapshot.
pub fn load_instance_file(file_name: &str, content: &[u8], ctx: &LogContext) -> FileOutcome {
    match parse_json(file_name, content) {
        Ok(value) => match check_instance(&value) {
            Ok(check) => {
                for note in &check.skipped_entries {
                    log::warn!("{} ENTRY_SKIPPED {}", ctx, note);
                }
                log::debug!(
                    "{} FILE_ACCEPTED instance_id={} applications={}",
                    ctx,
                    check.record.instance_id,
                    check.record.applications.len()
                );
                FileOutcome::Valid {
                    record: check.record,
                    notes: check.skipped_entries,
                }
            }
            Err(reason) => {
                log::warn!("{} FILE_SCHEMA_INVALID reason={:?}", ctx, reason);
                FileOutcome::Invalid(FileError::schema(file_name, reason))
            }
        },
        Err(err) => {
            log::warn!("{} FILE_PARSE_FAILED error={}", ctx, err.kind);
            FileOutcome::Invalid(err)
        }
    }
}

fn parse_json(file_name: &str, content: &[u8]) -> Result<Value, FileError> {
    if content.len() > MAX_FILE_SIZE {
        return Err(FileError::parse(
            file_name,
            format!("file is {} bytes, limit is {}", content.len(), MAX_FILE_SIZE),
        ));
    }

    let text = std::str::from_utf8(content)
        .map_err(|e| FileError::parse(file_name, format!("file is not valid UTF-8: {}", e)))?;
    let text = text.trim_start_matches('\u{feff}');

    if text.trim().is_empty() {
        return Err(FileError::parse(file_name, "file is empty"));
    }

    serde_json::from_str(text)
        .map_err(|e| FileError::parse(file_name, format!("invalid JSON format: {}", e)))
}
