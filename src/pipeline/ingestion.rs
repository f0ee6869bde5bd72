//! Main upload pipeline.
//!
//! Coordinates one processing cycle over an uploaded file set:
//! 1. Per-file parse and schema check (failures collected, never fatal)
//! 2. Surfacing of instances that report no applications
//! 3. Flattening into one row per (instance, application)
//! 4. Aggregation for charts and summary tables

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::FileError;
use crate::transform::aggregate::Aggregates;
use crate::transform::flatten::{flatten, FlatRow};
use crate::validation::loader::{load_instance_file, FileOutcome};
use crate::validation::schema::InstanceRecord;

use super::context::BatchContext;

/// One uploaded file as received from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Hex SHA-256 of the raw content.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.content))
    }
}

/// A valid instance that contributes no rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyInstance {
    pub file_name: String,
    pub instance_id: String,
    pub instance_name: String,
}

/// Non-fatal conditions reported next to the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum PipelineWarning {
    /// The flat table is empty; the result is still well-formed.
    EmptyResult { reason: String },
    /// A valid instance reported an empty application list.
    NoApplications {
        file_name: String,
        instance_id: String,
    },
    /// A port or pid entry was not an integer and was left out.
    EntrySkipped { file_name: String, detail: String },
}

/// Everything one processing cycle produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub batch_id: String,
    pub processed_at: DateTime<Utc>,
    pub received_count: usize,
    /// Uploaded file names, in upload order.
    pub file_names: Vec<String>,
    /// SHA-256 of each uploaded file, in upload order.
    pub file_digests: Vec<String>,
    pub valid_instances: Vec<InstanceRecord>,
    pub errors: Vec<FileError>,
    pub empty_instances: Vec<EmptyInstance>,
    pub flat_table: Vec<FlatRow>,
    pub aggregates: Aggregates,
    pub warnings: Vec<PipelineWarning>,
}

impl PipelineResult {
    pub fn accepted_count(&self) -> usize {
        self.valid_instances.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.errors.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Process an uploaded file set.
///
/// Main entry point for the display layer. Never fails: bad files become
/// entries in `errors` and contribute no rows.
pub fn process_uploads(ctx: &BatchContext, files: &[UploadedFile]) -> PipelineResult {
    let batch_log = ctx.log_context();

    log::info!("{} BATCH_RECEIVED files={}", batch_log, files.len());

    let mut valid_instances = Vec::new();
    let mut errors = Vec::new();
    let mut empty_instances = Vec::new();
    let mut warnings = Vec::new();

    for file in files {
        let file_log = ctx.file_context(&file.name);

        match load_instance_file(&file.name, &file.content, &file_log) {
            FileOutcome::Valid { record, notes } => {
                for detail in notes {
                    warnings.push(PipelineWarning::EntrySkipped {
                        file_name: file.name.clone(),
                        detail,
                    });
                }

                if record.applications.is_empty() {
                    crate::log_warn!(
                        file_log,
                        "INSTANCE_NO_APPLICATIONS",
                        instance_id = record.instance_id,
                        instance_name = record.instance_name,
                    );
                    empty_instances.push(EmptyInstance {
                        file_name: file.name.clone(),
                        instance_id: record.instance_id.clone(),
                        instance_name: record.instance_name.clone(),
                    });
                    warnings.push(PipelineWarning::NoApplications {
                        file_name: file.name.clone(),
                        instance_id: record.instance_id.clone(),
                    });
                }

                valid_instances.push(record);
            }
            FileOutcome::Invalid(err) => errors.push(err),
        }
    }

    let flat_table = flatten(&valid_instances, &batch_log);
    let aggregates = Aggregates::from_rows(valid_instances.len(), &flat_table);

    if flat_table.is_empty() {
        let reason = if valid_instances.is_empty() {
            "no valid files in upload"
        } else {
            "no valid instance reports any applications"
        };
        log::warn!("{} EMPTY_RESULT reason={:?}", batch_log, reason);
        warnings.push(PipelineWarning::EmptyResult {
            reason: reason.to_string(),
        });
    }

    crate::log_info!(
        batch_log,
        "BATCH_COMPLETE",
        received = files.len(),
        accepted = valid_instances.len(),
        rejected = errors.len(),
        rows = flat_table.len(),
    );

    PipelineResult {
        batch_id: ctx.batch_id.clone(),
        processed_at: ctx.processed_at,
        received_count: files.len(),
        file_names: files.iter().map(|f| f.name.clone()).collect(),
        file_digests: files.iter().map(UploadedFile::digest).collect(),
        valid_instances,
        errors,
        empty_instances,
        flat_table,
        aggregates,
        warnings,
    }
}
