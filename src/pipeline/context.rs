//! Pipeline context management.
//!
//! Provides batch context for logging and result stamping.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;

/// Context for one upload batch.
#[derive(Debug, Clone)]
pub struct BatchContext {
    pub batch_id: String,
    pub processed_at: DateTime<Utc>,
}

impl BatchContext {
    pub fn new() -> Self {
        Self::with_batch_id(&format!("batch-{}", &Uuid::new_v4().to_string()[..8]))
    }

    /// Context with a caller-chosen id, e.g. a session id.
    pub fn with_batch_id(batch_id: &str) -> Self {
        Self {
            batch_id: batch_id.to_string(),
            processed_at: Utc::now(),
        }
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.batch_id)
    }

    /// Log context narrowed to one uploaded file.
    pub fn file_context(&self, file_name: &str) -> LogContext {
        self.log_context().with_file(file_name)
    }
}

impl Default for BatchContext {
    fn default() -> Self {
        Self::new()
    }
}
