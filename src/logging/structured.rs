//! Structured logging utilities.
//!
//! Provides context-aware logging with batch_id and the uploaded file name
//! included in every log message.

use std::fmt;

/// Logging context for one upload batch, optionally narrowed to a file.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub batch_id: String,
    pub file_name: Option<String>,
}

impl LogContext {
    pub fn new(batch_id: &str) -> Self {
        Self {
            batch_id: batch_id.to_string(),
            file_name: None,
        }
    }

    pub fn with_file(&self, file_name: &str) -> Self {
        Self {
            batch_id: self.batch_id.clone(),
            file_name: Some(file_name.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file_name {
            Some(name) => write!(f, "[batch={}] [file={}]", self.batch_id, name),
            None => write!(f, "[batch={}]", self.batch_id),
        }
    }
}

/// Log an info event with context and `key=value` fields.
#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        log::info!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*), $($value),*)
        );
    };
}

/// Log a warning event with context and `key=value` fields.
#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        log::warn!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*), $($value),*)
        );
    };
}
