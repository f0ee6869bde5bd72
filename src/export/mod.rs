//! Export module.
//!
//! Renders the flat table (or a filtered slice of it) for download.
//! Writing the bytes to disk is left to the host.

pub mod csv;
pub mod records;

pub use self::csv::*;
pub use records::*;

use crate::filter::RowFilter;

/// Suggested download name for an export of `filter`'s rows.
///
/// An unfiltered export is the whole application database; a filtered one
/// is named after the first set criterion.
pub fn export_file_name(filter: &RowFilter, extension: &str) -> String {
    let label = filter
        .app_type
        .as_deref()
        .or(filter.instance_name.as_deref())
        .or(filter.status.as_deref());

    match label {
        Some(value) => format!("filtered_applications_{}.{}", sanitize(value), extension),
        None if filter.is_empty() => format!("application_database.{}", extension),
        None => format!("filtered_applications_search.{}", extension),
    }
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
