//! Python bindings.
//!
//! The dashboard UI runs in Python; it hands uploaded files to
//! `process_uploaded_files` and asks for exports by session id.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::export::{row_values, to_csv, to_json_records, FLAT_ROW_COLUMNS};
use crate::filter::RowFilter;
use crate::init_logger;
use crate::pipeline::ingestion::UploadedFile;
use crate::session::{get_session_cache, get_session_cache_mut, process_for_session};

/// Process an upload for a session.
///
/// # Arguments
/// * `session_id` - Identity of the browser session
/// * `files` - List of (file_name, content) tuples
///
/// # Returns
/// Dict with counts, per-file errors, rows (list of dicts), the headline
/// distributions, and the full aggregates as a JSON string.
#[pyfunction]
fn process_uploaded_files(
    py: Python<'_>,
    session_id: String,
    files: Vec<(String, Vec<u8>)>,
) -> PyResult<Py<PyAny>> {
    init_logger();

    let uploads: Vec<UploadedFile> = files
        .into_iter()
        .map(|(name, content)| UploadedFile::new(name, content))
        .collect();

    let result = process_for_session(&session_id, &uploads);

    let py_result = PyDict::new(py);
    py_result.set_item("batch_id", &result.batch_id)?;
    py_result.set_item("processed_at", result.processed_at.to_rfc3339())?;
    py_result.set_item("received_count", result.received_count)?;
    py_result.set_item("accepted_count", result.accepted_count())?;
    py_result.set_item("rejected_count", result.rejected_count())?;

    let errors = PyList::empty(py);
    for err in &result.errors {
        let err_dict = PyDict::new(py);
        err_dict.set_item("file_name", &err.file_name)?;
        err_dict.set_item("kind", err.kind.as_str())?;
        err_dict.set_item("detail", err.kind.detail())?;
        err_dict.set_item("message", err.to_string())?;
        errors.append(err_dict)?;
    }
    py_result.set_item("errors", errors)?;

    let empty = PyList::empty(py);
    for instance in &result.empty_instances {
        let instance_dict = PyDict::new(py);
        instance_dict.set_item("file_name", &instance.file_name)?;
        instance_dict.set_item("instance_id", &instance.instance_id)?;
        instance_dict.set_item("instance_name", &instance.instance_name)?;
        empty.append(instance_dict)?;
    }
    py_result.set_item("empty_instances", empty)?;

    let warnings = serde_json::to_string(&result.warnings)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    py_result.set_item("warnings_json", warnings)?;

    let rows = PyList::empty(py);
    for row in &result.flat_table {
        let row_dict = PyDict::new(py);
        for (column, value) in FLAT_ROW_COLUMNS.iter().zip(row_values(row)) {
            row_dict.set_item(*column, value)?;
        }
        rows.append(row_dict)?;
    }
    py_result.set_item("rows", rows)?;
    py_result.set_item("columns", FLAT_ROW_COLUMNS.to_vec())?;

    let agg = &result.aggregates;
    py_result.set_item("total_instances", agg.summary.total_instances)?;
    py_result.set_item("total_applications", agg.summary.total_applications)?;
    py_result.set_item("unique_app_types", agg.summary.unique_app_types)?;
    py_result.set_item("avg_apps_per_instance", agg.summary.avg_apps_per_instance)?;
    py_result.set_item("type_distribution", agg.type_distribution.clone())?;
    py_result.set_item("status_distribution", agg.status_distribution.clone())?;
    py_result.set_item("per_instance_counts", agg.per_instance_counts.clone())?;

    let aggregates_json =
        serde_json::to_string(agg).map_err(|e| PyValueError::new_err(e.to_string()))?;
    py_result.set_item("aggregates_json", aggregates_json)?;

    Ok(py_result.into())
}

fn filter_from_args(
    app_type: Option<String>,
    status: Option<String>,
    instance_name: Option<String>,
    search: Option<String>,
) -> RowFilter {
    RowFilter {
        app_type,
        status,
        instance_name,
        search,
    }
}

/// CSV export of a session's (optionally filtered) rows.
///
/// Returns None when the session has no stored upload.
#[pyfunction]
#[pyo3(signature = (session_id, app_type=None, status=None, instance_name=None, search=None))]
fn export_session_csv(
    session_id: String,
    app_type: Option<String>,
    status: Option<String>,
    instance_name: Option<String>,
    search: Option<String>,
) -> PyResult<Option<String>> {
    let filter = filter_from_args(app_type, status, instance_name, search);
    let cache = get_session_cache();
    Ok(cache
        .get(&session_id)
        .map(|result| to_csv(&filter.apply(&result.flat_table))))
}

/// JSON records export of a session's (optionally filtered) rows.
#[pyfunction]
#[pyo3(signature = (session_id, app_type=None, status=None, instance_name=None, search=None))]
fn export_session_json(
    session_id: String,
    app_type: Option<String>,
    status: Option<String>,
    instance_name: Option<String>,
    search: Option<String>,
) -> PyResult<Option<String>> {
    let filter = filter_from_args(app_type, status, instance_name, search);
    let cache = get_session_cache();
    match cache.get(&session_id) {
        Some(result) => to_json_records(&filter.apply(&result.flat_table))
            .map(Some)
            .map_err(|e| PyValueError::new_err(e.to_string())),
        None => Ok(None),
    }
}

/// Drop a session's stored upload.
#[pyfunction]
fn clear_session(session_id: String) -> PyResult<bool> {
    init_logger();
    Ok(get_session_cache_mut().clear(&session_id))
}

/// Python module definition
#[pymodule]
fn appdash_core(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(process_uploaded_files, m)?)?;
    m.add_function(wrap_pyfunction!(export_session_csv, m)?)?;
    m.add_function(wrap_pyfunction!(export_session_json, m)?)?;
    m.add_function(wrap_pyfunction!(clear_session, m)?)?;
    Ok(())
}
