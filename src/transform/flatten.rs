//! Flattening of instance snapshots into one row per application.
//!
//! All default-filling happens in `normalize_application`, so the table, the
//! aggregates and the exports see the same values.

use serde::{Deserialize, Serialize};

use crate::logging::structured::LogContext;
use crate::validation::schema::{ApplicationRecord, InstanceRecord};

/// Placeholder for missing categorical values.
pub const UNKNOWN: &str = "Unknown";

/// Separator used when rendering ports/pids into a table cell.
pub const LIST_SEPARATOR: &str = ", ";

/// An application with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedApplication {
    pub name: String,
    pub app_type: String,
    pub status: String,
    pub image: String,
    pub container_id: String,
    pub process_name: String,
    pub ports: Vec<i64>,
    pub pids: Vec<i64>,
}

/// One (instance, application) pair, ready for a table or export.
///
/// Field order is the export column order, see `export::FLAT_ROW_COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRow {
    pub instance_id: String,
    pub instance_name: String,
    pub collection_timestamp: String,
    pub script_version: String,
    pub app_name: String,
    pub app_type: String,
    pub app_status: String,
    pub app_image: String,
    pub container_id: String,
    pub process_name: String,
    pub ports: String,
    pub pids: String,
}

impl FlatRow {
    /// Ports parsed back from the display cell.
    pub fn port_numbers(&self) -> Vec<i64> {
        split_list(&self.ports)
    }

    pub fn pid_numbers(&self) -> Vec<i64> {
        split_list(&self.pids)
    }
}

/// Apply the default-fill rules to one application.
pub fn normalize_application(app: &ApplicationRecord) -> NormalizedApplication {
    NormalizedApplication {
        name: category(app.name.as_deref()),
        app_type: category(app.app_type.as_deref()),
        status: category(app.status.as_deref()),
        image: app.image.clone().unwrap_or_default(),
        container_id: app.container_id.clone().unwrap_or_default(),
        process_name: app.process_name.clone().unwrap_or_default(),
        ports: app.ports.clone(),
        pids: app.pids.clone(),
    }
}

/// Flatten instances into rows: instances in input order, applications in
/// array order.
pub fn flatten(instances: &[InstanceRecord], ctx: &LogContext) -> Vec<FlatRow> {
    let total: usize = instances.iter().map(|i| i.applications.len()).sum();
    let mut rows = Vec::with_capacity(total);

    for instance in instances {
        let collection_timestamp = instance.collection_timestamp.clone().unwrap_or_default();
        let script_version = category(instance.script_version.as_deref());

        for app in &instance.applications {
            let app = normalize_application(app);
            rows.push(FlatRow {
                instance_id: instance.instance_id.clone(),
                instance_name: instance.instance_name.clone(),
                collection_timestamp: collection_timestamp.clone(),
                script_version: script_version.clone(),
                app_name: app.name,
                app_type: app.app_type,
                app_status: app.status,
                app_image: app.image,
                container_id: app.container_id,
                process_name: app.process_name,
                ports: join_list(&app.ports),
                pids: join_list(&app.pids),
            });
        }
    }

    log::debug!(
        "{} FLATTEN_COMPLETE instances={} rows={}",
        ctx,
        instances.len(),
        rows.len()
    );

    rows
}

fn category(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn join_list(values: &[i64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

fn split_list(cell: &str) -> Vec<i64> {
    cell.split(',')
        .filter_map(|p| p.trim().parse().ok())
        .collect()
}
