//! Snapshot schema: typed records and the structural check that builds them.
//!
//! Uploaded JSON is loosely typed. It is mapped here, once, onto
//! `InstanceRecord`/`ApplicationRecord` so nothing downstream touches raw
//! `serde_json::Value` maps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::extraction::json_value::{int_list, optional_int, optional_string};

/// Top-level fields every snapshot must carry.
pub const REQUIRED_FIELDS: &[&str] = &["instance_id", "instance_name", "applications"];

/// One application (process or container) reported by an instance.
///
/// Every field is optional in the upload; defaults are applied later by
/// `transform::flatten::normalize_application`, not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub app_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub ports: Vec<i64>,
    #[serde(default)]
    pub pids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,
}

/// One uploaded snapshot of an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub instance_id: String,
    pub instance_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_version: Option<String>,
    #[serde(default)]
    pub applications: Vec<ApplicationRecord>,
    /// Reported by the collector; never checked against `applications.len()`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_applications: Option<i64>,
}

/// A structurally valid snapshot plus list entries that had to be skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaCheck {
    pub record: InstanceRecord,
    /// Human-readable notes for port/pid entries that were not integers.
    pub skipped_entries: Vec<String>,
}

/// Check the shape of a parsed snapshot and build the typed record.
///
/// Returns the schema failure reason on error.
pub fn check_instance(value: &Value) -> Result<SchemaCheck, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| format!("top-level value must be an object, got {}", json_type(value)))?;

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !obj.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(format!("missing required fields: {}", missing.join(", ")));
    }

    let instance_id = required_string(obj, "instance_id")?;
    let instance_name = required_string(obj, "instance_name")?;

    let apps = match obj.get("applications") {
        Some(Value::Array(arr)) => arr,
        other => {
            return Err(format!(
                "'applications' must be a list, got {}",
                other.map(json_type).unwrap_or("nothing")
            ))
        }
    };

    let mut applications = Vec::with_capacity(apps.len());
    let mut skipped_entries = Vec::new();

    for (i, app) in apps.iter().enumerate() {
        let app_obj = app
            .as_object()
            .ok_or_else(|| format!("application {} must be an object", i + 1))?;

        let ports = int_list(app_obj, "ports");
        let pids = int_list(app_obj, "pids");

        for bad in &ports.rejected {
            skipped_entries.push(format!("application {}: non-integer port {}", i + 1, bad));
        }
        for bad in &pids.rejected {
            skipped_entries.push(format!("application {}: non-integer pid {}", i + 1, bad));
        }

        applications.push(ApplicationRecord {
            name: optional_string(app_obj, "name"),
            app_type: optional_string(app_obj, "type"),
            status: optional_string(app_obj, "status"),
            ports: ports.values,
            pids: pids.values,
            image: optional_string(app_obj, "image"),
            container_id: optional_string(app_obj, "container_id"),
            process_name: optional_string(app_obj, "process_name"),
        });
    }

    Ok(SchemaCheck {
        record: InstanceRecord {
            instance_id,
            instance_name,
            collection_timestamp: optional_string(obj, "collection_timestamp"),
            script_version: optional_string(obj, "script_version"),
            applications,
            total_applications: optional_int(obj, "total_applications"),
        },
        skipped_entries,
    })
}

fn required_string(obj: &Map<String, Value>, key: &str) -> Result<String, String> {
    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        _ => Err(format!("'{}' must be a non-empty string", key)),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
