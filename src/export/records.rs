//! JSON records rendering of the flat table.

use crate::error::ExportError;
use crate::transform::flatten::FlatRow;

/// Pretty-printed JSON array, one object per row with the CSV column names
/// as keys.
pub fn to_json_records(rows: &[FlatRow]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::csv::FLAT_ROW_COLUMNS;

    #[test]
    fn test_empty_table() {
        assert_eq!(to_json_records(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_keys_follow_columns() {
        let row = FlatRow {
            instance_id: "i-1".to_string(),
            instance_name: "web-01".to_string(),
            collection_timestamp: String::new(),
            script_version: "Unknown".to_string(),
            app_name: "nginx".to_string(),
            app_type: "container".to_string(),
            app_status: "running".to_string(),
            app_image: "nginx:1.25".to_string(),
            container_id: "abc123".to_string(),
            process_name: String::new(),
            ports: "80, 443".to_string(),
            pids: "1234".to_string(),
        };
        let json = to_json_records(&[row]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let obj = parsed[0].as_object().unwrap();

        assert_eq!(obj.len(), FLAT_ROW_COLUMNS.len());
        for column in FLAT_ROW_COLUMNS {
            assert!(obj.contains_key(column), "missing key {}", column);
        }
        assert_eq!(obj["app_image"], "nginx:1.25");
    }
}
