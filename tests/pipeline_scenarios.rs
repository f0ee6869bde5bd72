use appdash_core::export::export_file_name;
use appdash_core::{
    process_uploads, to_csv, BatchContext, ErrorKind, PipelineWarning, RowFilter, UploadedFile,
    FLAT_ROW_COLUMNS,
};

fn ctx() -> BatchContext {
    BatchContext::with_batch_id("scenario")
}

fn two_instance_upload() -> Vec<UploadedFile> {
    vec![
        UploadedFile::new(
            "instance-1.json",
            r#"{
                "instance_id": "instance-1",
                "instance_name": "web-01",
                "collection_timestamp": "2024-01-15T10:30:00Z",
                "applications": [
                    {"name": "nginx", "type": "container", "status": "running",
                     "ports": [80, 443], "pids": [1234], "container_id": "abc123"},
                    {"name": "backup", "type": "process", "status": "stopped",
                     "pids": [5678], "process_name": "backup.sh"}
                ],
                "total_applications": 2
            }"#,
        ),
        UploadedFile::new(
            "instance-2.json",
            r#"{
                "instance_id": "instance-2",
                "instance_name": "web-02",
                "applications": [
                    {"name": "redis", "type": "container", "status": "running", "ports": [6379]}
                ]
            }"#,
        ),
    ]
}

#[test]
fn two_instances_aggregate_as_expected() {
    let result = process_uploads(&ctx(), &two_instance_upload());

    assert!(result.errors.is_empty());
    assert_eq!(result.flat_table.len(), 3);

    let agg = &result.aggregates;
    assert_eq!(agg.type_distribution.len(), 2);
    assert_eq!(agg.type_distribution["container"], 2);
    assert_eq!(agg.type_distribution["process"], 1);
    assert_eq!(agg.status_distribution.len(), 2);
    assert_eq!(agg.status_distribution["running"], 2);
    assert_eq!(agg.status_distribution["stopped"], 1);
    assert_eq!(agg.per_instance_counts.len(), 2);
    assert_eq!(agg.per_instance_counts["instance-1"], 2);
    assert_eq!(agg.per_instance_counts["instance-2"], 1);

    assert_eq!(agg.summary.total_instances, 2);
    assert_eq!(agg.summary.total_applications, 3);
    assert_eq!(agg.summary.unique_app_types, 2);
    assert_eq!(agg.summary.unique_statuses, 2);
    assert_eq!(agg.busiest_instance.as_deref(), Some("web-01"));
    assert_eq!(agg.most_common_type.as_deref(), Some("container"));
}

#[test]
fn rows_keep_upload_and_array_order() {
    let result = process_uploads(&ctx(), &two_instance_upload());
    let names: Vec<&str> = result.flat_table.iter().map(|r| r.app_name.as_str()).collect();
    assert_eq!(names, vec!["nginx", "backup", "redis"]);

    let second = &result.flat_table[1];
    assert_eq!(second.instance_id, "instance-1");
    assert_eq!(second.instance_name, "web-01");
    assert_eq!(second.collection_timestamp, "2024-01-15T10:30:00Z");
    assert_eq!(second.process_name, "backup.sh");
    assert_eq!(second.ports, "");
}

#[test]
fn malformed_file_in_the_middle_is_isolated() {
    let mut files = two_instance_upload();
    files.insert(1, UploadedFile::new("broken.json", r#"{"instance_id": "i-1", "#));

    let result = process_uploads(&ctx(), &files);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].file_name, "broken.json");
    assert!(matches!(result.errors[0].kind, ErrorKind::Parse(_)));
    assert_eq!(result.valid_instances.len(), 2);
    assert_eq!(result.flat_table.len(), 3);
    assert!(result.flat_table.iter().all(|r| r.instance_id != "i-1"));
}

#[test]
fn missing_required_fields_is_schema_error() {
    let files = vec![UploadedFile::new("partial.json", r#"{"instance_id": "i-1"}"#)];
    let result = process_uploads(&ctx(), &files);

    assert_eq!(result.errors.len(), 1);
    assert!(matches!(result.errors[0].kind, ErrorKind::Schema(_)));
    assert!(result.flat_table.is_empty());
    assert!(result
        .warnings
        .iter()
        .any(|w| matches!(w, PipelineWarning::EmptyResult { .. })));
}

#[test]
fn missing_application_fields_become_unknown() {
    let files = vec![UploadedFile::new(
        "sparse.json",
        r#"{"instance_id": "i-1", "instance_name": "h",
            "applications": [{}, {"name": null, "type": "", "status": "running"}]}"#,
    )];
    let result = process_uploads(&ctx(), &files);

    assert_eq!(result.flat_table.len(), 2);
    for row in &result.flat_table {
        assert_eq!(row.app_name, "Unknown");
        assert_eq!(row.app_type, "Unknown");
    }
    assert_eq!(result.flat_table[0].app_status, "Unknown");
    assert_eq!(result.flat_table[1].app_status, "running");
    assert_eq!(result.aggregates.type_distribution["Unknown"], 2);
    assert!(!result.aggregates.type_distribution.contains_key(""));
}

#[test]
fn rerun_is_byte_identical() {
    let files = two_instance_upload();
    let first = process_uploads(&ctx(), &files);
    let second = process_uploads(&ctx(), &files);

    assert_eq!(first.flat_table, second.flat_table);
    assert_eq!(to_csv(&first.flat_table), to_csv(&second.flat_table));
    assert_eq!(
        serde_json::to_string(&first.aggregates).unwrap(),
        serde_json::to_string(&second.aggregates).unwrap()
    );
    assert_eq!(first.file_digests, second.file_digests);
}

#[test]
fn filtered_csv_export() {
    let result = process_uploads(&ctx(), &two_instance_upload());
    let filter = RowFilter::new().app_type("container");
    let rows = filter.apply(&result.flat_table);
    let csv = to_csv(&rows);
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], FLAT_ROW_COLUMNS.join(","));
    assert!(lines[1].starts_with("instance-1,web-01,"));
    assert!(lines[2].starts_with("instance-2,web-02,"));
    assert_eq!(
        export_file_name(&filter, "csv"),
        "filtered_applications_container.csv"
    );
}

#[test]
fn total_applications_mismatch_is_passed_through() {
    let files = vec![UploadedFile::new(
        "liar.json",
        r#"{"instance_id": "i-1", "instance_name": "h",
            "applications": [{"name": "a"}], "total_applications": 9}"#,
    )];
    let result = process_uploads(&ctx(), &files);

    assert!(result.errors.is_empty());
    assert_eq!(result.valid_instances[0].total_applications, Some(9));
    assert_eq!(result.flat_table.len(), 1);
}
