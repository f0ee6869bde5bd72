//! CSV rendering of the flat table.

use crate::transform::flatten::FlatRow;

/// Export column order. Stable: downstream tooling keys on it.
pub const FLAT_ROW_COLUMNS: [&str; 12] = [
    "instance_id",
    "instance_name",
    "collection_timestamp",
    "script_version",
    "app_name",
    "app_type",
    "app_status",
    "app_image",
    "container_id",
    "process_name",
    "ports",
    "pids",
];

/// Cell values of a row, in `FLAT_ROW_COLUMNS` order.
pub fn row_values(row: &FlatRow) -> [&str; 12] {
    [
        row.instance_id.as_str(),
        row.instance_name.as_str(),
        row.collection_timestamp.as_str(),
        row.script_version.as_str(),
        row.app_name.as_str(),
        row.app_type.as_str(),
        row.app_status.as_str(),
        row.app_image.as_str(),
        row.container_id.as_str(),
        row.process_name.as_str(),
        row.ports.as_str(),
        row.pids.as_str(),
    ]
}

/// Render rows as CSV with a header line. An empty table renders the header
/// only.
pub fn to_csv(rows: &[FlatRow]) -> String {
    let mut out = String::new();
    push_record(&mut out, FLAT_ROW_COLUMNS.iter().copied());
    for row in rows {
        push_record(&mut out, row_values(row).into_iter());
    }
    out
}

fn push_record<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    for (i, cell) in cells.enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_cell(out, cell);
    }
    out.push('\n');
}

fn push_cell(out: &mut String, cell: &str) {
    if cell.contains(&[',', '"', '\n', '\r'][..]) {
        out.push('"');
        out.push_str(&cell.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(cell);
    }
}
