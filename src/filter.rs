//! Row filtering for table views and filtered exports.
//!
//! Filters narrow an already-computed flat table; they never re-validate or
//! re-flatten. All set criteria must match.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::transform::flatten::FlatRow;

/// Criteria for narrowing the flat table. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFilter {
    #[serde(default)]
    pub app_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub instance_name: Option<String>,
    /// Case-insensitive pattern matched against app name, app type and
    /// instance name. Treated literally if it is not a valid regex.
    #[serde(default)]
    pub search: Option<String>,
}

impl RowFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn app_type(mut self, value: &str) -> Self {
        self.app_type = Some(value.to_string());
        self
    }

    pub fn status(mut self, value: &str) -> Self {
        self.status = Some(value.to_string());
        self
    }

    pub fn instance_name(mut self, value: &str) -> Self {
        self.instance_name = Some(value.to_string());
        self
    }

    pub fn search(mut self, value: &str) -> Self {
        self.search = Some(value.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.app_type.is_none()
            && self.status.is_none()
            && self.instance_name.is_none()
            && self.search_pattern().is_none()
    }

    /// Rows matching every set criterion, in table order.
    pub fn apply(&self, rows: &[FlatRow]) -> Vec<FlatRow> {
        let pattern = self.search_pattern();
        rows.iter()
            .filter(|row| self.matches_fields(row))
            .filter(|row| pattern.as_ref().map_or(true, |re| search_matches(re, row)))
            .cloned()
            .collect()
    }

    /// Single-row check. Compiles the search pattern per call; prefer
    /// `apply` for whole tables.
    pub fn matches(&self, row: &FlatRow) -> bool {
        self.matches_fields(row)
            && self
                .search_pattern()
                .as_ref()
                .map_or(true, |re| search_matches(re, row))
    }

    fn matches_fields(&self, row: &FlatRow) -> bool {
        field_matches(&self.app_type, &row.app_type)
            && field_matches(&self.status, &row.app_status)
            && field_matches(&self.instance_name, &row.instance_name)
    }

    fn search_pattern(&self) -> Option<Regex> {
        let term = self.search.as_deref()?;
        if term.is_empty() {
            return None;
        }
        RegexBuilder::new(term)
            .case_insensitive(true)
            .build()
            .or_else(|_| {
                RegexBuilder::new(&regex::escape(term))
                    .case_insensitive(true)
                    .build()
            })
            .ok()
    }
}

fn field_matches(expected: &Option<String>, actual: &str) -> bool {
    expected.as_deref().map_or(true, |e| e == actual)
}

fn search_matches(re: &Regex, row: &FlatRow) -> bool {
    re.is_match(&row.app_name) || re.is_match(&row.app_type) || re.is_match(&row.instance_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(instance: &str, name: &str, app_type: &str, status: &str) -> FlatRow {
        FlatRow {
            instance_id: format!("id-{}", instance),
            instance_name: instance.to_string(),
            collection_timestamp: String::new(),
            script_version: "Unknown".to_string(),
            app_name: name.to_string(),
            app_type: app_type.to_string(),
            app_status: status.to_string(),
            app_image: String::new(),
            container_id: String::new(),
            process_name: String::new(),
            ports: String::new(),
            pids: String::new(),
        }
    }

    fn table() -> Vec<FlatRow> {
        vec![
            row("web-01", "nginx", "container", "running"),
            row("web-01", "python-app", "process", "running"),
            row("db-01", "postgres", "container", "stopped"),
        ]
    }

    fn names(rows: &[FlatRow]) -> Vec<&str> {
        rows.iter().map(|r| r.app_name.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = RowFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&table()).len(), 3);
    }

    #[test]
    fn test_field_filters_combine() {
        let rows = table();
        assert_eq!(names(&RowFilter::new().app_type("container").apply(&rows)), vec!["nginx", "postgres"]);
        assert_eq!(names(&RowFilter::new().status("stopped").apply(&rows)), vec!["postgres"]);
        assert_eq!(
            names(&RowFilter::new().instance_name("web-01").app_type("process").apply(&rows)),
            vec!["python-app"]
        );
        assert!(RowFilter::new().app_type("vm").apply(&rows).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let rows = table();
        assert_eq!(names(&RowFilter::new().search("NGINX").apply(&rows)), vec!["nginx"]);
        assert_eq!(names(&RowFilter::new().search("db-").apply(&rows)), vec!["postgres"]);
        assert_eq!(names(&RowFilter::new().search("PROCESS").apply(&rows)), vec!["python-app"]);
    }

    #[test]
    fn test_search_regex_and_literal_fallback() {
        let mut rows = table();
        rows.push(row("web-02", "app(v2", "process", "running"));

        assert_eq!(names(&RowFilter::new().search("^post").apply(&rows)), vec!["postgres"]);
        assert_eq!(names(&RowFilter::new().search("app(v2").apply(&rows)), vec!["app(v2"]);
    }

    #[test]
    fn test_empty_search_ignored() {
        let filter = RowFilter::new().search("");
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&table()).len(), 3);
    }

    #[test]
    fn test_search_term_used_as_given() {
        let mut rows = table();
        rows.push(row("web-02", "my app", "process", "running"));

        assert_eq!(names(&RowFilter::new().search(" app").apply(&rows)), vec!["my app"]);
        assert_eq!(
            names(&RowFilter::new().search("app").apply(&rows)),
            vec!["python-app", "my app"]
        );
        assert!(!RowFilter::new().search(" ").is_empty());
    }

    #[test]
    fn test_matches_single_row() {
        let filter = RowFilter::new().status("running").search("nginx");
        let rows = table();
        assert!(filter.matches(&rows[0]));
        assert!(!filter.matches(&rows[1]));
    }
}
