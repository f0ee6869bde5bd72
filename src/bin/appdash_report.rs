//! Command-line report over instance snapshot files.
//!
//! Without `--csv`/`--json` prints the aggregates as JSON. Rejected files are
//! listed on stderr and do not change the exit status.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use appdash_core::{
    init_logger, process_uploads, to_csv, to_json_records, Aggregates, BatchContext, FlatRow,
    RowFilter, UploadedFile,
};

#[derive(Parser, Debug)]
#[command(
    name = "appdash-report",
    version,
    about = "Validate instance snapshot files and report on their applications"
)]
struct Cli {
    /// Print the (filtered) rows as CSV
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Print the (filtered) rows as JSON records
    #[arg(long)]
    json: bool,

    /// Keep only rows of this application type
    #[arg(long = "type", value_name = "TYPE")]
    app_type: Option<String>,

    /// Keep only rows with this status
    #[arg(long)]
    status: Option<String>,

    /// Keep only rows of this instance name
    #[arg(long)]
    instance: Option<String>,

    /// Case-insensitive pattern over app name, type and instance name
    #[arg(long, value_name = "PATTERN")]
    search: Option<String>,

    /// Instance snapshot files
    #[arg(required = true, value_name = "FILE")]
    paths: Vec<PathBuf>,
}

impl Cli {
    fn filter(&self) -> RowFilter {
        RowFilter {
            app_type: self.app_type.clone(),
            status: self.status.clone(),
            instance_name: self.instance.clone(),
            search: self.search.clone(),
        }
    }
}

/// Aggregates over a filtered view. Instances count only when they still
/// have a row after filtering.
fn filtered_aggregates(rows: &[FlatRow]) -> Aggregates {
    let mut ids: Vec<&str> = rows.iter().map(|r| r.instance_id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    Aggregates::from_rows(ids.len(), rows)
}

fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse();

    let mut files = Vec::with_capacity(cli.paths.len());
    for path in &cli.paths {
        let content =
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        files.push(UploadedFile::new(path.display().to_string(), content));
    }

    let result = process_uploads(&BatchContext::new(), &files);

    for err in &result.errors {
        eprintln!("{}", err);
    }
    for instance in &result.empty_instances {
        eprintln!(
            "{}: instance {} ({}) reports no applications",
            instance.file_name, instance.instance_name, instance.instance_id
        );
    }

    let filter = cli.filter();
    if cli.csv {
        print!("{}", to_csv(&filter.apply(&result.flat_table)));
    } else if cli.json {
        println!("{}", to_json_records(&filter.apply(&result.flat_table))?);
    } else if filter.is_empty() {
        println!("{}", serde_json::to_string_pretty(&result.aggregates)?);
    } else {
        let rows = filter.apply(&result.flat_table);
        println!("{}", serde_json::to_string_pretty(&filtered_aggregates(&rows))?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_filters_and_paths() {
        let cli = Cli::try_parse_from([
            "appdash-report",
            "--csv",
            "--type=container",
            "--search",
            "web",
            "a.json",
            "b.json",
        ])
        .unwrap();

        assert!(cli.csv);
        assert!(!cli.json);
        let filter = cli.filter();
        assert_eq!(filter.app_type.as_deref(), Some("container"));
        assert_eq!(filter.search.as_deref(), Some("web"));
        assert!(filter.status.is_none());
        assert_eq!(cli.paths, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
    }

    #[test]
    fn test_csv_and_json_conflict() {
        assert!(Cli::try_parse_from(["appdash-report", "--csv", "--json", "a.json"]).is_err());
    }

    #[test]
    fn test_paths_required() {
        assert!(Cli::try_parse_from(["appdash-report", "--csv"]).is_err());
    }

    #[test]
    fn test_filtered_aggregates_count_only_matching_instances() {
        let files = vec![
            UploadedFile::new(
                "one.json",
                r#"{"instance_id": "i-1", "instance_name": "h1",
                    "applications": [{"name": "web", "type": "container"}]}"#,
            ),
            UploadedFile::new(
                "two.json",
                r#"{"instance_id": "i-2", "instance_name": "h2",
                    "applications": [{"name": "cron", "type": "process"}]}"#,
            ),
        ];
        let result = process_uploads(&BatchContext::with_batch_id("cli-test"), &files);
        let rows = RowFilter::new().app_type("container").apply(&result.flat_table);

        let agg = filtered_aggregates(&rows);
        assert_eq!(agg.summary.total_instances, 1);
        assert_eq!(agg.summary.total_applications, 1);
    }
}
