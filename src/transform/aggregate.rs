//! Aggregates over the flat table.
//!
//! Every figure is an exact tally over `FlatRow`s. Maps are `BTreeMap` so
//! serialized output is identical across runs for the same input.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::transform::flatten::FlatRow;

/// How many ports `top_ports` keeps.
pub const TOP_PORTS_LIMIT: usize = 10;

/// Status value counted by `Summary::running_applications`.
pub const RUNNING_STATUS: &str = "running";

/// Headline figures for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Valid instance records, including those with no applications.
    pub total_instances: usize,
    /// Flat rows.
    pub total_applications: usize,
    pub unique_app_types: usize,
    pub unique_statuses: usize,
    /// Rows per distinct instance_id present in the table, one decimal.
    pub avg_apps_per_instance: f64,
    pub running_applications: usize,
}

/// Per-instance breakdown, keyed by instance name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSummary {
    pub total_apps: usize,
    pub app_types: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyCount {
    pub instance_name: String,
    pub app_type: String,
    pub app_status: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortCount {
    pub port: i64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstancePortCount {
    pub instance_name: String,
    pub port: i64,
    pub count: usize,
}

/// Everything the display layer charts or tabulates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub summary: Summary,
    pub type_distribution: BTreeMap<String, usize>,
    pub status_distribution: BTreeMap<String, usize>,
    /// Rows per instance_id.
    pub per_instance_counts: BTreeMap<String, usize>,
    pub instance_summaries: BTreeMap<String, InstanceSummary>,
    /// instance_name -> app_type -> rows.
    pub type_matrix: BTreeMap<String, BTreeMap<String, usize>>,
    /// Rows per (instance_name, app_type, app_status), sorted by that key.
    pub hierarchy: Vec<HierarchyCount>,
    /// Occurrences of each port across all rows.
    pub port_usage: BTreeMap<i64, usize>,
    /// Occurrences per (instance_name, port), sorted by that key.
    pub port_by_instance: Vec<InstancePortCount>,
    /// Most used ports, count descending then port ascending.
    pub top_ports: Vec<PortCount>,
    /// Instance name with the most rows; ties go to the smallest name.
    pub busiest_instance: Option<String>,
    /// Most frequent app type; ties go to the smallest name.
    pub most_common_type: Option<String>,
}

impl Aggregates {
    /// Aggregate a flat table built from `instance_count` valid instances.
    ///
    /// An empty table yields zero totals and empty maps.
    pub fn from_rows(instance_count: usize, rows: &[FlatRow]) -> Self {
        let mut type_distribution: BTreeMap<String, usize> = BTreeMap::new();
        let mut status_distribution: BTreeMap<String, usize> = BTreeMap::new();
        let mut per_instance_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut per_instance_name: BTreeMap<String, usize> = BTreeMap::new();
        let mut types_by_instance: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut type_matrix: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        let mut hierarchy: BTreeMap<(String, String, String), usize> = BTreeMap::new();
        let mut port_usage: BTreeMap<i64, usize> = BTreeMap::new();
        let mut port_by_instance: BTreeMap<(String, i64), usize> = BTreeMap::new();
        let mut running = 0;

        for row in rows {
            *type_distribution.entry(row.app_type.clone()).or_default() += 1;
            *status_distribution.entry(row.app_status.clone()).or_default() += 1;
            *per_instance_counts.entry(row.instance_id.clone()).or_default() += 1;
            *per_instance_name.entry(row.instance_name.clone()).or_default() += 1;

            types_by_instance
                .entry(row.instance_name.clone())
                .or_default()
                .insert(row.app_type.clone());

            *type_matrix
                .entry(row.instance_name.clone())
                .or_default()
                .entry(row.app_type.clone())
                .or_default() += 1;

            *hierarchy
                .entry((
                    row.instance_name.clone(),
                    row.app_type.clone(),
                    row.app_status.clone(),
                ))
                .or_default() += 1;

            for port in row.port_numbers() {
                *port_usage.entry(port).or_default() += 1;
                *port_by_instance
                    .entry((row.instance_name.clone(), port))
                    .or_default() += 1;
            }

            if row.app_status == RUNNING_STATUS {
                running += 1;
            }
        }

        let avg_apps_per_instance = if per_instance_counts.is_empty() {
            0.0
        } else {
            round_one_decimal(rows.len() as f64 / per_instance_counts.len() as f64)
        };

        let summary = Summary {
            total_instances: instance_count,
            total_applications: rows.len(),
            unique_app_types: type_distribution.len(),
            unique_statuses: status_distribution.len(),
            avg_apps_per_instance,
            running_applications: running,
        };

        let instance_summaries = per_instance_name
            .iter()
            .map(|(name, &total_apps)| {
                let app_types = types_by_instance.get(name).map(|s| s.len()).unwrap_or(0);
                (name.clone(), InstanceSummary { total_apps, app_types })
            })
            .collect();

        let mut top_ports: Vec<PortCount> = port_usage
            .iter()
            .map(|(&port, &count)| PortCount { port, count })
            .collect();
        top_ports.sort_by(|a, b| b.count.cmp(&a.count).then(a.port.cmp(&b.port)));
        top_ports.truncate(TOP_PORTS_LIMIT);

        Self {
            summary,
            busiest_instance: max_by_count(&per_instance_name),
            most_common_type: max_by_count(&type_distribution),
            type_distribution,
            status_distribution,
            per_instance_counts,
            instance_summaries,
            type_matrix,
            hierarchy: hierarchy
                .into_iter()
                .map(|((instance_name, app_type, app_status), count)| HierarchyCount {
                    instance_name,
                    app_type,
                    app_status,
                    count,
                })
                .collect(),
            port_usage,
            port_by_instance: port_by_instance
                .into_iter()
                .map(|((instance_name, port), count)| InstancePortCount {
                    instance_name,
                    port,
                    count,
                })
                .collect(),
            top_ports,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.total_applications == 0
    }
}

/// Key with the highest count. Iteration is in key order and only a strictly
/// greater count replaces the current best, so ties keep the smallest key.
fn max_by_count(counts: &BTreeMap<String, usize>) -> Option<String> {
    let mut best: Option<(&String, usize)> = None;
    for (key, &count) in counts {
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((key, count)),
        }
    }
    best.map(|(key, _)| key.clone())
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
