use super::domain::{MetricRecord, Project, ProjectId};
use super::views::IncidentHeatmap;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Project name to twelve monthly incident counts (index 0 is January).
///
/// Only projects with at least one report in `year` get a row. Reports for
/// projects the source does not know about are dropped.
pub fn incident_heatmap(
    projects: &[Project],
    records: &[MetricRecord],
    year: i32,
) -> IncidentHeatmap {
    let names: HashMap<ProjectId, &str> = projects
        .iter()
        .map(|project| (project.id, project.name.as_str()))
        .collect();

    let mut heatmap: BTreeMap<String, [u64; 12]> = BTreeMap::new();
    for record in records.iter().filter(|record| record.report_year == year) {
        let Some(name) = names.get(&record.project_id) else {
            warn!(project_id = %record.project_id, "report references unknown project");
            continue;
        };
        let Some(slot) = month_index(record.report_month) else {
            warn!(
                project_id = %record.project_id,
                month = record.report_month,
                "report month out of range"
            );
            continue;
        };

        let row = heatmap.entry((*name).to_string()).or_insert([0; 12]);
        row[slot] = record.incidents();
    }

    IncidentHeatmap { year, heatmap }
}

fn month_index(month: u32) -> Option<usize> {
    (1..=12).contains(&month).then(|| month as usize - 1)
}
