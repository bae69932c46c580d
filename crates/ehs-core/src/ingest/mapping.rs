use super::parser::{ProjectRow, ReportRow};
use super::ImportError;
use crate::analytics::domain::{MetricRecord, Project, ProjectId, ProjectStatus};
use std::collections::HashSet;

/// Applies the absent-means-zero policy and the period rules to parsed rows.
pub(crate) fn records_from_rows(
    rows: Vec<(usize, ReportRow)>,
) -> Result<Vec<MetricRecord>, ImportError> {
    let mut seen: HashSet<(ProjectId, i32, u32)> = HashSet::new();
    let mut records = Vec::with_capacity(rows.len());

    for (line, row) in rows {
        if !(1..=12).contains(&row.report_month) {
            return Err(ImportError::InvalidMonth {
                line,
                month: row.report_month,
            });
        }

        let project_id = ProjectId(row.project_id);
        if !seen.insert((project_id, row.report_year, row.report_month)) {
            return Err(ImportError::DuplicateReport {
                project_id,
                year: row.report_year,
                month: row.report_month,
            });
        }

        records.push(MetricRecord {
            project_id,
            report_month: row.report_month,
            report_year: row.report_year,
            first_aid_cases: row.first_aid_cases.unwrap_or_default(),
            near_miss_cases: row.near_miss_cases.unwrap_or_default(),
            ptw_issued: row.ptw_issued.unwrap_or_default(),
            ptw_closed: row.ptw_closed.unwrap_or_default(),
            training_sessions: row.training_sessions.unwrap_or_default(),
            tbt_sessions: row.tbt_sessions.unwrap_or_default(),
            man_hours: row.man_hours.unwrap_or_default(),
            cumulative_man_hours: row.cumulative_man_hours.unwrap_or_default(),
        });
    }

    Ok(records)
}

pub(crate) fn projects_from_rows(rows: Vec<(usize, ProjectRow)>) -> Vec<Project> {
    rows.into_iter()
        .map(|(_, row)| Project {
            id: ProjectId(row.id),
            name: row.name,
            status: ProjectStatus::parse(row.status.as_deref().unwrap_or_default()),
        })
        .collect()
}
