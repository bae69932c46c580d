use super::aggregate::group_by_project;
use super::domain::{MetricRecord, Project, ProjectId};
use super::score::{mean, score};
use super::views::{ManagementSummary, MetricTotals, ProjectPerformance};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

pub const TOP_PERFORMER_LIMIT: usize = 5;
pub const RISK_PROJECT_LIMIT: usize = 5;
pub const RISK_SCORE_THRESHOLD: f64 = 70.0;

/// A calendar year, optionally narrowed to one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryPeriod {
    pub year: i32,
    pub month: Option<u32>,
}

impl SummaryPeriod {
    pub fn year(year: i32) -> Self {
        Self { year, month: None }
    }

    pub fn month(year: i32, month: u32) -> Self {
        Self {
            year,
            month: Some(month),
        }
    }

    pub fn contains(&self, record: &MetricRecord) -> bool {
        record.report_year == self.year
            && self.month.map_or(true, |month| record.report_month == month)
    }

    pub fn label(&self) -> String {
        match self.month {
            Some(month) => format!("{}/{}", month, self.year),
            None => self.year.to_string(),
        }
    }
}

/// Executive snapshot for one period.
///
/// `statistics` covers every in-period report; the project lists only cover
/// reports whose project the source knows.
pub fn management_summary(
    projects: &[Project],
    records: &[MetricRecord],
    period: SummaryPeriod,
    generated_at: NaiveDateTime,
) -> ManagementSummary {
    let in_period: Vec<&MetricRecord> = records
        .iter()
        .filter(|record| period.contains(record))
        .collect();

    let statistics = MetricTotals::from_records(in_period.iter().copied());
    let performance = project_performance(projects, &in_period);

    let mut top_performers = performance.clone();
    top_performers.sort_by(|a, b| b.safety_score.total_cmp(&a.safety_score));
    top_performers.truncate(TOP_PERFORMER_LIMIT);

    let mut risk_projects: Vec<ProjectPerformance> = performance
        .into_iter()
        .filter(|entry| entry.safety_score < RISK_SCORE_THRESHOLD)
        .collect();
    risk_projects.sort_by(|a, b| a.safety_score.total_cmp(&b.safety_score));
    risk_projects.truncate(RISK_PROJECT_LIMIT);

    ManagementSummary {
        period: period.label(),
        statistics,
        top_performers,
        risk_projects,
        generated_at,
    }
}

fn project_performance(
    projects: &[Project],
    records: &[&MetricRecord],
) -> Vec<ProjectPerformance> {
    let names: HashMap<ProjectId, &str> = projects
        .iter()
        .map(|project| (project.id, project.name.as_str()))
        .collect();

    group_by_project(records.iter().copied())
        .into_iter()
        .filter_map(|(project_id, bucket)| {
            let Some(name) = names.get(&project_id) else {
                warn!(%project_id, "summary skipped reports for unknown project");
                return None;
            };
            let safety_score = mean(bucket.iter().map(|record| i64::from(score(record))))?;
            Some(ProjectPerformance {
                project_id,
                name: (*name).to_string(),
                safety_score,
                total_incidents: bucket.iter().map(|record| record.incidents()).sum(),
            })
        })
        .collect()
}
