use super::domain::{MetricRecord, Project, ProjectId};
use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Narrows a report query. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricFilter {
    pub project_id: Option<ProjectId>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl MetricFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn project(project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            ..Self::default()
        }
    }

    pub fn year(year: i32) -> Self {
        Self {
            year: Some(year),
            ..Self::default()
        }
    }

    pub fn period(year: i32, month: u32) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &MetricRecord) -> bool {
        self.project_id.map_or(true, |id| record.project_id == id)
            && self.year.map_or(true, |year| record.report_year == year)
            && self.month.map_or(true, |month| record.report_month == month)
    }
}

/// Read-only feed of monthly reports and projects.
pub trait MetricSource: Send + Sync {
    fn list_metric_records(&self, filter: &MetricFilter)
        -> Result<Vec<MetricRecord>, SourceError>;
    fn list_projects(&self) -> Result<Vec<Project>, SourceError>;

    fn list_active_projects(&self) -> Result<Vec<Project>, SourceError> {
        Ok(self
            .list_projects()?
            .into_iter()
            .filter(|project| project.status.is_active())
            .collect())
    }
}

/// Error enumeration for data source failures.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("metric source unavailable: {0}")]
    Unavailable(String),
    #[error("metric query failed: {0}")]
    Query(String),
}

/// Supplies "now" for current-period defaults.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    fn current_year(&self) -> i32 {
        self.today().year()
    }
}
