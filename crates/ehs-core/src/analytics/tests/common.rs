use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::analytics::domain::{MetricRecord, Project, ProjectId, ProjectStatus};
use crate::analytics::repository::{Clock, MetricFilter, MetricSource, SourceError};
use crate::analytics::{analytics_router, SafetyAnalyticsService};

pub(super) fn generated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 7, 1)
        .expect("valid date")
        .and_hms_opt(8, 30, 0)
        .expect("valid time")
}

pub(super) fn projects() -> Vec<Project> {
    vec![
        Project::active(2, "Bridge Works"),
        Project::active(1, "Alpha Tower"),
        Project::active(3, "Canal Depot"),
        Project {
            id: ProjectId(4),
            name: "Dock Yard".to_string(),
            status: ProjectStatus::parse("completed"),
        },
    ]
}

/// Five reports across two years.
///
/// Alpha Tower scores 100 (raw 105), 100, 98; Bridge Works scores 60 in June
/// with 15 incidents; Canal Depot never reports; Dock Yard is inactive.
pub(super) fn records() -> Vec<MetricRecord> {
    let mut alpha_nov = MetricRecord::new(ProjectId(1), 2024, 11);
    alpha_nov.tbt_sessions = 5;

    let alpha_may = MetricRecord::new(ProjectId(1), 2025, 5);

    let mut alpha_june = MetricRecord::new(ProjectId(1), 2025, 6);
    alpha_june.first_aid_cases = 1;
    alpha_june.man_hours = 1_200.0;

    let mut bridge_june = MetricRecord::new(ProjectId(2), 2025, 6);
    bridge_june.first_aid_cases = 5;
    bridge_june.near_miss_cases = 10;
    bridge_june.man_hours = 800.0;

    let dock_june = MetricRecord::new(ProjectId(4), 2025, 6);

    vec![alpha_nov, alpha_may, alpha_june, bridge_june, dock_june]
}

#[derive(Default, Clone)]
pub(super) struct MemorySource {
    projects: Arc<Mutex<Vec<Project>>>,
    records: Arc<Mutex<Vec<MetricRecord>>>,
}

impl MemorySource {
    pub(super) fn with(projects: Vec<Project>, records: Vec<MetricRecord>) -> Self {
        Self {
            projects: Arc::new(Mutex::new(projects)),
            records: Arc::new(Mutex::new(records)),
        }
    }
}

impl MetricSource for MemorySource {
    fn list_metric_records(
        &self,
        filter: &MetricFilter,
    ) -> Result<Vec<MetricRecord>, SourceError> {
        let guard = self.records.lock().expect("source mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    fn list_projects(&self) -> Result<Vec<Project>, SourceError> {
        Ok(self.projects.lock().expect("source mutex poisoned").clone())
    }
}

pub(super) struct UnavailableSource;

impl MetricSource for UnavailableSource {
    fn list_metric_records(
        &self,
        _filter: &MetricFilter,
    ) -> Result<Vec<MetricRecord>, SourceError> {
        Err(SourceError::Unavailable("database offline".to_string()))
    }

    fn list_projects(&self) -> Result<Vec<Project>, SourceError> {
        Err(SourceError::Unavailable("database offline".to_string()))
    }
}

/// Projects load fine; report queries fail.
pub(super) struct BrokenQuerySource;

impl MetricSource for BrokenQuerySource {
    fn list_metric_records(
        &self,
        _filter: &MetricFilter,
    ) -> Result<Vec<MetricRecord>, SourceError> {
        Err(SourceError::Query("syntax error near `FROM`".to_string()))
    }

    fn list_projects(&self) -> Result<Vec<Project>, SourceError> {
        Ok(projects())
    }
}

pub(super) struct FixedClock(pub(super) NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub(super) fn build_service() -> SafetyAnalyticsService<MemorySource, FixedClock> {
    SafetyAnalyticsService::new(
        Arc::new(MemorySource::with(projects(), records())),
        Arc::new(FixedClock(generated_at())),
    )
}

pub(super) fn service_with<S: MetricSource + 'static>(
    source: S,
) -> SafetyAnalyticsService<S, FixedClock> {
    SafetyAnalyticsService::new(Arc::new(source), Arc::new(FixedClock(generated_at())))
}

pub(super) fn router_with_service<S: MetricSource + 'static>(
    service: SafetyAnalyticsService<S, FixedClock>,
) -> axum::Router {
    analytics_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
