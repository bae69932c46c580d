use chrono::{Local, NaiveDateTime};
use ehs_core::analytics::{Clock, MetricFilter, MetricRecord, MetricSource, Project, SourceError};
use ehs_core::config::DataConfig;
use ehs_core::ingest::{ImportError, MetricCsvImporter};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Snapshot of the portal's reports and projects held in memory.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMetricSource {
    projects: Arc<Mutex<Vec<Project>>>,
    records: Arc<Mutex<Vec<MetricRecord>>>,
}

impl InMemoryMetricSource {
    pub(crate) fn new(projects: Vec<Project>, records: Vec<MetricRecord>) -> Self {
        Self {
            projects: Arc::new(Mutex::new(projects)),
            records: Arc::new(Mutex::new(records)),
        }
    }

    /// Loads whichever CSV exports are configured; unset paths contribute nothing.
    pub(crate) fn from_csv(data: &DataConfig) -> Result<Self, ImportError> {
        let projects = match &data.projects_csv {
            Some(path) => MetricCsvImporter::projects_from_path(path)?,
            None => Vec::new(),
        };
        let records = match &data.reports_csv {
            Some(path) => MetricCsvImporter::records_from_path(path)?,
            None => Vec::new(),
        };
        info!(
            projects = projects.len(),
            reports = records.len(),
            "metric source loaded"
        );
        Ok(Self::new(projects, records))
    }
}

impl MetricSource for InMemoryMetricSource {
    fn list_metric_records(
        &self,
        filter: &MetricFilter,
    ) -> Result<Vec<MetricRecord>, SourceError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| SourceError::Unavailable("report store lock poisoned".to_string()))?;
        Ok(guard
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    fn list_projects(&self) -> Result<Vec<Project>, SourceError> {
        let guard = self
            .projects
            .lock()
            .map_err(|_| SourceError::Unavailable("project store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }
}

/// Wall clock in the server's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
