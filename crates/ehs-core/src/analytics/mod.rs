//! Safety score and risk classification over monthly EHS reports.
//!
//! Builders in this module are pure: they take a snapshot of reports and
//! projects and return serializable views. [`SafetyAnalyticsService`] fetches
//! the snapshot through a [`MetricSource`] and [`analytics_router`] exposes the
//! service over HTTP.

pub mod aggregate;
pub mod domain;
pub mod heatmap;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod score;
pub mod service;
pub mod summary;
pub mod trend;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    MetricRecord, Project, ProjectId, ProjectStatus, Quarter, ReportPeriod, RiskLevel,
    SafetyStatus,
};
pub use repository::{Clock, MetricFilter, MetricSource, SourceError};
pub use router::analytics_router;
pub use service::SafetyAnalyticsService;
pub use summary::SummaryPeriod;
pub use views::{
    IncidentHeatmap, ManagementSummary, MetricTotals, MonthlyScore, ProjectPerformance,
    ProjectSafetyScore, QuarterTotals, RiskClassificationEntry, SafetyLeaderboard, ScoreTrend,
    TrendPoint, YearTotals,
};
