use super::domain::{ProjectId, Quarter, RiskLevel, SafetyStatus};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyScore {
    pub month: u32,
    pub year: i32,
    pub score: u8,
}

/// Leaderboard row. `score`/`rank` stay `None` for projects with no reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSafetyScore {
    pub project_id: ProjectId,
    pub project_name: String,
    pub score: Option<u8>,
    pub status: SafetyStatus,
    pub reports_count: usize,
    pub monthly_scores: Vec<MonthlyScore>,
    pub rank: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyLeaderboard {
    pub overall_average: u8,
    pub projects: Vec<ProjectSafetyScore>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub month: u32,
    pub year: i32,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreTrend {
    pub trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentHeatmap {
    pub year: i32,
    pub heatmap: BTreeMap<String, [u64; 12]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskClassificationEntry {
    pub project_id: ProjectId,
    pub project_name: String,
    pub report_count: usize,
    pub total_first_aid: u64,
    pub total_near_miss: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_incidents_month: Option<u64>,
    pub avg_incidents_per_month: f64,
    pub avg_safety_score: i64,
    pub risk_level: RiskLevel,
    pub risk_color: &'static str,
}

/// Sums over a slice of reports, shared by the KPI, quarterly, yearly and
/// summary views.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricTotals {
    pub total_projects: usize,
    pub report_count: usize,
    pub total_tbt: u64,
    pub total_training: u64,
    pub total_first_aid: u64,
    pub total_near_miss: u64,
    pub total_ptw_issued: u64,
    pub total_ptw_closed: u64,
    pub total_man_hours: f64,
    pub avg_safety_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterTotals {
    pub quarter: Quarter,
    #[serde(flatten)]
    pub totals: MetricTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTotals {
    pub report_year: i32,
    #[serde(flatten)]
    pub totals: MetricTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectPerformance {
    pub project_id: ProjectId,
    pub name: String,
    pub safety_score: f64,
    pub total_incidents: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagementSummary {
    pub period: String,
    pub statistics: MetricTotals,
    pub top_performers: Vec<ProjectPerformance>,
    pub risk_projects: Vec<ProjectPerformance>,
    pub generated_at: NaiveDateTime,
}
