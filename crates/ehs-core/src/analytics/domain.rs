use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    #[serde(untagged)]
    Other(String),
}

impl ProjectStatus {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("active") {
            Self::Active
        } else {
            Self::Other(trimmed.to_ascii_lowercase())
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub status: ProjectStatus,
}

impl Project {
    pub fn active(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ProjectId(id),
            name: name.into(),
            status: ProjectStatus::Active,
        }
    }
}

/// Calendar month a report covers. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub year: i32,
    pub month: u32,
}

impl ReportPeriod {
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn quarter(self) -> Quarter {
        Quarter::of_month(self.month)
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const fn ordered() -> [Self; 4] {
        [Self::Q1, Self::Q2, Self::Q3, Self::Q4]
    }

    /// Months past 9 (including anything out of range) land in Q4.
    pub const fn of_month(month: u32) -> Self {
        match month {
            1..=3 => Self::Q1,
            4..=6 => Self::Q2,
            7..=9 => Self::Q3,
            _ => Self::Q4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
        }
    }
}

/// One project's monthly safety-activity report.
///
/// Counters missing from the input deserialize as zero; scoring never sees an
/// absent value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub project_id: ProjectId,
    pub report_month: u32,
    pub report_year: i32,
    #[serde(default)]
    pub first_aid_cases: u32,
    #[serde(default)]
    pub near_miss_cases: u32,
    #[serde(default)]
    pub ptw_issued: u32,
    #[serde(default)]
    pub ptw_closed: u32,
    #[serde(default)]
    pub training_sessions: u32,
    #[serde(default)]
    pub tbt_sessions: u32,
    #[serde(default)]
    pub man_hours: f64,
    #[serde(default)]
    pub cumulative_man_hours: f64,
}

impl MetricRecord {
    /// Empty report for a project/month; every counter starts at zero.
    pub fn new(project_id: ProjectId, year: i32, month: u32) -> Self {
        Self {
            project_id,
            report_month: month,
            report_year: year,
            first_aid_cases: 0,
            near_miss_cases: 0,
            ptw_issued: 0,
            ptw_closed: 0,
            training_sessions: 0,
            tbt_sessions: 0,
            man_hours: 0.0,
            cumulative_man_hours: 0.0,
        }
    }

    pub fn period(&self) -> ReportPeriod {
        ReportPeriod::new(self.report_year, self.report_month)
    }

    pub fn incidents(&self) -> u64 {
        u64::from(self.first_aid_cases) + u64::from(self.near_miss_cases)
    }

    /// Permits issued but not yet closed; never negative.
    pub fn open_permits(&self) -> u32 {
        self.ptw_issued.saturating_sub(self.ptw_closed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SafetyStatus {
    Good,
    Medium,
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "No Data")]
    NoData,
}

impl SafetyStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Medium => "Medium",
            Self::HighRisk => "High Risk",
            Self::NoData => "No Data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// Sort key for listings: most severe first.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Critical => "red",
            Self::High => "orange",
            Self::Medium => "yellow",
            Self::Low => "green",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}
