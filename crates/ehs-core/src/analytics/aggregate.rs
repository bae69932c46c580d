use super::domain::{MetricRecord, Project, ProjectId, Quarter, RiskLevel, SafetyStatus};
use super::score::{mean, rounded_mean, score};
use super::views::{
    MetricTotals, MonthlyScore, ProjectSafetyScore, QuarterTotals, RiskClassificationEntry,
    YearTotals,
};
use std::collections::{BTreeMap, BTreeSet};

pub const GOOD_THRESHOLD: i64 = 80;
pub const MEDIUM_THRESHOLD: i64 = 50;

/// Risk view score for a project with no reports. The leaderboard reports
/// "No Data" for the same project.
pub const RISK_DEFAULT_SCORE: f64 = 100.0;

pub fn classify_status(average: i64) -> SafetyStatus {
    if average >= GOOD_THRESHOLD {
        SafetyStatus::Good
    } else if average >= MEDIUM_THRESHOLD {
        SafetyStatus::Medium
    } else {
        SafetyStatus::HighRisk
    }
}

/// Reports bucketed by project, each bucket in source order.
pub fn group_by_project<'a, I>(records: I) -> BTreeMap<ProjectId, Vec<&'a MetricRecord>>
where
    I: IntoIterator<Item = &'a MetricRecord>,
{
    let mut grouped: BTreeMap<ProjectId, Vec<&'a MetricRecord>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.project_id).or_default().push(record);
    }
    grouped
}

pub fn project_safety_score(project: &Project, records: &[&MetricRecord]) -> ProjectSafetyScore {
    let Some(average) = rounded_mean(records.iter().map(|record| i64::from(score(record))))
    else {
        return ProjectSafetyScore {
            project_id: project.id,
            project_name: project.name.clone(),
            score: None,
            status: SafetyStatus::NoData,
            reports_count: 0,
            monthly_scores: Vec::new(),
            rank: None,
        };
    };

    let mut ordered: Vec<&MetricRecord> = records.to_vec();
    ordered.sort_by_key(|record| record.period());
    let monthly_scores = ordered
        .into_iter()
        .map(|record| MonthlyScore {
            month: record.report_month,
            year: record.report_year,
            score: score(record),
        })
        .collect();

    // Mean of values in [0, 100] stays in range.
    let average = average.clamp(0, 100);

    ProjectSafetyScore {
        project_id: project.id,
        project_name: project.name.clone(),
        score: Some(average as u8),
        status: classify_status(average),
        reports_count: records.len(),
        monthly_scores,
        rank: None,
    }
}

/// One leaderboard row per project, in the order the projects are given.
pub fn project_safety_scores(
    projects: &[Project],
    records: &[MetricRecord],
) -> Vec<ProjectSafetyScore> {
    let grouped = group_by_project(records);
    projects
        .iter()
        .map(|project| {
            let bucket = grouped
                .get(&project.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            project_safety_score(project, bucket)
        })
        .collect()
}

/// First matching tier wins; comparisons are strict.
pub fn classify_risk(avg_incidents_per_month: f64, avg_safety_score: f64) -> RiskLevel {
    if avg_incidents_per_month > 5.0 || avg_safety_score < 50.0 {
        RiskLevel::Critical
    } else if avg_incidents_per_month > 3.0 || avg_safety_score < 70.0 {
        RiskLevel::High
    } else if avg_incidents_per_month > 1.0 || avg_safety_score < 85.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn risk_classification(
    projects: &[Project],
    records: &[MetricRecord],
) -> Vec<RiskClassificationEntry> {
    let grouped = group_by_project(records);
    let mut classified: Vec<RiskClassificationEntry> = projects
        .iter()
        .map(|project| {
            let bucket = grouped
                .get(&project.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            classify_project(project, bucket)
        })
        .collect();

    classified.sort_by_key(|entry| entry.risk_level.rank());
    classified
}

fn classify_project(project: &Project, records: &[&MetricRecord]) -> RiskClassificationEntry {
    let avg_incidents = mean(records.iter().map(|record| record.incidents() as i64)).unwrap_or(0.0);
    let avg_score = mean(records.iter().map(|record| i64::from(score(record))))
        .unwrap_or(RISK_DEFAULT_SCORE);
    let risk_level = classify_risk(avg_incidents, avg_score);

    RiskClassificationEntry {
        project_id: project.id,
        project_name: project.name.clone(),
        report_count: records.len(),
        total_first_aid: records
            .iter()
            .map(|record| u64::from(record.first_aid_cases))
            .sum(),
        total_near_miss: records
            .iter()
            .map(|record| u64::from(record.near_miss_cases))
            .sum(),
        max_incidents_month: records.iter().map(|record| record.incidents()).max(),
        avg_incidents_per_month: (avg_incidents * 100.0).round() / 100.0,
        avg_safety_score: avg_score.round() as i64,
        risk_level,
        risk_color: risk_level.color(),
    }
}

impl MetricTotals {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a MetricRecord>,
    {
        let mut totals = MetricTotals::default();
        let mut projects = BTreeSet::new();
        let mut score_sum: i64 = 0;

        for record in records {
            projects.insert(record.project_id);
            totals.report_count += 1;
            totals.total_tbt += u64::from(record.tbt_sessions);
            totals.total_training += u64::from(record.training_sessions);
            totals.total_first_aid += u64::from(record.first_aid_cases);
            totals.total_near_miss += u64::from(record.near_miss_cases);
            totals.total_ptw_issued += u64::from(record.ptw_issued);
            totals.total_ptw_closed += u64::from(record.ptw_closed);
            totals.total_man_hours += record.man_hours;
            score_sum += i64::from(score(record));
        }

        totals.total_projects = projects.len();
        if totals.report_count > 0 {
            totals.avg_safety_score = Some(score_sum as f64 / totals.report_count as f64);
        }
        totals
    }
}

/// Quarters of `year` that have at least one report, Q1 first.
pub fn quarterly(records: &[MetricRecord], year: i32) -> Vec<QuarterTotals> {
    let mut buckets: BTreeMap<Quarter, Vec<&MetricRecord>> = BTreeMap::new();
    for record in records.iter().filter(|record| record.report_year == year) {
        buckets.entry(record.period().quarter()).or_default().push(record);
    }

    buckets
        .into_iter()
        .map(|(quarter, bucket)| QuarterTotals {
            quarter,
            totals: MetricTotals::from_records(bucket),
        })
        .collect()
}

/// Requested years that have reports, ascending.
pub fn yearly_comparison(records: &[MetricRecord], years: &[i32]) -> Vec<YearTotals> {
    let wanted: BTreeSet<i32> = years.iter().copied().collect();
    let mut buckets: BTreeMap<i32, Vec<&MetricRecord>> = BTreeMap::new();
    for record in records
        .iter()
        .filter(|record| wanted.contains(&record.report_year))
    {
        buckets.entry(record.report_year).or_default().push(record);
    }

    buckets
        .into_iter()
        .map(|(report_year, bucket)| YearTotals {
            report_year,
            totals: MetricTotals::from_records(bucket),
        })
        .collect()
}
