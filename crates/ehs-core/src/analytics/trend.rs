use super::domain::{MetricRecord, ProjectId, ReportPeriod};
use super::score::{clamp_score, raw_score, rounded_mean, score};
use super::views::TrendPoint;
use std::collections::BTreeMap;

pub const DEFAULT_PROJECT_WINDOW: usize = 6;
pub const DEFAULT_PORTFOLIO_WINDOW: usize = 12;

/// The most recent `window` reports of one project, oldest first.
pub fn project_trend(
    records: &[MetricRecord],
    project_id: ProjectId,
    window: usize,
) -> Vec<TrendPoint> {
    let mut selected: Vec<&MetricRecord> = records
        .iter()
        .filter(|record| record.project_id == project_id)
        .collect();
    selected.sort_by(|a, b| b.period().cmp(&a.period()));

    let mut trend: Vec<TrendPoint> = selected
        .into_iter()
        .take(window)
        .map(|record| TrendPoint {
            month: record.report_month,
            year: record.report_year,
            score: score(record),
        })
        .collect();
    trend.reverse();
    trend
}

/// Portfolio-wide monthly score for the latest `window` months that have data.
///
/// Each month averages the unclamped per-record scores and only then clamps,
/// so `[120, 40]` yields 80 rather than `(100 + 40) / 2`.
pub fn portfolio_trend(records: &[MetricRecord], window: usize) -> Vec<TrendPoint> {
    let mut months: BTreeMap<ReportPeriod, Vec<i64>> = BTreeMap::new();
    for record in records {
        months
            .entry(record.period())
            .or_default()
            .push(raw_score(record));
    }

    let mut trend: Vec<TrendPoint> = months
        .into_iter()
        .rev()
        .take(window)
        .filter_map(|(period, raw_scores)| {
            rounded_mean(raw_scores).map(|average| TrendPoint {
                month: period.month,
                year: period.year,
                score: clamp_score(average),
            })
        })
        .collect();
    trend.reverse();
    trend
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(project: u64, year: i32, month: u32) -> MetricRecord {
        MetricRecord::new(ProjectId(project), year, month)
    }

    #[test]
    fn project_trend_keeps_latest_window_in_chronological_order() {
        let mut records = Vec::new();
        for month in 1..=9 {
            let mut record = report(1, 2025, month);
            record.first_aid_cases = month;
            records.push(record);
        }
        records.push(report(2, 2025, 10));

        let trend = project_trend(&records, ProjectId(1), 3);
        let points: Vec<(u32, u8)> = trend.iter().map(|p| (p.month, p.score)).collect();
        assert_eq!(points, vec![(7, 86), (8, 84), (9, 82)]);
    }

    #[test]
    fn project_trend_crosses_year_boundaries() {
        let records = vec![report(1, 2025, 1), report(1, 2024, 12), report(1, 2024, 11)];
        let trend = project_trend(&records, ProjectId(1), 2);
        let periods: Vec<(i32, u32)> = trend.iter().map(|p| (p.year, p.month)).collect();
        assert_eq!(periods, vec![(2024, 12), (2025, 1)]);
    }

    #[test]
    fn project_trend_for_unknown_project_is_empty() {
        let records = vec![report(1, 2025, 1)];
        assert!(project_trend(&records, ProjectId(99), 6).is_empty());
        assert!(project_trend(&records, ProjectId(1), 0).is_empty());
    }

    #[test]
    fn portfolio_trend_averages_before_clamping() {
        let mut strong = report(1, 2025, 4);
        strong.training_sessions = 10;
        let mut weak = report(2, 2025, 4);
        weak.first_aid_cases = 30;
        assert_eq!(raw_score(&strong), 120);
        assert_eq!(raw_score(&weak), 40);

        let trend = portfolio_trend(&[strong, weak], 12);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].score, 80);
    }

    #[test]
    fn portfolio_trend_clamps_the_group_mean() {
        let mut a = report(1, 2025, 1);
        a.training_sessions = 40;
        let mut b = report(2, 2025, 1);
        b.near_miss_cases = 60;
        let trend = portfolio_trend(&[a.clone(), a, b.clone(), b.clone(), b], 12);
        // (180 + 180 - 80 - 80 - 80) / 5 = 24
        assert_eq!(trend[0].score, 24);

        let mut c = report(1, 2025, 2);
        c.near_miss_cases = 60;
        assert_eq!(portfolio_trend(&[c], 12)[0].score, 0);
    }

    #[test]
    fn portfolio_trend_windows_on_distinct_months() {
        let records = vec![
            report(1, 2024, 11),
            report(1, 2024, 12),
            report(2, 2024, 12),
            report(1, 2025, 1),
            report(2, 2025, 1),
        ];
        let trend = portfolio_trend(&records, 2);
        let periods: Vec<(i32, u32)> = trend.iter().map(|p| (p.year, p.month)).collect();
        assert_eq!(periods, vec![(2024, 12), (2025, 1)]);
    }
}
