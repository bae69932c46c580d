use std::sync::Arc;

use tracing::debug;

use super::aggregate;
use super::domain::{ProjectId, ReportPeriod};
use super::heatmap::incident_heatmap;
use super::ranking;
use super::repository::{Clock, MetricFilter, MetricSource, SourceError};
use super::summary::{management_summary, SummaryPeriod};
use super::trend;
use super::views::{
    IncidentHeatmap, ManagementSummary, MetricTotals, QuarterTotals, RiskClassificationEntry,
    SafetyLeaderboard, ScoreTrend, YearTotals,
};

/// Service composing the metric source, clock, and the scoring builders.
///
/// Every call takes one snapshot from the source and runs pure builders over
/// it. Source errors come back exactly as the source raised them.
pub struct SafetyAnalyticsService<S, C> {
    source: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> Clone for SafetyAnalyticsService<S, C> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C> SafetyAnalyticsService<S, C>
where
    S: MetricSource + 'static,
    C: Clock + 'static,
{
    pub fn new(source: Arc<S>, clock: Arc<C>) -> Self {
        Self { source, clock }
    }

    pub fn current_year(&self) -> i32 {
        self.clock.current_year()
    }

    /// Ranked leaderboard of active projects, equal scores in project id order.
    ///
    /// Without a period every active project is listed, silent ones as
    /// "No Data". With a period only projects that reported in it are listed.
    pub fn safety_scores(
        &self,
        period: Option<ReportPeriod>,
    ) -> Result<SafetyLeaderboard, SourceError> {
        let filter = match period {
            Some(period) => MetricFilter::period(period.year, period.month),
            None => MetricFilter::all(),
        };

        let mut projects = self.source.list_active_projects()?;
        let records = self.source.list_metric_records(&filter)?;
        debug!(
            projects = projects.len(),
            records = records.len(),
            "computing safety leaderboard"
        );

        projects.sort_by_key(|project| project.id);
        let mut scores = aggregate::project_safety_scores(&projects, &records);
        if period.is_some() {
            scores.retain(|row| row.reports_count > 0);
        }
        Ok(ranking::rank(scores))
    }

    pub fn project_trend(
        &self,
        project_id: ProjectId,
        months: Option<usize>,
    ) -> Result<ScoreTrend, SourceError> {
        let window = months.unwrap_or(trend::DEFAULT_PROJECT_WINDOW);
        let records = self
            .source
            .list_metric_records(&MetricFilter::project(project_id))?;
        debug!(%project_id, records = records.len(), window, "computing project trend");

        Ok(ScoreTrend {
            trend: trend::project_trend(&records, project_id, window),
        })
    }

    pub fn portfolio_trend(&self, months: Option<usize>) -> Result<ScoreTrend, SourceError> {
        let window = months.unwrap_or(trend::DEFAULT_PORTFOLIO_WINDOW);
        let records = self.source.list_metric_records(&MetricFilter::all())?;
        debug!(records = records.len(), window, "computing portfolio trend");

        Ok(ScoreTrend {
            trend: trend::portfolio_trend(&records, window),
        })
    }

    pub fn heatmap(&self, year: Option<i32>) -> Result<IncidentHeatmap, SourceError> {
        let year = year.unwrap_or_else(|| self.current_year());
        let projects = self.source.list_projects()?;
        let records = self.source.list_metric_records(&MetricFilter::year(year))?;
        debug!(year, records = records.len(), "computing incident heatmap");

        Ok(incident_heatmap(&projects, &records, year))
    }

    pub fn risk_classification(&self) -> Result<Vec<RiskClassificationEntry>, SourceError> {
        let projects = self.source.list_active_projects()?;
        let records = self.source.list_metric_records(&MetricFilter::all())?;
        debug!(
            projects = projects.len(),
            records = records.len(),
            "classifying project risk"
        );

        Ok(aggregate::risk_classification(&projects, &records))
    }

    pub fn summary(
        &self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<ManagementSummary, SourceError> {
        let year = year.unwrap_or_else(|| self.current_year());
        let period = match month {
            Some(month) => SummaryPeriod::month(year, month),
            None => SummaryPeriod::year(year),
        };
        let filter = MetricFilter {
            project_id: None,
            year: Some(year),
            month,
        };

        let projects = self.source.list_projects()?;
        let records = self.source.list_metric_records(&filter)?;
        debug!(period = %period.label(), records = records.len(), "building management summary");

        Ok(management_summary(
            &projects,
            &records,
            period,
            self.clock.now(),
        ))
    }

    pub fn quarterly(&self, year: Option<i32>) -> Result<Vec<QuarterTotals>, SourceError> {
        let year = year.unwrap_or_else(|| self.current_year());
        let records = self.source.list_metric_records(&MetricFilter::year(year))?;
        debug!(year, records = records.len(), "computing quarterly analytics");

        Ok(aggregate::quarterly(&records, year))
    }

    /// Defaults to the current and previous calendar year.
    pub fn yearly_comparison(
        &self,
        years: Option<Vec<i32>>,
    ) -> Result<Vec<YearTotals>, SourceError> {
        let years = years.unwrap_or_else(|| {
            let current = self.current_year();
            vec![current, current - 1]
        });
        let records = self.source.list_metric_records(&MetricFilter::all())?;
        debug!(?years, records = records.len(), "computing yearly comparison");

        Ok(aggregate::yearly_comparison(&records, &years))
    }

    pub fn kpi_totals(&self) -> Result<MetricTotals, SourceError> {
        let records = self.source.list_metric_records(&MetricFilter::all())?;
        Ok(MetricTotals::from_records(&records))
    }
}
