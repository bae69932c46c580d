use crate::infra::{InMemoryMetricSource, SystemClock};
use clap::Args;
use ehs_core::analytics::{
    IncidentHeatmap, ManagementSummary, ProjectId, ReportPeriod, RiskClassificationEntry,
    SafetyAnalyticsService, SafetyLeaderboard, ScoreTrend,
};
use ehs_core::config::{AppConfig, DataConfig};
use ehs_core::error::AppError;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

type PortalService = SafetyAnalyticsService<InMemoryMetricSource, SystemClock>;

#[derive(Args, Debug, Default)]
pub(crate) struct DataArgs {
    /// Monthly report CSV export (overrides EHS_REPORTS_CSV)
    #[arg(long)]
    pub(crate) reports_csv: Option<PathBuf>,
    /// Project register CSV export (overrides EHS_PROJECTS_CSV)
    #[arg(long)]
    pub(crate) projects_csv: Option<PathBuf>,
}

impl DataArgs {
    pub(crate) fn resolve(self, configured: DataConfig) -> DataConfig {
        DataConfig {
            reports_csv: self.reports_csv.or(configured.reports_csv),
            projects_csv: self.projects_csv.or(configured.projects_csv),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ScoresArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
    /// Report month (1-12); narrows the leaderboard together with --year
    #[arg(long)]
    pub(crate) month: Option<u32>,
    /// Report year; defaults to the current year when only --month is given
    #[arg(long)]
    pub(crate) year: Option<i32>,
}

#[derive(Args, Debug)]
pub(crate) struct TrendArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
    /// Show a single project instead of the portfolio
    #[arg(long)]
    pub(crate) project: Option<u64>,
    /// Number of most recent months to include
    #[arg(long)]
    pub(crate) months: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct HeatmapArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
    /// Calendar year (defaults to the current year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
}

#[derive(Args, Debug)]
pub(crate) struct RiskArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
}

#[derive(Args, Debug)]
pub(crate) struct SummaryArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
    /// Calendar year (defaults to the current year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Narrow the summary to one month (1-12)
    #[arg(long)]
    pub(crate) month: Option<u32>,
}

pub(crate) fn run_scores(args: ScoresArgs) -> Result<(), AppError> {
    let month = validate_month(args.month)?;
    let service = load_service(args.data)?;
    let period = month.map(|month| {
        ReportPeriod::new(args.year.unwrap_or_else(|| service.current_year()), month)
    });

    let board = service.safety_scores(period)?;
    render_leaderboard(&mut io::stdout().lock(), &board, period)?;
    Ok(())
}

pub(crate) fn run_trend(args: TrendArgs) -> Result<(), AppError> {
    let service = load_service(args.data)?;
    let (title, trend) = match args.project {
        Some(id) => (
            format!("project {id}"),
            service.project_trend(ProjectId(id), args.months)?,
        ),
        None => ("portfolio".to_string(), service.portfolio_trend(args.months)?),
    };

    render_trend(&mut io::stdout().lock(), &title, &trend)?;
    Ok(())
}

pub(crate) fn run_heatmap(args: HeatmapArgs) -> Result<(), AppError> {
    let service = load_service(args.data)?;
    let heatmap = service.heatmap(args.year)?;
    render_heatmap(&mut io::stdout().lock(), &heatmap)?;
    Ok(())
}

pub(crate) fn run_risk(args: RiskArgs) -> Result<(), AppError> {
    let service = load_service(args.data)?;
    let entries = service.risk_classification()?;
    render_risk(&mut io::stdout().lock(), &entries)?;
    Ok(())
}

pub(crate) fn run_summary(args: SummaryArgs) -> Result<(), AppError> {
    let month = validate_month(args.month)?;
    let service = load_service(args.data)?;
    let summary = service.summary(args.year, month)?;
    render_summary(&mut io::stdout().lock(), &summary)?;
    Ok(())
}

fn load_service(data: DataArgs) -> Result<PortalService, AppError> {
    let config = AppConfig::load()?;
    let source = InMemoryMetricSource::from_csv(&data.resolve(config.data))?;
    Ok(SafetyAnalyticsService::new(
        Arc::new(source),
        Arc::new(SystemClock),
    ))
}

pub(crate) fn validate_month(month: Option<u32>) -> Result<Option<u32>, AppError> {
    match month {
        Some(month) if !(1..=12).contains(&month) => Err(AppError::InvalidQuery(format!(
            "month {month} is outside 1..=12"
        ))),
        other => Ok(other),
    }
}

pub(crate) fn render_leaderboard<W: Write>(
    out: &mut W,
    board: &SafetyLeaderboard,
    period: Option<ReportPeriod>,
) -> io::Result<()> {
    match period {
        Some(period) => writeln!(out, "Safety leaderboard for {period}")?,
        None => writeln!(out, "Safety leaderboard (all reports)")?,
    }
    writeln!(out, "Overall average: {}", board.overall_average)?;

    for row in &board.projects {
        let rank = row
            .rank
            .map(|rank| format!("#{rank}"))
            .unwrap_or_else(|| "-".to_string());
        let score = row
            .score
            .map(|score| score.to_string())
            .unwrap_or_else(|| "--".to_string());
        writeln!(
            out,
            "  {:<4} {:<32} {:>3}  {:<9} ({} reports)",
            rank,
            row.project_name,
            score,
            row.status.label(),
            row.reports_count
        )?;
    }
    Ok(())
}

pub(crate) fn render_trend<W: Write>(
    out: &mut W,
    title: &str,
    trend: &ScoreTrend,
) -> io::Result<()> {
    writeln!(out, "Safety score trend ({title})")?;
    if trend.trend.is_empty() {
        writeln!(out, "  no reports")?;
    }
    for point in &trend.trend {
        writeln!(out, "  {:04}-{:02}  {:>3}", point.year, point.month, point.score)?;
    }
    Ok(())
}

pub(crate) fn render_heatmap<W: Write>(out: &mut W, heatmap: &IncidentHeatmap) -> io::Result<()> {
    writeln!(out, "Incident heatmap {}", heatmap.year)?;
    write!(out, "  {:<32}", "Project")?;
    for label in MONTH_LABELS {
        write!(out, " {label:>4}")?;
    }
    writeln!(out)?;

    for (name, months) in &heatmap.heatmap {
        write!(out, "  {name:<32}")?;
        for count in months {
            write!(out, " {count:>4}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub(crate) fn render_risk<W: Write>(
    out: &mut W,
    entries: &[RiskClassificationEntry],
) -> io::Result<()> {
    writeln!(out, "Risk classification")?;
    for entry in entries {
        writeln!(
            out,
            "  [{:<8}] {:<32} {:>6.2} incidents/month  avg score {:>3}  ({} reports)",
            entry.risk_level.label(),
            entry.project_name,
            entry.avg_incidents_per_month,
            entry.avg_safety_score,
            entry.report_count
        )?;
    }
    Ok(())
}

pub(crate) fn render_summary<W: Write>(out: &mut W, summary: &ManagementSummary) -> io::Result<()> {
    let stats = &summary.statistics;
    writeln!(out, "Management summary {}", summary.period)?;
    writeln!(
        out,
        "  {} reports across {} projects | avg score {}",
        stats.report_count,
        stats.total_projects,
        stats
            .avg_safety_score
            .map(|score| format!("{score:.1}"))
            .unwrap_or_else(|| "--".to_string())
    )?;
    writeln!(
        out,
        "  first aid {} | near miss {} | TBT {} | training {} | PTW {}/{} closed | {:.0} man-hours",
        stats.total_first_aid,
        stats.total_near_miss,
        stats.total_tbt,
        stats.total_training,
        stats.total_ptw_closed,
        stats.total_ptw_issued,
        stats.total_man_hours
    )?;

    writeln!(out, "Top performers")?;
    for (index, entry) in summary.top_performers.iter().enumerate() {
        writeln!(out, "  {}. {} ({:.1})", index + 1, entry.name, entry.safety_score)?;
    }
    writeln!(out, "Projects below 70")?;
    if summary.risk_projects.is_empty() {
        writeln!(out, "  none")?;
    }
    for entry in &summary.risk_projects {
        writeln!(
            out,
            "  {} ({:.1}, {} incidents)",
            entry.name, entry.safety_score, entry.total_incidents
        )?;
    }
    writeln!(out, "Generated {}", summary.generated_at.format("%Y-%m-%d %H:%M"))?;
    Ok(())
}
