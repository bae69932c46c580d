use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::domain::{ProjectId, ReportPeriod};
use super::repository::{Clock, MetricSource, SourceError};
use super::service::SafetyAnalyticsService;

type SharedService<S, C> = Arc<SafetyAnalyticsService<S, C>>;

/// Router builder exposing the read-only analytics endpoints.
pub fn analytics_router<S, C>(service: SharedService<S, C>) -> Router
where
    S: MetricSource + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route(
            "/api/v1/analytics/safety-scores",
            get(safety_scores_handler::<S, C>),
        )
        .route(
            "/api/v1/analytics/safety-scores/trend",
            get(portfolio_trend_handler::<S, C>),
        )
        .route(
            "/api/v1/analytics/safety-scores/project/:project_id",
            get(project_trend_handler::<S, C>),
        )
        .route(
            "/api/v1/analytics/management/yearly-comparison",
            get(yearly_comparison_handler::<S, C>),
        )
        .route(
            "/api/v1/analytics/management/quarterly",
            get(quarterly_handler::<S, C>),
        )
        .route(
            "/api/v1/analytics/management/incident-heatmap",
            get(heatmap_handler::<S, C>),
        )
        .route(
            "/api/v1/analytics/management/risk-classification",
            get(risk_handler::<S, C>),
        )
        .route(
            "/api/v1/analytics/management/summary",
            get(summary_handler::<S, C>),
        )
        .route("/api/v1/analytics/kpi", get(kpi_handler::<S, C>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PeriodQuery {
    pub(crate) month: Option<u32>,
    pub(crate) year: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WindowQuery {
    pub(crate) months: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct YearsQuery {
    pub(crate) years: Option<String>,
}

pub(crate) async fn safety_scores_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Query(query): Query<PeriodQuery>,
) -> Response
where
    S: MetricSource + 'static,
    C: Clock + 'static,
{
    if let Err(response) = validate_month(query.month) {
        return response;
    }
    let period = match (query.year, query.month) {
        (Some(year), Some(month)) => Some(ReportPeriod::new(year, month)),
        _ => None,
    };
    respond(service.safety_scores(period))
}

pub(crate) async fn portfolio_trend_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Query(query): Query<WindowQuery>,
) -> Response
where
    S: MetricSource + 'static,
    C: Clock + 'static,
{
    respond(service.portfolio_trend(query.months))
}

pub(crate) async fn project_trend_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Path(project_id): Path<u64>,
    Query(query): Query<WindowQuery>,
) -> Response
where
    S: MetricSource + 'static,
    C: Clock + 'static,
{
    respond(service.project_trend(ProjectId(project_id), query.months))
}

pub(crate) async fn yearly_comparison_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Query(query): Query<YearsQuery>,
) -> Response
where
    S: MetricSource + 'static,
    C: Clock + 'static,
{
    let years = match query.years.as_deref().map(parse_years).transpose() {
        Ok(years) => years.filter(|years| !years.is_empty()),
        Err(raw) => return bad_request(format!("invalid year `{raw}`")),
    };
    respond(service.yearly_comparison(years))
}

pub(crate) async fn quarterly_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Query(query): Query<PeriodQuery>,
) -> Response
where
    S: MetricSource + 'static,
    C: Clock + 'static,
{
    respond(service.quarterly(query.year))
}

pub(crate) async fn heatmap_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Query(query): Query<PeriodQuery>,
) -> Response
where
    S: MetricSource + 'static,
    C: Clock + 'static,
{
    respond(service.heatmap(query.year))
}

pub(crate) async fn risk_handler<S, C>(State(service): State<SharedService<S, C>>) -> Response
where
    S: MetricSource + 'static,
    C: Clock + 'static,
{
    respond(service.risk_classification())
}

pub(crate) async fn summary_handler<S, C>(
    State(service): State<SharedService<S, C>>,
    Query(query): Query<PeriodQuery>,
) -> Response
where
    S: MetricSource + 'static,
    C: Clock + 'static,
{
    if let Err(response) = validate_month(query.month) {
        return response;
    }
    respond(service.summary(query.year, query.month))
}

pub(crate) async fn kpi_handler<S, C>(State(service): State<SharedService<S, C>>) -> Response
where
    S: MetricSource + 'static,
    C: Clock + 'static,
{
    respond(service.kpi_totals())
}

/// Parses a comma separated year list, returning the first bad token on failure.
pub(crate) fn parse_years(raw: &str) -> Result<Vec<i32>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<i32>().map_err(|_| token.to_string()))
        .collect()
}

fn validate_month(month: Option<u32>) -> Result<(), Response> {
    match month {
        Some(month) if !(1..=12).contains(&month) => {
            Err(bad_request(format!("month {month} is outside 1..=12")))
        }
        _ => Ok(()),
    }
}

fn respond<T: Serialize>(result: Result<T, SourceError>) -> Response {
    match result {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => source_error_response(error),
    }
}

fn bad_request(message: String) -> Response {
    let payload = json!({
        "error": message,
    });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

pub(crate) fn source_error_response(error: SourceError) -> Response {
    warn!(error = %error, "analytics request failed");
    let status = match error {
        SourceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        SourceError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
