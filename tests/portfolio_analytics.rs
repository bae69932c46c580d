use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{NaiveDate, NaiveDateTime};
use ehs_core::analytics::{
    analytics_router, Clock, MetricFilter, MetricRecord, MetricSource, Project,
    SafetyAnalyticsService, SourceError,
};
use ehs_core::ingest::MetricCsvImporter;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct ExportSource {
    projects: Vec<Project>,
    records: Vec<MetricRecord>,
}

impl ExportSource {
    fn load() -> Self {
        let projects = MetricCsvImporter::projects_from_reader(
            &include_bytes!("../crates/ehs-core/fixtures/projects.csv")[..],
        )
        .expect("projects import");
        let records = MetricCsvImporter::records_from_reader(
            &include_bytes!("../crates/ehs-core/fixtures/monthly_reports.csv")[..],
        )
        .expect("reports import");
        Self { projects, records }
    }
}

impl MetricSource for ExportSource {
    fn list_metric_records(
        &self,
        filter: &MetricFilter,
    ) -> Result<Vec<MetricRecord>, SourceError> {
        Ok(self
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    fn list_projects(&self) -> Result<Vec<Project>, SourceError> {
        Ok(self.projects.clone())
    }
}

struct AprilClock;

impl Clock for AprilClock {
    fn now(&self) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 2)
            .expect("valid date")
            .and_hms_opt(9, 0, 0)
            .expect("valid time")
    }
}

fn router() -> axum::Router {
    let service = SafetyAnalyticsService::new(Arc::new(ExportSource::load()), Arc::new(AprilClock));
    analytics_router(Arc::new(service))
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let response = router()
        .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
        .await
        .expect("route executes");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&body).expect("json payload"))
}

#[tokio::test]
async fn leaderboard_for_a_month_lists_reporting_projects_only() {
    let (status, payload) = get_json("/api/v1/analytics/safety-scores?month=2&year=2025").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = payload["projects"]
        .as_array()
        .expect("project list")
        .iter()
        .filter_map(|row| row["project_name"].as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "River View Project",
            "Ayurvedic College Warehouse",
            "Metro Depot",
        ]
    );
    // February scores: 100, 89, 33
    assert_eq!(payload["overall_average"], json!(74));
    assert_eq!(payload["projects"][2]["status"], json!("High Risk"));
    assert_eq!(payload["projects"][2]["rank"], json!(3));
}

#[tokio::test]
async fn portfolio_trend_and_project_trend() {
    let (_, payload) = get_json("/api/v1/analytics/safety-scores/trend?months=2").await;
    assert_eq!(
        payload["trend"],
        json!([
            { "month": 2, "year": 2025, "score": 77 },
            { "month": 3, "year": 2025, "score": 85 },
        ])
    );

    let (_, payload) = get_json("/api/v1/analytics/safety-scores/project/3").await;
    assert_eq!(
        payload["trend"],
        json!([
            { "month": 2, "year": 2025, "score": 33 },
            { "month": 3, "year": 2025, "score": 63 },
        ])
    );
}

#[tokio::test]
async fn management_views_default_to_the_clock_year() {
    let (_, payload) = get_json("/api/v1/analytics/management/incident-heatmap").await;
    assert_eq!(payload["year"], json!(2025));
    assert_eq!(
        payload["heatmap"]["Ayurvedic College Warehouse"],
        json!([4, 5, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0])
    );

    let (_, payload) = get_json("/api/v1/analytics/management/yearly-comparison").await;
    let years: Vec<i64> = payload
        .as_array()
        .expect("year list")
        .iter()
        .filter_map(|entry| entry["report_year"].as_i64())
        .collect();
    assert_eq!(years, vec![2024, 2025]);

    let (_, payload) = get_json("/api/v1/analytics/management/summary?month=3").await;
    assert_eq!(payload["period"], json!("3/2025"));
    assert_eq!(payload["generated_at"], json!("2025-04-02T09:00:00"));
    assert_eq!(payload["risk_projects"][0]["name"], json!("Metro Depot"));
}

#[tokio::test]
async fn risk_classification_over_http() {
    let (status, payload) = get_json("/api/v1/analytics/management/risk-classification").await;
    assert_eq!(status, StatusCode::OK);

    let tiers: Vec<(&str, &str)> = payload
        .as_array()
        .expect("risk list")
        .iter()
        .map(|entry| {
            (
                entry["project_name"].as_str().unwrap_or_default(),
                entry["risk_color"].as_str().unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(
        tiers,
        vec![
            ("Metro Depot", "red"),
            ("Ayurvedic College Warehouse", "orange"),
            ("River View Project", "green"),
            ("Harbour Substation", "green"),
        ]
    );
    assert!(payload[3].get("max_incidents_month").is_none());
}

#[tokio::test]
async fn kpi_totals_and_bad_queries() {
    let (status, payload) = get_json("/api/v1/analytics/kpi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["report_count"], json!(11));
    assert_eq!(payload["total_projects"], json!(4));
    assert_eq!(payload["total_man_hours"], json!(36200.0));

    let (status, _) = get_json("/api/v1/analytics/management/summary?month=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) =
        get_json("/api/v1/analytics/management/yearly-comparison?years=2025,last").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
