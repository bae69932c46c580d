use crate::analytics::SourceError;
use crate::config::ConfigError;
use crate::ingest::ImportError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Source(SourceError),
    Import(ImportError),
    InvalidQuery(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Source(err) => write!(f, "data source error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::InvalidQuery(message) => write!(f, "invalid query: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Source(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::InvalidQuery(_) => None,
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidQuery(_) | AppError::Import(_) => StatusCode::BAD_REQUEST,
            AppError::Source(SourceError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Source(SourceError::Query(_))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<SourceError> for AppError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            AppError::InvalidQuery("month 0".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(ImportError::InvalidMonth { line: 4, month: 0 }).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(SourceError::Unavailable("offline".to_string())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::from(SourceError::Query("bad column".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(ConfigError::InvalidPort {
                value: "http".to_string()
            })
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn responses_carry_the_display_text() {
        let response = AppError::InvalidQuery("month 13 is outside 1..=12".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(
            payload["error"],
            json!("invalid query: month 13 is outside 1..=12")
        );
    }
}
