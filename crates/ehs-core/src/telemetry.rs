use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter { directive: String, source: ParseError },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter { directive, .. } => {
                write!(f, "invalid log filter '{directive}' for the portal logger")
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "logger already installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// `RUST_LOG` wins over the configured level when it parses.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::InvalidFilter {
            directive: config.log_level.clone(),
            source,
        })
    })
}

/// Installs the global compact subscriber for the portal.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_level_names_the_offending_directive() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = TelemetryConfig {
            log_level: "ehs_core=verbose".to_string(),
        };
        let error = env_filter(&config).expect_err("filter must not parse");
        assert!(matches!(error, TelemetryError::InvalidFilter { .. }));
        assert!(error.to_string().contains("ehs_core=verbose"));
    }
}
