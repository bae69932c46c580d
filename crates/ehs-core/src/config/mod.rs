use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Deployment stage, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Portal settings: bind address, log level, and the CSV exports that seed
/// the metric source.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub data: DataConfig,
}

impl AppConfig {
    /// Reads the process environment after loading an optional `.env` file.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match var("APP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value: raw })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            environment: var("APP_ENV")
                .map(|value| AppEnvironment::parse(&value))
                .unwrap_or_default(),
            server: ServerConfig {
                host: var("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: var("APP_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            },
            data: DataConfig {
                reports_csv: var("EHS_REPORTS_CSV").map(PathBuf::from),
                projects_csv: var("EHS_PROJECTS_CSV").map(PathBuf::from),
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `localhost` maps to the IPv4 loopback; anything else must be an IP literal.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost {
                    host: self.host.clone(),
                    source,
                })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

/// CSV exports seeding the in-memory metric source. Both unset means the
/// portal starts empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataConfig {
    pub reports_csv: Option<PathBuf>,
    pub projects_csv: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort {
        value: String,
    },
    InvalidHost {
        host: String,
        source: std::net::AddrParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "APP_PORT `{value}` is not a port number")
            }
            ConfigError::InvalidHost { host, .. } => {
                write!(f, "APP_HOST `{host}` is neither localhost nor an IP address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort { .. } => None,
            ConfigError::InvalidHost { source, .. } => Some(source),
        }
    }
}
