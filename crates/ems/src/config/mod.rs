use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Where employee, department, leave and salary records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceConfig {
    /// Seeded in-memory sample data.
    Fixture,
    /// JSON backend reachable under `base_url` (e.g. `http://localhost:8080`).
    Http { base_url: String, timeout: Duration },
}

impl DataSourceConfig {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fixture => "fixture",
            Self::Http { .. } => "http",
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub data_source: DataSourceConfig,
    pub reporting: ReportingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let source = env::var("EMS_DATA_SOURCE").unwrap_or_else(|_| "fixture".to_string());
        let base_url = env::var("EMS_API_BASE_URL").ok();
        let timeout_secs = env::var("EMS_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;
        let data_source = DataSourceConfig::resolve(&source, base_url, timeout_secs)?;

        let currency_symbol = env::var("EMS_CURRENCY_SYMBOL").unwrap_or_else(|_| "₹".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            data_source,
            reporting: ReportingConfig { currency_symbol },
        })
    }
}

impl DataSourceConfig {
    /// Builds a data source from its textual name, as used by `EMS_DATA_SOURCE` and the
    /// `--data-source` flag.
    pub fn resolve(
        source: &str,
        base_url: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        match source.trim().to_ascii_lowercase().as_str() {
            "fixture" | "dummy" => Ok(Self::Fixture),
            "http" | "live" => {
                let base_url = base_url
                    .map(|url| url.trim().trim_end_matches('/').to_string())
                    .filter(|url| !url.is_empty())
                    .ok_or(ConfigError::MissingBaseUrl)?;
                Ok(Self::Http {
                    base_url,
                    timeout: Duration::from_secs(timeout_secs),
                })
            }
            other => Err(ConfigError::UnknownDataSource(other.to_string())),
        }
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Presentation settings shared by summaries and exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportingConfig {
    pub currency_symbol: String,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
    UnknownDataSource(String),
    MissingBaseUrl,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "EMS_HTTP_TIMEOUT_SECS must be a whole number of seconds")
            }
            ConfigError::UnknownDataSource(value) => write!(
                f,
                "EMS_DATA_SOURCE '{value}' is not recognised (expected 'fixture' or 'http')"
            ),
            ConfigError::MissingBaseUrl => {
                write!(f, "EMS_API_BASE_URL is required when EMS_DATA_SOURCE=http")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
