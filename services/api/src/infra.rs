use chrono::NaiveDate;
use ems::config::{ConfigError, DataSourceConfig};
use ems::error::AppError;
use ems::export::{ExportFormat, ReportSection};
use ems::records::{FixtureStore, HttpStore, Month, RecordStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Picks the record store once for the whole process.
pub(crate) fn open_store(source: &DataSourceConfig) -> Result<Arc<dyn RecordStore>, AppError> {
    let store: Arc<dyn RecordStore> = match source {
        DataSourceConfig::Fixture => Arc::new(FixtureStore::seeded()),
        DataSourceConfig::Http { base_url, timeout } => {
            Arc::new(HttpStore::new(base_url.clone(), *timeout)?)
        }
    };
    Ok(store)
}

/// Applies `--data-source` / `--base-url` on top of the configured source. A base URL on its
/// own keeps the configured source kind.
pub(crate) fn override_data_source(
    current: &DataSourceConfig,
    source: Option<&str>,
    base_url: Option<String>,
) -> Result<DataSourceConfig, ConfigError> {
    let (current_url, timeout) = match current {
        DataSourceConfig::Fixture => (None, Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        DataSourceConfig::Http { base_url, timeout } => (Some(base_url.clone()), *timeout),
    };
    let Some(source) = source.or_else(|| base_url.as_ref().map(|_| current.label())) else {
        return Ok(current.clone());
    };
    DataSourceConfig::resolve(source, base_url.or(current_url), timeout.as_secs())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_month(raw: &str) -> Result<Month, String> {
    Month::parse(raw).ok_or_else(|| format!("'{raw}' is not a calendar month"))
}

pub(crate) fn parse_section(raw: &str) -> Result<ReportSection, String> {
    raw.parse().map_err(|err: ems::export::ExportError| err.to_string())
}

pub(crate) fn parse_format(raw: &str) -> Result<ExportFormat, String> {
    raw.parse().map_err(|err: ems::export::ExportError| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_alone_keeps_fixture_source() {
        let resolved = override_data_source(
            &DataSourceConfig::Fixture,
            None,
            Some("http://localhost:8080".into()),
        )
        .expect("resolves");
        assert_eq!(resolved, DataSourceConfig::Fixture);
    }

    #[test]
    fn switching_to_http_reuses_configured_timeout() {
        let current = DataSourceConfig::Http {
            base_url: "http://old".into(),
            timeout: Duration::from_secs(3),
        };
        let resolved = override_data_source(&current, Some("http"), Some("http://new/".into()))
            .expect("resolves");
        assert_eq!(
            resolved,
            DataSourceConfig::Http {
                base_url: "http://new".into(),
                timeout: Duration::from_secs(3),
            }
        );
    }

    #[test]
    fn http_without_base_url_is_rejected() {
        let result = override_data_source(&DataSourceConfig::Fixture, Some("http"), None);
        assert!(matches!(result, Err(ConfigError::MissingBaseUrl)));
    }

    #[test]
    fn cli_parsers_report_readable_errors() {
        assert_eq!(parse_month("june 2025"), Ok(Month::June));
        assert!(parse_section("bonus").unwrap_err().contains("bonus"));
        assert_eq!(parse_format("CSV"), Ok(ExportFormat::Csv));
        assert!(parse_date("2024-13-01").is_err());
    }
}
