use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::errands::{CacheConfig, CacheSettings, FilterConfig};

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub filter: FilterConfig,
    pub caches: CacheConfig,
    pub backend: BackendConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&text_var("APP_ENV", "development"));
        let host = text_var("APP_HOST", "127.0.0.1");
        let port = text_var("APP_PORT", "3000")
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        let log_level = text_var("APP_LOG_LEVEL", "info");

        let defaults = FilterConfig::default();
        let filter = FilterConfig {
            wanted_event_type: text_var("APP_WANTED_EVENT_TYPE", &defaults.wanted_event_type),
            wanted_event_subtype: text_var(
                "APP_WANTED_EVENT_SUBTYPE",
                &defaults.wanted_event_subtype,
            ),
            unwanted_event_subtypes: list_var(
                "APP_UNWANTED_EVENT_SUBTYPES",
                defaults.unwanted_event_subtypes,
            ),
            applicant_roles: list_var("APP_APPLICANT_ROLES", defaults.applicant_roles),
            unwanted_document_types: list_var(
                "APP_UNWANTED_DOCUMENT_TYPES",
                defaults.unwanted_document_types,
            ),
            notification_window_days: number_var(
                "APP_NOTIFICATION_WINDOW_DAYS",
                defaults.notification_window_days,
            )?,
        };

        let cache_defaults = CacheConfig::default();
        let caches = CacheConfig {
            roles: cache_settings("ROLES", cache_defaults.roles)?,
            related_errands: cache_settings("RELATED_ERRANDS", cache_defaults.related_errands)?,
            errand: cache_settings("ERRAND", cache_defaults.errand)?,
            document_type: cache_settings("DOCUMENT_TYPE", cache_defaults.document_type)?,
        };

        let snapshot_path = env::var("APP_BACKEND_SNAPSHOT")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            filter,
            caches,
            backend: BackendConfig { snapshot_path },
        })
    }
}

fn text_var(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn list_var(key: &str, default: Vec<String>) -> Vec<String> {
    match env::var(key) {
        Ok(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => default,
    }
}

fn number_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

fn cache_settings(name: &str, default: CacheSettings) -> Result<CacheSettings, ConfigError> {
    let mut settings = default;

    let capacity_key = format!("APP_CACHE_{name}_CAPACITY");
    if let Ok(raw) = env::var(&capacity_key) {
        let capacity = raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidCacheSetting { key: capacity_key })?;
        settings = settings.with_capacity(capacity);
    }

    let ttl_key = format!("APP_CACHE_{name}_TTL_SECS");
    if let Ok(raw) = env::var(&ttl_key) {
        let secs = raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidCacheSetting { key: ttl_key })?;
        settings = settings.with_ttl(Duration::from_secs(secs));
    }

    Ok(settings)
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

/// Where the API binary reads backend data from when no live transport is wired in.
#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
    InvalidCacheSetting { key: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a non-negative integer")
            }
            ConfigError::InvalidCacheSetting { key } => {
                write!(f, "{key} must be a non-negative integer")
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
