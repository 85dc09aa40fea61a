use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::eligibility::normalize_region;

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
    pub knowledge_base: KnowledgeBaseConfig,
    pub intake: IntakeConfig,
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

        let schemes_path = non_empty_var("SCHEMES_PATH").map(PathBuf::from);

        let default_region =
            non_empty_var("INTAKE_DEFAULT_REGION").map(|region| normalize_region(&region));
        let results_limit = match non_empty_var("INTAKE_RESULTS_LIMIT") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(limit) if (1..=IntakeConfig::MAX_RESULTS_LIMIT).contains(&limit) => limit,
                _ => return Err(ConfigError::InvalidResultsLimit { value: raw }),
            },
            None => IntakeConfig::DEFAULT_RESULTS_LIMIT,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            knowledge_base: KnowledgeBaseConfig { schemes_path },
            intake: IntakeConfig {
                default_region,
                results_limit,
            },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
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

/// Where the scheme catalogue comes from. `None` selects the bundled catalogue.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBaseConfig {
    pub schemes_path: Option<PathBuf>,
}

/// Knobs for the conversational intake flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    /// Region used when the collected profile carries no `state`.
    pub default_region: Option<String>,
    /// Number of scheme names listed in a results reply, at most
    /// [`IntakeConfig::MAX_RESULTS_LIMIT`].
    pub results_limit: usize,
}

impl IntakeConfig {
    pub const DEFAULT_RESULTS_LIMIT: usize = 3;
    pub const MAX_RESULTS_LIMIT: usize = 3;
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            default_region: None,
            results_limit: Self::DEFAULT_RESULTS_LIMIT,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidResultsLimit { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidResultsLimit { value } => write!(
                f,
                "INTAKE_RESULTS_LIMIT must be between 1 and {} (got '{value}')",
                IntakeConfig::MAX_RESULTS_LIMIT
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidResultsLimit { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
