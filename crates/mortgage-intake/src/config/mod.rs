use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::intake::MAX_STEPS;

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
    pub wizard: WizardConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            wizard: WizardConfig::from_env()?,
        })
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Knobs for the rate wizard flow and its validators.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardConfig {
    pub total_steps: u8,
    pub progress_dir: PathBuf,
    pub min_mortgage: u32,
    pub max_mortgage: u32,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            total_steps: MAX_STEPS,
            progress_dir: PathBuf::from(".rate-wizard"),
            min_mortgage: 50_000,
            max_mortgage: 2_000_000,
        }
    }
}

impl WizardConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let total_steps = match env::var("APP_WIZARD_TOTAL_STEPS") {
            Ok(raw) => raw
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|steps| (1..=MAX_STEPS).contains(steps))
                .ok_or(ConfigError::InvalidStepCount(raw))?,
            Err(_) => defaults.total_steps,
        };

        let progress_dir = env::var("APP_PROGRESS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.progress_dir);

        let min_mortgage = parse_amount("APP_MIN_MORTGAGE", defaults.min_mortgage)?;
        let max_mortgage = parse_amount("APP_MAX_MORTGAGE", defaults.max_mortgage)?;
        if min_mortgage >= max_mortgage {
            return Err(ConfigError::InvalidMortgageBand {
                min: min_mortgage,
                max: max_mortgage,
            });
        }

        Ok(Self {
            total_steps,
            progress_dir,
            min_mortgage,
            max_mortgage,
        })
    }
}

fn parse_amount(key: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidAmount { key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidStepCount(String),
    InvalidAmount { key: &'static str, value: String },
    InvalidMortgageBand { min: u32, max: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidStepCount(value) => write!(
                f,
                "APP_WIZARD_TOTAL_STEPS must be between 1 and {MAX_STEPS} (got '{value}')"
            ),
            ConfigError::InvalidAmount { key, value } => {
                write!(f, "{key} must be a whole dollar amount (got '{value}')")
            }
            ConfigError::InvalidMortgageBand { min, max } => write!(
                f,
                "mortgage band is empty: minimum {min} must be below maximum {max}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidStepCount(_)
            | ConfigError::InvalidAmount { .. }
            | ConfigError::InvalidMortgageBand { .. } => None,
        }
    }
}
