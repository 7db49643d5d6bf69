use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Simulated delays, banner lifetime and upload limits for the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    pub lookup_delay: Duration,
    pub payment_delay: Duration,
    pub alert_timeout: Duration,
    pub max_upload_bytes: u64,
    /// Optional CSV export replacing the built-in record table.
    pub records_csv: Option<PathBuf>,
    /// Fixed seed for the confetti generator; random when unset.
    pub confetti_seed: Option<u64>,
}

impl WizardConfig {
    pub const DEFAULT_LOOKUP_DELAY_MS: u64 = 1_500;
    pub const DEFAULT_PAYMENT_DELAY_MS: u64 = 2_000;
    pub const DEFAULT_ALERT_TIMEOUT_MS: u64 = 5_000;
    pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

    fn from_env() -> Result<Self, ConfigError> {
        let lookup_delay = env_millis("WIZARD_LOOKUP_DELAY_MS", Self::DEFAULT_LOOKUP_DELAY_MS)?;
        let payment_delay =
            env_millis("WIZARD_PAYMENT_DELAY_MS", Self::DEFAULT_PAYMENT_DELAY_MS)?;
        let alert_timeout =
            env_millis("WIZARD_ALERT_TIMEOUT_MS", Self::DEFAULT_ALERT_TIMEOUT_MS)?;
        let max_upload_bytes =
            env_number("WIZARD_MAX_UPLOAD_BYTES")?.unwrap_or(Self::DEFAULT_MAX_UPLOAD_BYTES);
        let records_csv = env::var("WIZARD_RECORDS_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let confetti_seed = env_number("WIZARD_CONFETTI_SEED")?;

        Ok(Self {
            lookup_delay,
            payment_delay,
            alert_timeout,
            max_upload_bytes,
            records_csv,
            confetti_seed,
        })
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            lookup_delay: Duration::from_millis(Self::DEFAULT_LOOKUP_DELAY_MS),
            payment_delay: Duration::from_millis(Self::DEFAULT_PAYMENT_DELAY_MS),
            alert_timeout: Duration::from_millis(Self::DEFAULT_ALERT_TIMEOUT_MS),
            max_upload_bytes: Self::DEFAULT_MAX_UPLOAD_BYTES,
            records_csv: None,
            confetti_seed: None,
        }
    }
}

fn env_number(name: &'static str) -> Result<Option<u64>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { name }),
        Err(_) => Ok(None),
    }
}

fn env_millis(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    Ok(Duration::from_millis(env_number(name)?.unwrap_or(default)))
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name } => {
                write!(f, "{name} must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
