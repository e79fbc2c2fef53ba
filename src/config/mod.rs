use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::forms::validation::PhonePolicy;

const DEFAULT_NEAREST_MAX_KM: f64 = 50.0;
const DEFAULT_SEARCH_RADIUS_KM: f64 = 50.0;
const DEFAULT_GEOLOCATION_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_PAYMENT_CLOSE_DELAY_MS: u64 = 3_000;

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
    pub search: SearchConfig,
    pub forms: FormsConfig,
    pub payments: PaymentsConfig,
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

        let search = SearchConfig {
            nearest_max_km: distance_var("KWA_NEAREST_MAX_KM", DEFAULT_NEAREST_MAX_KM)?,
            search_radius_km: distance_var("KWA_SEARCH_RADIUS_KM", DEFAULT_SEARCH_RADIUS_KM)?,
            geolocation_timeout: Duration::from_millis(millis_var(
                "KWA_GEOLOCATION_TIMEOUT_MS",
                DEFAULT_GEOLOCATION_TIMEOUT_MS,
            )?),
        };

        let phone_policy = match env::var("KWA_PHONE_POLICY") {
            Ok(raw) => PhonePolicyKind::parse(&raw)?,
            Err(_) => PhonePolicyKind::KenyaMobile,
        };

        let payments = PaymentsConfig {
            close_delay: Duration::from_millis(millis_var(
                "KWA_PAYMENT_CLOSE_DELAY_MS",
                DEFAULT_PAYMENT_CLOSE_DELAY_MS,
            )?),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            search,
            forms: FormsConfig { phone_policy },
            payments,
        })
    }
}

fn distance_var(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or(ConfigError::InvalidDistance { name, value: raw }),
        Err(_) => Ok(default),
    }
}

fn millis_var(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidDuration { name, value: raw }),
        Err(_) => Ok(default),
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

/// Policy constants for proximity lookups and job search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub nearest_max_km: f64,
    pub search_radius_km: f64,
    pub geolocation_timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            nearest_max_km: DEFAULT_NEAREST_MAX_KM,
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            geolocation_timeout: Duration::from_millis(DEFAULT_GEOLOCATION_TIMEOUT_MS),
        }
    }
}

/// Which phone-number rule the submission forms enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhonePolicyKind {
    KenyaMobile,
    Safaricom,
}

impl PhonePolicyKind {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "kenya_mobile" | "kenya" => Ok(Self::KenyaMobile),
            "safaricom" => Ok(Self::Safaricom),
            _ => Err(ConfigError::UnknownPhonePolicy(raw.to_string())),
        }
    }

    pub fn policy(self) -> PhonePolicy {
        match self {
            PhonePolicyKind::KenyaMobile => PhonePolicy::kenya_mobile(),
            PhonePolicyKind::Safaricom => PhonePolicy::safaricom(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormsConfig {
    pub phone_policy: PhonePolicyKind,
}

#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    /// How long a successful payment stays on screen before the modal closes.
    pub close_delay: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDistance { name: &'static str, value: String },
    InvalidDuration { name: &'static str, value: String },
    UnknownPhonePolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDistance { name, value } => write!(
                f,
                "{name} must be a non-negative number of kilometres (found '{value}')"
            ),
            ConfigError::InvalidDuration { name, value } => {
                write!(f, "{name} must be a whole number of milliseconds (found '{value}')")
            }
            ConfigError::UnknownPhonePolicy(value) => write!(
                f,
                "KWA_PHONE_POLICY must be 'kenya_mobile' or 'safaricom' (found '{value}')"
            ),
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "KWA_NEAREST_MAX_KM",
            "KWA_SEARCH_RADIUS_KM",
            "KWA_GEOLOCATION_TIMEOUT_MS",
            "KWA_PAYMENT_CLOSE_DELAY_MS",
            "KWA_PHONE_POLICY",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.search, SearchConfig::default());
        assert_eq!(config.forms.phone_policy, PhonePolicyKind::KenyaMobile);
        assert_eq!(config.payments.close_delay, Duration::from_secs(3));
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn proximity_threshold_is_configurable() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("KWA_NEAREST_MAX_KM", "120");
        env::set_var("KWA_PHONE_POLICY", "Safaricom");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.search.nearest_max_km, 120.0);
        assert_eq!(config.forms.phone_policy, PhonePolicyKind::Safaricom);
        reset_env();
    }

    #[test]
    fn rejects_negative_distances() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("KWA_SEARCH_RADIUS_KM", "-5");
        let err = AppConfig::load().expect_err("negative radius rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidDistance {
                name: "KWA_SEARCH_RADIUS_KM",
                ..
            }
        ));
        reset_env();
    }

    #[test]
    fn rejects_unknown_phone_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("KWA_PHONE_POLICY", "worldwide");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::UnknownPhonePolicy(_))
        ));
        reset_env();
    }
}
