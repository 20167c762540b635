use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::bundle::catalog::reference;
use crate::workflows::bundle::pricing::TierBasis;

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
    pub gateway: GatewayConfig,
    pub catalog: CatalogConfig,
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

        let webhook_url = url_var("BUNDLE_WEBHOOK_URL", reference::WEBHOOK_URL)?;
        let checkout_url = url_var("BUNDLE_CHECKOUT_URL", reference::SPECIAL_BUNDLE_CHECKOUT_URL)?;
        let store_url = url_var("BUNDLE_STORE_URL", reference::STORE_URL)?;

        let mode = match env::var("BUNDLE_GATEWAY_MODE") {
            Ok(raw) => GatewayMode::parse(&raw).ok_or(ConfigError::InvalidGatewayMode(raw))?,
            Err(_) => GatewayMode::Webhook,
        };

        let tier_basis = match env::var("BUNDLE_TIER_BASIS") {
            Ok(raw) => TierBasis::parse(&raw).ok_or(ConfigError::InvalidTierBasis(raw))?,
            Err(_) => TierBasis::SelectionCount,
        };

        let csv_path = env::var("BUNDLE_CATALOG_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            gateway: GatewayConfig {
                mode,
                webhook_url,
                checkout_url,
                store_url,
            },
            catalog: CatalogConfig {
                csv_path,
                tier_basis,
            },
        })
    }
}

fn url_var(name: &'static str, default: &str) -> Result<String, ConfigError> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());
    let trimmed = value.trim();
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidUrl { name, value })
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

/// Which gateway implementation backs verification and bundle creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMode {
    Webhook,
    Mock,
}

impl GatewayMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "webhook" | "live" => Some(Self::Webhook),
            "mock" | "offline" => Some(Self::Mock),
            _ => None,
        }
    }
}

/// External endpoints the configurator hands off to.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub mode: GatewayMode,
    pub webhook_url: String,
    pub checkout_url: String,
    pub store_url: String,
}

/// Catalog source and discount policy.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub csv_path: Option<PathBuf>,
    pub tier_basis: TierBasis,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidUrl { name: &'static str, value: String },
    InvalidGatewayMode(String),
    InvalidTierBasis(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidUrl { name, value } => {
                write!(f, "{name} must be an http(s) URL, got '{value}'")
            }
            ConfigError::InvalidGatewayMode(value) => {
                write!(f, "BUNDLE_GATEWAY_MODE must be 'webhook' or 'mock', got '{value}'")
            }
            ConfigError::InvalidTierBasis(value) => {
                write!(f, "BUNDLE_TIER_BASIS must be 'count' or 'amount', got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidUrl { .. }
            | ConfigError::InvalidGatewayMode(_)
            | ConfigError::InvalidTierBasis(_) => None,
        }
    }
}
