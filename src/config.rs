use std::env;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_COMPLEXITY_LIMIT: usize = 10;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Deployment mode, decided once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMode {
    Production,
    Development,
}

/// Optional gateway behavior enabled by the deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayExtension {
    /// Cap on how many checks one operation may request.
    ComplexityLimit(usize),
    /// Expose the operation listing and playground.
    Introspection,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub mode: GatewayMode,
    pub request_timeout: Duration,
    pub complexity_limit: usize,
}

impl GatewayConfig {
    pub fn new(mode: GatewayMode) -> Self {
        Self {
            mode,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            complexity_limit: DEFAULT_COMPLEXITY_LIMIT,
        }
    }

    pub fn extension(&self) -> GatewayExtension {
        match self.mode {
            GatewayMode::Production => GatewayExtension::ComplexityLimit(self.complexity_limit),
            GatewayMode::Development => GatewayExtension::Introspection,
        }
    }

    pub fn complexity_limit(&self) -> Option<usize> {
        match self.extension() {
            GatewayExtension::ComplexityLimit(limit) => Some(limit),
            GatewayExtension::Introspection => None,
        }
    }

    pub fn introspection_enabled(&self) -> bool {
        self.extension() == GatewayExtension::Introspection
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Role store database, opened read-only.
    pub database_path: String,
    pub db_pool_size: u32,
    /// HS256 secret used to verify access tokens
    pub access_token_secret: String,
    pub gateway: GatewayConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mode = if env::var("PRODUCTION").map(|v| v == "true").unwrap_or(false) {
            GatewayMode::Production
        } else {
            GatewayMode::Development
        };

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = parse_var("PORT")?.unwrap_or(4000);

        let access_token_secret = env::var("ACCESS_TOKEN_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("ACCESS_TOKEN_SECRET"))?;

        let mut gateway = GatewayConfig::new(mode);
        if let Some(ms) = parse_var::<u64>("REQUEST_TIMEOUT_MS")? {
            gateway.request_timeout = Duration::from_millis(ms);
        }
        if let Some(limit) = parse_var("COMPLEXITY_LIMIT")? {
            gateway.complexity_limit = limit;
        }

        Ok(Self {
            host,
            port,
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "roles.db".to_string()),
            db_pool_size: parse_var("DB_POOL_SIZE")?.unwrap_or(8),
            access_token_secret,
            gateway,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(None),
    }
}
