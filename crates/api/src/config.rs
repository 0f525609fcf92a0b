use record_locking_core::settings::{LogLevel, DEFAULT_TRANSPORTS};

use crate::auth::jwt::JwtConfig;

/// Where lock records are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// The `open_entities` table in the host database.
    Postgres,
    /// Process memory only.
    Memory,
}

impl StoreBackend {
    /// Parse `LOCK_STORE`. Unknown values are a configuration error.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "db" => Some(StoreBackend::Postgres),
            "memory" | "in-memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

/// Record-locking specific settings, surfaced to the admin UI.
#[derive(Debug, Clone)]
pub struct LockingConfig {
    pub store: StoreBackend,
    /// Transports the admin UI may use to reach the real-time channel.
    pub transports: Vec<String>,
    pub log_level: LogLevel,
    pub enable_logging: bool,
}

impl Default for LockingConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::Postgres,
            transports: DEFAULT_TRANSPORTS.iter().map(|t| t.to_string()).collect(),
            log_level: LogLevel::Info,
            enable_logging: true,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for running next
/// to a local host install.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `1337`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT verification settings for host-issued admin tokens.
    pub jwt: JwtConfig,
    pub locking: LockingConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                  |
    /// |----------------------------------|--------------------------|
    /// | `HOST`                           | `0.0.0.0`                |
    /// | `PORT`                           | `1337`                   |
    /// | `CORS_ORIGINS`                   | `http://localhost:1337`  |
    /// | `REQUEST_TIMEOUT_SECS`           | `30`                     |
    /// | `LOCK_STORE`                     | `postgres`               |
    /// | `RECORD_LOCKING_TRANSPORTS`      | `websocket`              |
    /// | `RECORD_LOCKING_LOG_LEVEL`       | `info`                   |
    /// | `RECORD_LOCKING_ENABLE_LOGGING`  | `true`                   |
    ///
    /// # Panics
    ///
    /// Panics on unparseable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "1337".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:1337".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();
        let locking = LockingConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            locking,
        }
    }
}

impl LockingConfig {
    fn from_env() -> Self {
        let defaults = Self::default();

        let store = match std::env::var("LOCK_STORE") {
            Ok(raw) => StoreBackend::parse(&raw)
                .unwrap_or_else(|| panic!("LOCK_STORE must be 'postgres' or 'memory', got '{raw}'")),
            Err(_) => defaults.store,
        };

        let transports = std::env::var("RECORD_LOCKING_TRANSPORTS")
            .map(|raw| split_list(&raw))
            .ok()
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.transports);

        let log_level = std::env::var("RECORD_LOCKING_LOG_LEVEL")
            .map(|raw| LogLevel::parse_or_default(&raw))
            .unwrap_or(defaults.log_level);

        let enable_logging = std::env::var("RECORD_LOCKING_ENABLE_LOGGING")
            .map(|raw| parse_flag(&raw))
            .unwrap_or(defaults.enable_logging);

        Self {
            store,
            transports,
            log_level,
            enable_logging,
        }
    }
}

/// Split a comma-separated list, dropping blank entries.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Only explicit negatives disable a flag.
fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}
