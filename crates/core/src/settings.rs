//! Plugin-level settings exposed to the admin UI.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Transports offered to the admin UI when none are configured.
pub const DEFAULT_TRANSPORTS: &[&str] = &["websocket"];

/// Verbosity of the service's own log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    /// Parse a configured level. Anything unrecognised falls back to `info`.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim() {
            "error" => LogLevel::Error,
            "warn" => LogLevel::Warn,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            _ => LogLevel::default(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of `GET /record-locking/settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportSettings {
    pub transports: Vec<String>,
}

/// Payload of `GET /record-locking/log-settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogSettings {
    #[serde(rename = "logLevel")]
    pub log_level: LogLevel,
    #[serde(rename = "enableLogging")]
    pub enable_logging: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_levels_parse() {
        assert_eq!(LogLevel::parse_or_default("error"), LogLevel::Error);
        assert_eq!(LogLevel::parse_or_default("warn"), LogLevel::Warn);
        assert_eq!(LogLevel::parse_or_default("info"), LogLevel::Info);
        assert_eq!(LogLevel::parse_or_default(" debug "), LogLevel::Debug);
    }

    #[test]
    fn unknown_levels_fall_back_to_info() {
        assert_eq!(LogLevel::parse_or_default("trace"), LogLevel::Info);
        assert_eq!(LogLevel::parse_or_default(""), LogLevel::Info);
        assert_eq!(LogLevel::parse_or_default("DEBUG"), LogLevel::Info);
    }

    #[test]
    fn log_settings_serialize_camel_case() {
        let settings = LogSettings {
            log_level: LogLevel::Debug,
            enable_logging: false,
        };
        assert_eq!(
            serde_json::to_value(settings).unwrap(),
            serde_json::json!({ "logLevel": "debug", "enableLogging": false })
        );
    }
}
