//! Tracing subscriber setup.

use record_locking_core::settings::LogLevel;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LockingConfig;

/// Filter directives used when `RUST_LOG` is not set.
///
/// The configured level applies to this workspace's crates; HTTP tracing from
/// `tower_http` stays at debug.
pub fn default_directives(level: LogLevel, enabled: bool) -> String {
    let level = if enabled { level.as_str() } else { "off" };
    format!(
        "record_locking_api={level},record_locking_core={level},record_locking_db={level},tower_http=debug"
    )
}

/// Install the global tracing subscriber. `RUST_LOG` wins when set.
pub fn init_tracing(config: &LockingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        default_directives(config.log_level, config.enable_logging).into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
