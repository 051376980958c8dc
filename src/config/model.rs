//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a default so the client runs without a config file.

use serde::{Deserialize, Serialize};

/// Root application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Terminal output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// chrono format string for chat and echo lines.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    /// Colored nicknames; ignored when stdout is not a terminal.
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
            color: true,
        }
    }
}

/// Transport and handshake settings not covered by the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub accept_invalid_certs: bool,
    /// Give up on NickServ after this many seconds. Unset waits forever.
    #[serde(default)]
    pub identify_timeout_secs: Option<u64>,
}

/// Diagnostic logging (stderr).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_timestamp_format() -> String {
    crate::app::event::DEFAULT_TIMESTAMP_FORMAT.to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}
