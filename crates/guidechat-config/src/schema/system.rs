//! System configuration types: logging.

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The `tracing` filter directive for the guidechat crates at this level.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "guidechat=trace",
            LogLevel::Debug => "guidechat=debug",
            LogLevel::Info => "guidechat=info",
            LogLevel::Warn => "guidechat=warn",
            LogLevel::Error => "guidechat=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
