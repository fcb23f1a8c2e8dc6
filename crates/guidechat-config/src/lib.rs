//! Guidechat configuration system.
//!
//! Provides TOML-based configuration for API endpoints, polling cadence and
//! logging, plus resolution of the two secrets the chat needs (API key and
//! assistant id). All config sections use sensible defaults so partial
//! configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use guidechat_config::{load_config, Secrets};
//!
//! let config = load_config(None).expect("failed to load config");
//! let secrets = Secrets::resolve(None).expect("secrets not configured");
//! println!("{}", config.api.base_url);
//! # let _ = secrets;
//! ```

pub mod schema;
pub mod secrets;
pub mod toml_loader;
pub mod validation;

pub use schema::{ApiConfig, GuidechatConfig, LogLevel, LoggingConfig, PollingConfig};
pub use secrets::Secrets;

use guidechat_common::ConfigError;
use std::path::Path;

/// Load config from `path` if given, else from the platform default path.
///
/// The default path is created with a commented template when missing.
pub fn load_config(path: Option<&Path>) -> Result<GuidechatConfig, ConfigError> {
    let config = match path {
        Some(p) => toml_loader::load_from_path(p)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}
