//! Configuration schema types for Guidechat.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod api;
mod polling;
mod system;

pub use api::*;
pub use polling::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration for Guidechat.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidechatConfig {
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub logging: LoggingConfig,
}
