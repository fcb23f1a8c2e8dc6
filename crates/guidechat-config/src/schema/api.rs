//! Hosted assistant service endpoint configuration.

use std::time::Duration;

use guidechat_common::defaults;
use serde::{Deserialize, Serialize};

pub use guidechat_common::defaults::DEFAULT_BASE_URL;

/// Where and how to reach the assistants API.
///
/// Credentials are not part of this section; see [`crate::Secrets`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Valid range: 1-600.
    pub connect_timeout_secs: u32,
    /// Valid range: 1-600.
    pub request_timeout_secs: u32,
}

impl ApiConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_secs))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.request_timeout_secs))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: defaults::CONNECT_TIMEOUT_SECS,
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}
