//! Upload throttling and run polling cadence.

use std::time::Duration;

use guidechat_common::defaults;
use serde::{Deserialize, Serialize};

/// Fixed delays used while uploading files and polling a run.
///
/// None of these adapt to the service's responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Pause before and after the upload batch, and before the report prompt
    /// is posted (valid range: 0-120).
    pub upload_throttle_secs: u32,
    /// Pause between polls while the run is in progress (valid range: 0-60000).
    pub thinking_interval_ms: u32,
    /// Pause before retrying a failed run or re-polling an unexpected status
    /// (valid range: 0-120).
    pub retry_delay_secs: u32,
    /// Give up polling a single run after this long; 0 disables the deadline
    /// (valid range: 0-86400).
    pub run_timeout_secs: u32,
}

impl PollingConfig {
    pub fn upload_throttle(&self) -> Duration {
        Duration::from_secs(u64::from(self.upload_throttle_secs))
    }

    pub fn thinking_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.thinking_interval_ms))
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.retry_delay_secs))
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        (self.run_timeout_secs > 0).then(|| Duration::from_secs(u64::from(self.run_timeout_secs)))
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            upload_throttle_secs: defaults::UPLOAD_THROTTLE_SECS,
            thinking_interval_ms: defaults::THINKING_INTERVAL_MS,
            retry_delay_secs: defaults::RETRY_DELAY_SECS,
            run_timeout_secs: defaults::RUN_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_follow_fields() {
        let polling = PollingConfig::default();
        assert_eq!(polling.upload_throttle(), Duration::from_secs(10));
        assert_eq!(polling.thinking_interval(), Duration::from_secs(1));
        assert_eq!(polling.retry_delay(), Duration::from_secs(3));
        assert_eq!(polling.run_timeout(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn zero_run_timeout_disables_deadline() {
        let polling = PollingConfig {
            run_timeout_secs: 0,
            ..Default::default()
        };
        assert!(polling.run_timeout().is_none());
    }
}
