//! Delays used by the controller.

use std::time::Duration;

use guidechat_common::defaults;

/// Fixed pauses for upload throttling and run polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Before and after the upload batch, and before the report prompt.
    pub upload_throttle: Duration,
    /// Between polls of an in-progress run.
    pub thinking_interval: Duration,
    /// Before retrying a failed run or re-polling an unexpected status.
    pub retry_delay: Duration,
    /// Overall limit for one `poll_run` call.
    pub run_timeout: Option<Duration>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            upload_throttle: Duration::from_secs(u64::from(defaults::UPLOAD_THROTTLE_SECS)),
            thinking_interval: Duration::from_millis(u64::from(defaults::THINKING_INTERVAL_MS)),
            retry_delay: Duration::from_secs(u64::from(defaults::RETRY_DELAY_SECS)),
            run_timeout: (defaults::RUN_TIMEOUT_SECS > 0)
                .then(|| Duration::from_secs(u64::from(defaults::RUN_TIMEOUT_SECS))),
        }
    }
}
