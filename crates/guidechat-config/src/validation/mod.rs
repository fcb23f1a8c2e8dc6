//! Full configuration validation.
//!
//! Validates numeric ranges and the API base URL. Each section has its own
//! function; this orchestrator calls them all and collects errors into a
//! single `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::GuidechatConfig;
use guidechat_common::ConfigError;

use helpers::validate_range;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &GuidechatConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_api(&mut errors, config);
    validate_polling(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_api(errors: &mut Vec<String>, config: &GuidechatConfig) {
    let api = &config.api;
    if !(api.base_url.starts_with("http://") || api.base_url.starts_with("https://")) {
        errors.push(format!(
            "api.base_url = {:?} must start with http:// or https://",
            api.base_url
        ));
    }
    validate_range(errors, "api.connect_timeout_secs", api.connect_timeout_secs, 1, 600);
    validate_range(errors, "api.request_timeout_secs", api.request_timeout_secs, 1, 600);
}

fn validate_polling(errors: &mut Vec<String>, config: &GuidechatConfig) {
    let polling = &config.polling;
    validate_range(errors, "polling.upload_throttle_secs", polling.upload_throttle_secs, 0, 120);
    validate_range(errors, "polling.thinking_interval_ms", polling.thinking_interval_ms, 0, 60_000);
    validate_range(errors, "polling.retry_delay_secs", polling.retry_delay_secs, 0, 120);
    validate_range(errors, "polling.run_timeout_secs", polling.run_timeout_secs, 0, 86_400);
}
