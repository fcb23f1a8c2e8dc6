//! Tests for the full validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    assert!(validate(&GuidechatConfig::default()).is_ok());
}

#[test]
fn catches_zero_request_timeout() {
    let mut config = GuidechatConfig::default();
    config.api.request_timeout_secs = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("api.request_timeout_secs"));
}

#[test]
fn catches_bad_base_url_scheme() {
    let mut config = GuidechatConfig::default();
    config.api.base_url = "ftp://example.com".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("api.base_url"));
}

#[test]
fn catches_retry_delay_too_large() {
    let mut config = GuidechatConfig::default();
    config.polling.retry_delay_secs = 121;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("polling.retry_delay_secs"));
}

#[test]
fn zero_delays_are_allowed() {
    let mut config = GuidechatConfig::default();
    config.polling.upload_throttle_secs = 0;
    config.polling.thinking_interval_ms = 0;
    config.polling.retry_delay_secs = 0;
    config.polling.run_timeout_secs = 0;
    assert!(validate(&config).is_ok());
}

#[test]
fn collects_every_error() {
    let mut config = GuidechatConfig::default();
    config.api.connect_timeout_secs = 0;
    config.polling.thinking_interval_ms = 70_000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("api.connect_timeout_secs"));
    assert!(err.contains("polling.thinking_interval_ms"));
}
