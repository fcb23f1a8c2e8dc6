//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Guidechat Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
#
# Secrets live elsewhere: set OPENAI_API_KEY and OPENAI_ASSISTANT in the
# environment (or a .env file), or put `openai_api_key` and
# `openai_assistant` in secrets.toml next to this file.

[api]
# base_url = "https://api.openai.com/v1"
# connect_timeout_secs = 10     # 1-600
# request_timeout_secs = 120    # 1-600

[polling]
# upload_throttle_secs = 10     # 0-120, pause around the upload batch
# thinking_interval_ms = 1000   # 0-60000, pause between in-progress polls
# retry_delay_secs = 3          # 0-120, pause before retrying a failed run
# run_timeout_secs = 600        # 0-86400, 0 = poll until a terminal status

[logging]
# level = "info"                # trace | debug | info | warn | error
"##
    .to_string()
}
