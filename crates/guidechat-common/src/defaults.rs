//! Default endpoint and timing values shared by config and the chat client.

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub const CONNECT_TIMEOUT_SECS: u32 = 10;
pub const REQUEST_TIMEOUT_SECS: u32 = 120;

pub const UPLOAD_THROTTLE_SECS: u32 = 10;
pub const THINKING_INTERVAL_MS: u32 = 1000;
pub const RETRY_DELAY_SECS: u32 = 3;
/// 0 disables the deadline.
pub const RUN_TIMEOUT_SECS: u32 = 600;
