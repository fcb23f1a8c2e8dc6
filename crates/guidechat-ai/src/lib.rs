//! Assistant chat engine for Guidechat.
//!
//! Provides the hosted assistants API client and the session controller
//! built on it:
//! - File upload, thread/message/run management over HTTP
//! - Run polling with a shared retry budget and explicit cancellation
//! - Citation rewriting of assistant answers
//! - Report prompt composition

pub mod api;
pub mod citations;
pub mod prompt;
pub mod session;
pub mod types;

pub use api::{AssistantsApi, OpenAiClient, OpenAiConfig};
pub use citations::{render_block, render_history};
pub use prompt::compose_report_prompt;
pub use session::{
    ChatController, ChatEvent, PollOutcome, PollSettings, ReportOutcome, ReportRequest, Session,
    MAX_COMPETITORS, MAX_RUN_RETRIES,
};
pub use types::{
    Annotation, AssistantRef, CitationSource, ContentBlock, FileRef, Message, RenderedMessage,
    Role, Run, RunStatus, ThreadRef, Upload,
};

/// Shown when a run keeps failing and the retry budget is spent.
pub const RATE_LIMIT_MESSAGE: &str = "FAILED: The OpenAI API is currently processing too many \
     requests. Please try again later ......";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
    #[error("No active session")]
    NoSession,
    #[error("No run to poll")]
    NoRun,
    #[error("Run {0} is still in progress")]
    RunInProgress(String),
    #[error("Message is empty")]
    EmptyMessage,
    #[error("At most {max} competitor files are allowed, got {got}")]
    TooManyCompetitors { max: usize, got: usize },
    #[error("{}", RATE_LIMIT_MESSAGE)]
    RetriesExhausted,
    #[error("Polling cancelled")]
    Cancelled,
    /// The overall wait for one run passed `polling.run_timeout_secs`.
    #[error("Gave up waiting for the run")]
    PollTimeout,
}

impl ChatError {
    /// Errors worth another attempt after a delay.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ChatError::RateLimited | ChatError::NetworkError(_) | ChatError::Timeout
        )
    }
}

impl From<ChatError> for guidechat_common::GuidechatError {
    fn from(err: ChatError) -> Self {
        guidechat_common::GuidechatError::Chat(err.to_string())
    }
}
