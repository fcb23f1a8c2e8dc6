//! Progress and error notifications for the front-end.

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::types::{RenderedMessage, RunStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    SessionStarted { session_id: String, thread_id: String },
    Uploaded { filename: String, file_id: String },
    UploadFailed { filename: String, error: String },
    RunStarted { run_id: String },
    /// The run is still working.
    Thinking,
    /// A failed run is being retried.
    Retrying { attempt: u32, max: u32 },
    RunEnded { status: RunStatus },
    /// A user-facing error banner.
    Error(String),
    /// Full rendered history after a run completed.
    Messages(Vec<RenderedMessage>),
}

/// Sends events to the front-end if one is listening.
#[derive(Clone, Default)]
pub(crate) struct EventSink {
    tx: Option<UnboundedSender<ChatEvent>>,
}

impl EventSink {
    pub(crate) fn new(tx: Option<UnboundedSender<ChatEvent>>) -> Self {
        Self { tx }
    }

    pub(crate) fn emit(&self, event: ChatEvent) {
        if let Some(ref tx) = self.tx {
            if tx.send(event).is_err() {
                debug!("event receiver dropped");
            }
        }
    }
}
