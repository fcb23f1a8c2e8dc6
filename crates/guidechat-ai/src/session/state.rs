//! Per-user session state.

use std::collections::HashMap;

use guidechat_common::SessionId;

use crate::types::{AssistantRef, Message, Run, ThreadRef};

/// Failed runs tolerated per session before polling gives up for good.
pub const MAX_RUN_RETRIES: u32 = 3;

/// State for one user session.
///
/// `retry_count` only grows and is shared by every run in the session.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) session_id: SessionId,
    pub(crate) thread: ThreadRef,
    pub(crate) assistant: AssistantRef,
    pub(crate) messages: Vec<Message>,
    pub(crate) run: Option<Run>,
    pub(crate) retry_count: u32,
    /// file id -> original filename, filled by uploads and lookups.
    pub(crate) filenames: HashMap<String, String>,
}

impl Session {
    pub(crate) fn new(session_id: SessionId, thread: ThreadRef, assistant: AssistantRef) -> Self {
        Self {
            session_id,
            thread,
            assistant,
            messages: Vec::new(),
            run: None,
            retry_count: 0,
            filenames: HashMap::new(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn thread(&self) -> &ThreadRef {
        &self.thread
    }

    pub fn assistant(&self) -> &AssistantRef {
        &self.assistant
    }

    /// Messages from the last completed run, in listing order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn retries_exhausted(&self) -> bool {
        self.retry_count >= MAX_RUN_RETRIES
    }

    /// Count one failed run and return the new total.
    pub(crate) fn record_failure(&mut self) -> u32 {
        self.retry_count = (self.retry_count + 1).min(MAX_RUN_RETRIES);
        self.retry_count
    }

    /// The current run, if it may still produce an answer.
    pub(crate) fn active_run(&self) -> Option<&Run> {
        self.run.as_ref().filter(|r| r.status.is_active())
    }
}
