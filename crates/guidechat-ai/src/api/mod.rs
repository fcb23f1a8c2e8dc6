//! Hosted assistants API.
//!
//! `AssistantsApi` is the seam the session controller talks through;
//! `OpenAiClient` implements it over HTTP against the OpenAI Assistants
//! API (v2).

mod client;
mod config;
mod endpoints;
mod wire;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::types::{AssistantRef, FileRef, Message, Run, ThreadRef, Upload};
use crate::ChatError;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;

#[async_trait]
pub trait AssistantsApi: Send + Sync {
    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<AssistantRef, ChatError>;

    async fn create_thread(
        &self,
        metadata: &BTreeMap<String, String>,
    ) -> Result<ThreadRef, ChatError>;

    async fn upload_file(&self, upload: &Upload) -> Result<FileRef, ChatError>;

    async fn retrieve_file(&self, file_id: &str) -> Result<FileRef, ChatError>;

    /// Post a user message, attaching `file_ids` for retrieval.
    async fn create_message(
        &self,
        thread_id: &str,
        content: &str,
        file_ids: &[String],
    ) -> Result<Message, ChatError>;

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, ChatError>;

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ChatError>;

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ChatError>;

    /// All messages on the thread, in the service's order (newest first).
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<Message>, ChatError>;
}
