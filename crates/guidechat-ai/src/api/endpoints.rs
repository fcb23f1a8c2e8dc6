//! AssistantsApi trait implementation for OpenAiClient.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::debug;

use crate::types::{AssistantRef, FileRef, Message, Run, ThreadRef, Upload};
use crate::ChatError;

use super::client::OpenAiClient;
use super::wire::{ListResponse, MessageObject, RunObject};
use super::AssistantsApi;

/// Page size for message listing (the service maximum).
const MESSAGE_PAGE_LIMIT: &str = "100";

#[async_trait]
impl AssistantsApi for OpenAiClient {
    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<AssistantRef, ChatError> {
        debug!(assistant_id, "retrieve assistant");
        let request = self.http.get(self.url(&format!("assistants/{assistant_id}")));
        self.send(request).await
    }

    async fn create_thread(
        &self,
        metadata: &BTreeMap<String, String>,
    ) -> Result<ThreadRef, ChatError> {
        debug!(keys = metadata.len(), "create thread");
        let body = serde_json::json!({ "metadata": metadata });
        let request = self.http.post(self.url("threads")).json(&body);
        self.send(request).await
    }

    async fn upload_file(&self, upload: &Upload) -> Result<FileRef, ChatError> {
        debug!(
            filename = %upload.filename,
            size = upload.bytes.len(),
            "upload file"
        );

        let file_part = reqwest::multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.filename.clone())
            .mime_str(upload.mime_type())
            .map_err(|e| ChatError::ApiError(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .text("purpose", "assistants")
            .part("file", file_part);

        let request = self.http.post(self.url("files")).multipart(form);
        self.send(request).await
    }

    async fn retrieve_file(&self, file_id: &str) -> Result<FileRef, ChatError> {
        debug!(file_id, "retrieve file");
        let request = self.http.get(self.url(&format!("files/{file_id}")));
        self.send(request).await
    }

    async fn create_message(
        &self,
        thread_id: &str,
        content: &str,
        file_ids: &[String],
    ) -> Result<Message, ChatError> {
        debug!(thread_id, attachments = file_ids.len(), "create message");

        let mut body = serde_json::json!({
            "role": "user",
            "content": content,
        });
        if !file_ids.is_empty() {
            let attachments: Vec<_> = file_ids
                .iter()
                .map(|id| {
                    serde_json::json!({
                        "file_id": id,
                        "tools": [{ "type": "file_search" }],
                    })
                })
                .collect();
            body["attachments"] = serde_json::json!(attachments);
        }

        let request = self
            .http
            .post(self.url(&format!("threads/{thread_id}/messages")))
            .json(&body);
        let obj: MessageObject = self.send(request).await?;
        Ok(obj.into())
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, ChatError> {
        debug!(thread_id, assistant_id, "create run");
        let body = serde_json::json!({ "assistant_id": assistant_id });
        let request = self
            .http
            .post(self.url(&format!("threads/{thread_id}/runs")))
            .json(&body);
        let obj: RunObject = self.send(request).await?;
        Ok(obj.into())
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ChatError> {
        debug!(thread_id, run_id, "retrieve run");
        let request = self
            .http
            .get(self.url(&format!("threads/{thread_id}/runs/{run_id}")));
        let obj: RunObject = self.send(request).await?;
        Ok(obj.into())
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ChatError> {
        debug!(thread_id, run_id, "cancel run");
        let request = self
            .http
            .post(self.url(&format!("threads/{thread_id}/runs/{run_id}/cancel")));
        let obj: RunObject = self.send(request).await?;
        Ok(obj.into())
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<Message>, ChatError> {
        let url = self.url(&format!("threads/{thread_id}/messages"));
        let mut messages = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut query = vec![("limit", MESSAGE_PAGE_LIMIT.to_string())];
            if let Some(ref cursor) = after {
                query.push(("after", cursor.clone()));
            }

            let page: ListResponse<MessageObject> =
                self.send(self.http.get(&url).query(&query)).await?;
            debug!(thread_id, count = page.data.len(), has_more = page.has_more, "listed messages");
            messages.extend(page.data.into_iter().map(Message::from));

            match (page.has_more, page.last_id) {
                (true, Some(last)) => after = Some(last),
                _ => break,
            }
        }

        Ok(messages)
    }
}
