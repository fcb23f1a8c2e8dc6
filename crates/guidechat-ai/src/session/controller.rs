//! Session lifecycle, uploads, and message submission.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use guidechat_common::SessionId;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::AssistantsApi;
use crate::prompt::compose_report_prompt;
use crate::types::{FileRef, Run, Upload};
use crate::ChatError;

use super::events::{ChatEvent, EventSink};
use super::settings::PollSettings;
use super::state::Session;

/// Most competitor pages a single report may include.
pub const MAX_COMPETITORS: usize = 3;

/// Files and keyword for one report.
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub site: Option<Upload>,
    pub competitors: Vec<Upload>,
    pub keyword: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// Every upload failed (or none was given); nothing was posted.
    NothingUploaded,
    /// The prompt was posted and a run started.
    Submitted(Run),
}

/// Drives one chat session against the assistants API.
pub struct ChatController {
    pub(super) api: Arc<dyn AssistantsApi>,
    pub(super) assistant_id: String,
    pub(super) settings: PollSettings,
    pub(super) events: EventSink,
    pub(super) session: Option<Session>,
}

impl ChatController {
    pub fn new(api: Arc<dyn AssistantsApi>, assistant_id: impl Into<String>) -> Self {
        Self {
            api,
            assistant_id: assistant_id.into(),
            settings: PollSettings::default(),
            events: EventSink::default(),
            session: None,
        }
    }

    pub fn with_settings(mut self, settings: PollSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_events(mut self, tx: UnboundedSender<ChatEvent>) -> Self {
        self.events = EventSink::new(Some(tx));
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub(super) fn session_ref(&self) -> Result<&Session, ChatError> {
        self.session.as_ref().ok_or(ChatError::NoSession)
    }

    pub(super) fn session_mut(&mut self) -> Result<&mut Session, ChatError> {
        self.session.as_mut().ok_or(ChatError::NoSession)
    }

    /// Create the session on first call: look up the assistant and open a
    /// thread tagged with a fresh session id. Later calls are no-ops.
    pub async fn initialize(&mut self) -> Result<&Session, ChatError> {
        if self.session.is_none() {
            let session_id = SessionId::new();
            let assistant = self.api.retrieve_assistant(&self.assistant_id).await?;

            let mut metadata = BTreeMap::new();
            metadata.insert("session_id".to_string(), session_id.to_string());
            let thread = self.api.create_thread(&metadata).await?;

            info!(
                session_id = %session_id,
                thread_id = %thread.id,
                assistant = assistant.name.as_deref().unwrap_or(&assistant.id),
                "session started"
            );
            self.events.emit(ChatEvent::SessionStarted {
                session_id: session_id.to_string(),
                thread_id: thread.id.clone(),
            });
            self.session = Some(Session::new(session_id, thread, assistant));
        }
        self.session_ref()
    }

    /// Upload one file. Failures are reported as an event and yield `None`.
    pub async fn upload_file(&mut self, upload: &Upload) -> Option<FileRef> {
        match self.api.upload_file(upload).await {
            Ok(file) => {
                debug!(filename = %upload.filename, file_id = %file.id, "uploaded");
                if let Some(session) = self.session.as_mut() {
                    session
                        .filenames
                        .insert(file.id.clone(), upload.filename.clone());
                }
                self.events.emit(ChatEvent::Uploaded {
                    filename: upload.filename.clone(),
                    file_id: file.id.clone(),
                });
                Some(file)
            }
            Err(e) => {
                warn!(filename = %upload.filename, error = %e, "upload failed");
                self.events.emit(ChatEvent::UploadFailed {
                    filename: upload.filename.clone(),
                    error: format!("Error uploading file to OpenAI: {e}"),
                });
                None
            }
        }
    }

    /// Upload the site and competitor files, then ask for the report.
    ///
    /// Uploads run site first, then competitors in order. The throttle
    /// delay is applied before and after the batch and again before the
    /// prompt is posted.
    pub async fn submit_report(
        &mut self,
        request: ReportRequest,
        cancel: &CancellationToken,
    ) -> Result<ReportOutcome, ChatError> {
        if request.competitors.len() > MAX_COMPETITORS {
            return Err(ChatError::TooManyCompetitors {
                max: MAX_COMPETITORS,
                got: request.competitors.len(),
            });
        }
        self.initialize().await?;
        self.ensure_no_active_run()?;

        let throttle = self.settings.upload_throttle;
        self.pause(throttle, cancel).await?;

        let mut file_ids = Vec::new();
        for upload in request.site.iter().chain(request.competitors.iter()) {
            if let Some(file) = self.upload_file(upload).await {
                file_ids.push(file.id);
            }
        }

        self.pause(throttle, cancel).await?;

        if file_ids.is_empty() {
            info!("no files uploaded, report not submitted");
            return Ok(ReportOutcome::NothingUploaded);
        }

        let competitor_names: Vec<&str> = request
            .competitors
            .iter()
            .map(|u| u.filename.as_str())
            .collect();
        let prompt = compose_report_prompt(
            request.site.as_ref().map(|u| u.filename.as_str()),
            &competitor_names,
            &request.keyword,
        );

        self.pause(throttle, cancel).await?;

        let run = self.post_and_run(&prompt, &file_ids).await?;
        Ok(ReportOutcome::Submitted(run))
    }

    /// Post a plain chat message and start a run for it.
    pub async fn submit_chat_message(&mut self, text: &str) -> Result<Run, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        self.initialize().await?;
        self.ensure_no_active_run()?;
        self.post_and_run(text, &[]).await
    }

    /// Ask the service to stop the current run, if it is still active.
    ///
    /// Best-effort: a failed cancel is logged and otherwise ignored.
    pub async fn cancel_active_run(&mut self) {
        let Some((thread_id, run_id)) = self.session.as_ref().and_then(|s| {
            s.active_run()
                .map(|r| (r.thread_id.clone(), r.id.clone()))
        }) else {
            return;
        };

        match self.api.cancel_run(&thread_id, &run_id).await {
            Ok(run) => {
                info!(run_id = %run.id, status = %run.status, "run cancelled");
                if let Some(session) = self.session.as_mut() {
                    session.run = Some(run);
                }
            }
            Err(e) => warn!(run_id = %run_id, error = %e, "failed to cancel run"),
        }
    }

    /// Cancel any outstanding run and drop the session.
    pub async fn teardown(&mut self) {
        self.cancel_active_run().await;
        if let Some(session) = self.session.take() {
            info!(session_id = %session.session_id, "session closed");
        }
    }

    fn ensure_no_active_run(&self) -> Result<(), ChatError> {
        match self.session_ref()?.active_run() {
            Some(run) => Err(ChatError::RunInProgress(run.id.clone())),
            None => Ok(()),
        }
    }

    async fn post_and_run(&mut self, content: &str, file_ids: &[String]) -> Result<Run, ChatError> {
        let thread_id = self.session_ref()?.thread.id.clone();
        self.api
            .create_message(&thread_id, content, file_ids)
            .await?;
        self.start_run(&thread_id).await
    }

    /// Start a fresh run on the thread and make it the session's current run.
    pub(super) async fn start_run(&mut self, thread_id: &str) -> Result<Run, ChatError> {
        let assistant_id = self.session_ref()?.assistant.id.clone();
        let run = self.api.create_run(thread_id, &assistant_id).await?;
        info!(run_id = %run.id, status = %run.status, "run started");

        self.session_mut()?.run = Some(run.clone());
        self.events.emit(ChatEvent::RunStarted {
            run_id: run.id.clone(),
        });
        Ok(run)
    }

    /// Sleep for `duration` unless `cancel` fires first.
    pub(super) async fn pause(
        &self,
        duration: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), ChatError> {
        if cancel.is_cancelled() {
            return Err(ChatError::Cancelled);
        }
        if duration.is_zero() {
            return Ok(());
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ChatError::Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}
