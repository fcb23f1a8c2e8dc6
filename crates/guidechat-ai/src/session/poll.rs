//! Run polling: wait for the current run to finish, retrying failures
//! against the session's shared retry budget.

use std::collections::BTreeSet;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::citations::render_history;
use crate::types::{Message, RenderedMessage, Run, RunStatus};
use crate::{ChatError, RATE_LIMIT_MESSAGE};

use super::controller::ChatController;
use super::events::ChatEvent;
use super::state::MAX_RUN_RETRIES;

/// How a call to [`ChatController::poll_run`] ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The run completed; rendered history, oldest first.
    Completed(Vec<RenderedMessage>),
    /// The retry budget is spent and the run has not finished yet.
    /// Calling `poll_run` again takes one more look without waiting.
    Stalled(RunStatus),
    /// The run was cancelled, expired, or ended incomplete.
    Ended(RunStatus),
}

impl ChatController {
    /// Poll the session's current run until it reaches an outcome.
    ///
    /// Rate limits and network errors while fetching the run count against
    /// the session's retry budget. On cancellation or when the overall wait
    /// runs out, the run is cancelled server-side (best-effort) before the
    /// error is returned.
    pub async fn poll_run(&mut self, cancel: &CancellationToken) -> Result<PollOutcome, ChatError> {
        let result = self.poll_loop(cancel).await;
        if matches!(result, Err(ChatError::Cancelled | ChatError::PollTimeout)) {
            self.cancel_active_run().await;
        }
        result
    }

    async fn poll_loop(&mut self, cancel: &CancellationToken) -> Result<PollOutcome, ChatError> {
        let deadline = self.settings.run_timeout.map(|t| Instant::now() + t);

        loop {
            if cancel.is_cancelled() {
                return Err(ChatError::Cancelled);
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                warn!("gave up waiting for run");
                return Err(ChatError::PollTimeout);
            }

            let (thread_id, run, exhausted, retry_count) = {
                let session = self.session_ref()?;
                let run = session.run.clone().ok_or(ChatError::NoRun)?;
                (
                    session.thread.id.clone(),
                    run,
                    session.retries_exhausted(),
                    session.retry_count,
                )
            };
            debug!(run_id = %run.id, status = %run.status, retry_count, "poll");

            match run.status {
                RunStatus::Completed => {
                    let rendered = self.finish_run(&thread_id).await?;
                    return Ok(PollOutcome::Completed(rendered));
                }
                RunStatus::InProgress => {
                    self.events.emit(ChatEvent::Thinking);
                    if exhausted {
                        return self.last_look(&thread_id, &run.id).await;
                    }
                    self.pause(self.settings.thinking_interval, cancel).await?;
                    self.refresh_or_back_off(&thread_id, &run.id, cancel).await?;
                }
                RunStatus::Failed => {
                    let attempt = self.session_mut()?.record_failure();
                    warn!(
                        run_id = %run.id,
                        attempt,
                        error = run.last_error.as_deref().unwrap_or("none"),
                        "run failed"
                    );
                    self.back_off(attempt, cancel).await?;
                    self.start_run(&thread_id).await?;
                }
                RunStatus::Cancelled | RunStatus::Expired | RunStatus::Incomplete => {
                    info!(run_id = %run.id, status = %run.status, "run ended");
                    self.events.emit(ChatEvent::RunEnded { status: run.status });
                    self.events.emit(ChatEvent::Error(format!(
                        "The run ended with status \"{}\". Send your message again to retry.",
                        run.status
                    )));
                    return Ok(PollOutcome::Ended(run.status));
                }
                RunStatus::Queued
                | RunStatus::RequiresAction
                | RunStatus::Cancelling
                | RunStatus::Unknown => {
                    if exhausted {
                        return self.last_look(&thread_id, &run.id).await;
                    }
                    if self.refresh_or_back_off(&thread_id, &run.id, cancel).await? {
                        self.pause(self.settings.retry_delay, cancel).await?;
                    }
                }
            }
        }
    }

    /// One refresh without waiting, used once the retry budget is spent.
    async fn last_look(&mut self, thread_id: &str, run_id: &str) -> Result<PollOutcome, ChatError> {
        let run = match self.refresh_run(thread_id, run_id).await {
            Ok(run) => run,
            Err(e) if e.is_transient() => {
                warn!(run_id, error = %e, "run status unavailable");
                let status = self.session_ref()?.run.as_ref().map(|r| r.status);
                return Ok(PollOutcome::Stalled(status.unwrap_or(RunStatus::Unknown)));
            }
            Err(e) => return Err(e),
        };
        if run.status == RunStatus::Completed {
            let rendered = self.finish_run(thread_id).await?;
            return Ok(PollOutcome::Completed(rendered));
        }
        debug!(run_id, status = %run.status, "retry budget spent, not waiting");
        Ok(PollOutcome::Stalled(run.status))
    }

    /// Refresh the run. A transient failure is counted as a failed attempt
    /// and waited out; returns whether the refresh succeeded.
    async fn refresh_or_back_off(
        &mut self,
        thread_id: &str,
        run_id: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, ChatError> {
        match self.refresh_run(thread_id, run_id).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_transient() => {
                let attempt = self.session_mut()?.record_failure();
                warn!(run_id, attempt, error = %e, "could not fetch run status");
                self.back_off(attempt, cancel).await?;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Report a failed attempt: give up once the budget is spent, otherwise
    /// announce the retry and wait.
    async fn back_off(&mut self, attempt: u32, cancel: &CancellationToken) -> Result<(), ChatError> {
        if attempt >= MAX_RUN_RETRIES {
            self.events
                .emit(ChatEvent::Error(RATE_LIMIT_MESSAGE.to_string()));
            return Err(ChatError::RetriesExhausted);
        }
        self.events.emit(ChatEvent::Retrying {
            attempt,
            max: MAX_RUN_RETRIES,
        });
        self.pause(self.settings.retry_delay, cancel).await
    }

    async fn refresh_run(&mut self, thread_id: &str, run_id: &str) -> Result<Run, ChatError> {
        let run = self.api.retrieve_run(thread_id, run_id).await?;
        self.session_mut()?.run = Some(run.clone());
        Ok(run)
    }

    /// Fetch the thread once, resolve citation filenames, render and publish.
    async fn finish_run(&mut self, thread_id: &str) -> Result<Vec<RenderedMessage>, ChatError> {
        let messages = self.api.list_messages(thread_id).await?;
        self.resolve_filenames(&messages).await;

        let rendered = {
            let session = self.session_mut()?;
            let rendered = render_history(&messages, &session.filenames);
            session.messages = messages;
            rendered
        };

        info!(messages = rendered.len(), "run completed");
        self.events.emit(ChatEvent::Messages(rendered.clone()));
        Ok(rendered)
    }

    /// Look up filenames for cited files not already known to the session.
    async fn resolve_filenames(&mut self, messages: &[Message]) {
        let missing: BTreeSet<String> = {
            let Some(session) = self.session.as_ref() else {
                return;
            };
            messages
                .iter()
                .flat_map(|m| &m.content)
                .flat_map(|b| &b.annotations)
                .filter_map(|a| a.source.file_id())
                .filter(|id| !session.filenames.contains_key(*id))
                .map(str::to_string)
                .collect()
        };

        for file_id in missing {
            match self.api.retrieve_file(&file_id).await {
                Ok(file) => {
                    if let Some(session) = self.session.as_mut() {
                        session.filenames.insert(file_id, file.filename);
                    }
                }
                Err(e) => warn!(file_id = %file_id, error = %e, "could not resolve cited file"),
            }
        }
    }
}
