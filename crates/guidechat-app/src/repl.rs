//! Interactive front-end: report submission and the chat loop.

use std::future::Future;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use guidechat_ai::{ChatController, ChatError, ChatEvent, PollOutcome, ReportOutcome, ReportRequest};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::display::{banner, print_event};

/// What the user typed at the chat prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Empty,
    Quit,
    /// Check the current run again without waiting.
    Poll,
    Cancel,
    /// Drop the session and start a fresh thread.
    Reset,
    Help,
    Unknown(String),
    Message(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Input::Empty;
        }
        if !line.starts_with('/') {
            return Input::Message(line.to_string());
        }
        match line {
            "/quit" | "/exit" => Input::Quit,
            "/poll" => Input::Poll,
            "/cancel" => Input::Cancel,
            "/reset" => Input::Reset,
            "/help" => Input::Help,
            other => Input::Unknown(other.to_string()),
        }
    }
}

const HELP: &str = "Type a message to chat. Commands: /poll, /cancel, /reset, /help, /quit";

/// Routes Ctrl-C to the operation in flight. When idle, the first Ctrl-C
/// requests an orderly shutdown and a second one exits immediately.
#[derive(Clone, Default)]
pub struct Interrupts {
    current: Arc<Mutex<Option<CancellationToken>>>,
    shutdown: CancellationToken,
}

impl Interrupts {
    pub fn install() -> Self {
        let interrupts = Self::default();
        let handle = interrupts.clone();
        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!("Failed to listen for ctrl-c: {e}");
                    return;
                }
                handle.interrupt();
            }
        });
        interrupts
    }

    fn interrupt(&self) {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        match current.as_ref() {
            Some(token) => token.cancel(),
            None if self.shutdown.is_cancelled() => {
                println!();
                std::process::exit(130);
            }
            None => self.shutdown.cancel(),
        }
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Token for one operation; Ctrl-C cancels it until `end` is called.
    fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        token
    }

    fn end(&self) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Run `operation` to completion, printing events as they arrive.
async fn drive<T>(
    events: &mut UnboundedReceiver<ChatEvent>,
    operation: impl Future<Output = T>,
) -> T {
    tokio::pin!(operation);
    loop {
        tokio::select! {
            output = &mut operation => {
                while let Ok(event) = events.try_recv() {
                    print_event(&event);
                }
                return output;
            }
            Some(event) = events.recv() => print_event(&event),
        }
    }
}

fn report_error(err: &ChatError) {
    match err {
        // Already shown through the error event.
        ChatError::RetriesExhausted => {}
        ChatError::Cancelled => println!("Cancelled."),
        other => println!("{}", banner(&other.to_string())),
    }
}

pub struct Repl {
    controller: ChatController,
    events: UnboundedReceiver<ChatEvent>,
    interrupts: Interrupts,
}

impl Repl {
    pub fn new(
        controller: ChatController,
        events: UnboundedReceiver<ChatEvent>,
        interrupts: Interrupts,
    ) -> Self {
        Self {
            controller,
            events,
            interrupts,
        }
    }

    /// Open the session. Failure here is fatal for the process.
    pub async fn start(&mut self) -> Result<(), ChatError> {
        drive(&mut self.events, self.controller.initialize())
            .await
            .map(|_| ())
    }

    pub async fn report(&mut self, request: ReportRequest) {
        let token = self.interrupts.begin();
        let submitted = drive(
            &mut self.events,
            self.controller.submit_report(request, &token),
        )
        .await;
        self.interrupts.end();

        match submitted {
            Ok(ReportOutcome::Submitted(run)) => {
                info!(run_id = %run.id, "report submitted");
                self.poll().await;
            }
            Ok(ReportOutcome::NothingUploaded) => {
                println!("{}", banner("No files were uploaded, so no report was requested."));
            }
            Err(e) => report_error(&e),
        }
    }

    /// Poll the current run until it settles, honouring Ctrl-C.
    async fn poll(&mut self) {
        let token = self.interrupts.begin();
        let outcome = drive(&mut self.events, self.controller.poll_run(&token)).await;
        self.interrupts.end();

        match outcome {
            Ok(PollOutcome::Completed(_)) | Ok(PollOutcome::Ended(_)) => {}
            Ok(PollOutcome::Stalled(status)) => println!(
                "The assistant has not finished yet (status: {status}). Type /poll to check again."
            ),
            Err(e) => report_error(&e),
        }
    }

    async fn send(&mut self, text: &str) {
        let submitted = drive(&mut self.events, self.controller.submit_chat_message(text)).await;
        match submitted {
            Ok(_) => self.poll().await,
            Err(e) => report_error(&e),
        }
    }

    async fn reset(&mut self) {
        self.controller.teardown().await;
        match self.start().await {
            Ok(()) => println!("Started a new conversation."),
            Err(e) => report_error(&e),
        }
    }

    /// Read lines from stdin until `/quit`, end of input, or Ctrl-C.
    pub async fn chat(&mut self) {
        self.chat_from(BufReader::new(tokio::io::stdin())).await;
    }

    async fn chat_from(&mut self, input: impl AsyncBufRead + Unpin) {
        if self.interrupts.shutdown_requested() {
            return;
        }
        println!("{HELP}");
        let mut lines = input.lines();
        let shutdown = self.interrupts.shutdown.clone();

        loop {
            print!("> ");
            let _ = std::io::stdout().flush();

            let read = tokio::select! {
                _ = shutdown.cancelled() => {
                    println!();
                    break;
                }
                read = lines.next_line() => read,
            };
            let line = match read {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read input: {e}");
                    break;
                }
            };

            match Input::parse(&line) {
                Input::Empty => {}
                Input::Quit => break,
                Input::Poll => self.poll().await,
                Input::Cancel => self.controller.cancel_active_run().await,
                Input::Reset => self.reset().await,
                Input::Help => println!("{HELP}"),
                Input::Unknown(command) => {
                    println!("{}", banner(&format!("Unknown command {command}. {HELP}")))
                }
                Input::Message(text) => self.send(&text).await,
            }
        }
    }

    /// Cancel any outstanding run and close the session.
    pub async fn shutdown(mut self) {
        self.controller.teardown().await;
    }
}
