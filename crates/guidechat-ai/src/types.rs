//! Domain types for threads, messages, runs and files.
//!
//! These are what the rest of the crate works with. The HTTP layer decodes
//! the service's JSON into private wire structs and converts them here.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    #[serde(other)]
    Other,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Other => "other",
        }
    }

    /// Whether messages with this role appear in the chat history.
    pub fn is_displayed(self) -> bool {
        matches!(self, Role::User | Role::Assistant)
    }
}

/// A message on a thread, as fetched from the service.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

/// One text part of a message and the citation markers inside it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentBlock {
    pub text: String,
    pub annotations: Vec<Annotation>,
}

/// A marker span in a content block's text.
///
/// `text` is the exact substring the service placed in the answer
/// (e.g. `【4:0†source】`).
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub source: CitationSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CitationSource {
    /// A quote taken from an uploaded file.
    FileCitation {
        file_id: String,
        quote: Option<String>,
    },
    /// A file generated by the assistant that can be downloaded.
    FilePath { file_id: String },
    /// An annotation type this client does not understand.
    Unknown,
}

impl CitationSource {
    pub fn file_id(&self) -> Option<&str> {
        match self {
            CitationSource::FileCitation { file_id, .. } | CitationSource::FilePath { file_id } => {
                Some(file_id)
            }
            CitationSource::Unknown => None,
        }
    }
}

/// Lifecycle status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    #[serde(alias = "running")]
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }

    /// The service will not change this run any further.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Cancelled
                | RunStatus::Failed
                | RunStatus::Completed
                | RunStatus::Incomplete
                | RunStatus::Expired
        )
    }

    /// The run may still produce an answer. A new run must not be started
    /// on the same thread while this holds.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            RunStatus::Queued
                | RunStatus::InProgress
                | RunStatus::RequiresAction
                | RunStatus::Unknown
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a run. Replaced wholesale on every poll.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub id: String,
    pub thread_id: String,
    pub status: RunStatus,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileRef {
    pub id: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThreadRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssistantRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// A local file waiting to be sent to the service.
#[derive(Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// MIME type sent with the multipart part.
    pub fn mime_type(&self) -> &'static str {
        match self.filename.rsplit('.').next().map(str::to_ascii_lowercase) {
            Some(ext) if ext == "pdf" => "application/pdf",
            Some(ext) if ext == "txt" => "text/plain",
            Some(ext) if ext == "md" => "text/markdown",
            _ => "application/octet-stream",
        }
    }
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("filename", &self.filename)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// A message ready for display: citation markers rewritten, footers appended.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub role: Role,
    pub blocks: Vec<String>,
}
