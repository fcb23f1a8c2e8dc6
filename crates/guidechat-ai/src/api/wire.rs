//! JSON shapes returned by the service, and their conversion to domain types.

use serde::Deserialize;

use crate::types::{Annotation, CitationSource, ContentBlock, Message, Role, Run, RunStatus};

#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub last_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunObject {
    id: String,
    thread_id: String,
    status: RunStatus,
    #[serde(default)]
    last_error: Option<RunErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RunErrorObject {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl From<RunObject> for Run {
    fn from(obj: RunObject) -> Self {
        let last_error = obj.last_error.map(|e| match (e.code, e.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (Some(code), None) => code,
            (None, Some(message)) => message,
            (None, None) => "unknown error".to_string(),
        });
        Run {
            id: obj.id,
            thread_id: obj.thread_id,
            status: obj.status,
            last_error,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageObject {
    id: String,
    role: Role,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: TextObject },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct TextObject {
    value: String,
    #[serde(default)]
    annotations: Vec<AnnotationObject>,
}

#[derive(Debug, Deserialize)]
struct AnnotationObject {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    file_citation: Option<FileCitationObject>,
    #[serde(default)]
    file_path: Option<FilePathObject>,
}

#[derive(Debug, Deserialize)]
struct FileCitationObject {
    file_id: String,
    #[serde(default)]
    quote: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FilePathObject {
    file_id: String,
}

impl From<AnnotationObject> for Annotation {
    fn from(obj: AnnotationObject) -> Self {
        let source = match (obj.kind.as_str(), obj.file_citation, obj.file_path) {
            ("file_citation", Some(c), _) => CitationSource::FileCitation {
                file_id: c.file_id,
                quote: c.quote.filter(|q| !q.is_empty()),
            },
            ("file_path", _, Some(p)) => CitationSource::FilePath { file_id: p.file_id },
            _ => CitationSource::Unknown,
        };
        Annotation {
            text: obj.text,
            source,
        }
    }
}

impl From<MessageObject> for Message {
    fn from(obj: MessageObject) -> Self {
        let content = obj
            .content
            .into_iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(ContentBlock {
                    text: text.value,
                    annotations: text.annotations.into_iter().map(Annotation::from).collect(),
                }),
                ContentPart::Other => None,
            })
            .collect();
        Message {
            id: obj.id,
            role: obj.role,
            content,
        }
    }
}
