//! Terminal rendering of controller events.

use guidechat_ai::{ChatEvent, RenderedMessage};

/// Text to print for an event, if any.
pub fn render_event(event: &ChatEvent) -> Option<String> {
    match event {
        ChatEvent::SessionStarted { thread_id, .. } => {
            Some(format!("Connected to assistant (thread {thread_id})."))
        }
        ChatEvent::Uploaded { filename, .. } => Some(format!("Uploaded {filename}.")),
        ChatEvent::UploadFailed { error, .. } => Some(banner(error)),
        ChatEvent::Thinking => Some("Thinking ......".to_string()),
        ChatEvent::Retrying { attempt, max } => {
            Some(format!("Run failed, retrying ...... ({attempt}/{max})"))
        }
        ChatEvent::Error(message) => Some(banner(message)),
        ChatEvent::Messages(history) => Some(render_history(history)),
        ChatEvent::RunStarted { .. } | ChatEvent::RunEnded { .. } => None,
    }
}

pub fn banner(message: &str) -> String {
    format!("[!] {message}")
}

/// One `role: text` paragraph per content block, oldest message first.
pub fn render_history(history: &[RenderedMessage]) -> String {
    history
        .iter()
        .flat_map(|message| {
            let role = message.role.as_str();
            message
                .blocks
                .iter()
                .map(move |block| format!("{role}: {block}"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn print_event(event: &ChatEvent) {
    if let Some(text) = render_event(event) {
        println!("{text}");
    }
}
