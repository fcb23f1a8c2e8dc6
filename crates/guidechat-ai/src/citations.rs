//! Citation rewriting for assistant answers.
//!
//! Each annotation's marker text is swapped for ` [i]` (i = the
//! annotation's position in the block) and a footer with one line per
//! annotation is appended below the text.

use std::collections::HashMap;

use crate::types::{CitationSource, ContentBlock, Message, RenderedMessage};

/// Render one content block. `filename_for` maps a file id to a display name.
pub fn render_block(block: &ContentBlock, filename_for: impl Fn(&str) -> String) -> String {
    let mut text = block.text.clone();
    let mut footer = Vec::with_capacity(block.annotations.len());

    for (index, annotation) in block.annotations.iter().enumerate() {
        // An empty marker would match between every character.
        if !annotation.text.is_empty() {
            text = text.replacen(&annotation.text, &format!(" [{index}]"), 1);
        }
        footer.push(citation_line(index, &annotation.source, &filename_for));
    }

    if !footer.is_empty() {
        text.push('\n');
        text.push_str(&footer.join("\n"));
    }
    text
}

fn citation_line(
    index: usize,
    source: &CitationSource,
    filename_for: &impl Fn(&str) -> String,
) -> String {
    match source {
        CitationSource::FileCitation {
            file_id,
            quote: Some(quote),
        } => format!("[{index}] {quote} from {}", filename_for(file_id)),
        CitationSource::FileCitation { file_id, quote: None } => {
            format!("[{index}] from {}", filename_for(file_id))
        }
        CitationSource::FilePath { file_id } => {
            format!("[{index}] Click <here> to download {}", filename_for(file_id))
        }
        CitationSource::Unknown => format!("[{index}] (unresolved citation)"),
    }
}

/// Render fetched messages for display: oldest first, user and assistant only.
///
/// `messages` is in the service's listing order (newest first). Unknown file
/// ids fall back to the id itself.
pub fn render_history(
    messages: &[Message],
    filenames: &HashMap<String, String>,
) -> Vec<RenderedMessage> {
    let lookup = |id: &str| filenames.get(id).cloned().unwrap_or_else(|| id.to_string());

    messages
        .iter()
        .rev()
        .filter(|m| m.role.is_displayed())
        .map(|m| RenderedMessage {
            role: m.role,
            blocks: m.content.iter().map(|b| render_block(b, lookup)).collect(),
        })
        .collect()
}
