//! Outgoing prompt and history assembly

use zola_ai::{Role, Turn};

use crate::message::{ChatMessage, UploadedFile};

/// Join the typed input with the text of every attached file.
///
/// The separator is always present, so input with no files ends in `"\n\n"`.
pub fn compose_prompt(input: &str, files: &[UploadedFile]) -> String {
    let attached = files
        .iter()
        .map(|f| f.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{}\n\n{}", input, attached)
}

/// Map prior messages to upstream turns.
///
/// Failed bubbles and empty placeholders carry nothing the model said, so they
/// are skipped. With a `limit`, only the newest `limit` turns are kept. The
/// result never opens with a model turn.
pub fn history_turns(messages: &[ChatMessage], limit: Option<usize>) -> Vec<Turn> {
    let turns: Vec<Turn> = messages
        .iter()
        .filter(|m| !m.is_failed() && !m.content.is_empty())
        .map(|m| Turn {
            role: m.sender.role(),
            parts: vec![zola_ai::Part::text(m.content.clone())],
        })
        .collect();

    let start = match limit {
        Some(limit) => turns.len().saturating_sub(limit),
        None => 0,
    };

    turns
        .into_iter()
        .skip(start)
        .skip_while(|t| t.role == Role::Model)
        .collect()
}
