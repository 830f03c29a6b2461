//! Chat session event types

use serde::{Deserialize, Serialize};

use crate::{
    message::{ChatMessage, MessageId},
    notification::NotificationKind,
};

/// Events emitted by the chat session and its handle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A send cycle started; the typing indicator is on
    SendStart,

    /// A message bubble was added (user bubble or assistant placeholder)
    MessageStart { message: ChatMessage },

    /// Decoded text appended to a streaming bubble
    MessageDelta { id: MessageId, delta: String },

    /// A bubble changed status or content wholesale
    MessageUpdate { message: ChatMessage },

    /// A streaming bubble completed; the typing indicator is off
    MessageEnd { message: ChatMessage },

    /// A bubble was removed (a failed reply being retried)
    MessageRemoved { id: MessageId },

    /// The send cycle failed; the typing indicator is off
    SendFailed { error: String },

    /// The conversation was reset to the greeting
    Cleared { greeting: ChatMessage },

    /// An attachment finished extracting
    FileAdded { name: String },

    /// Attachments with this name were removed
    FileRemoved { name: String, removed: usize },

    /// A transient user-facing notice
    Notification {
        kind: NotificationKind,
        message: String,
    },
}

impl ChatEvent {
    /// Check if this event ends a send cycle
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChatEvent::MessageEnd { .. } | ChatEvent::SendFailed { .. })
    }
}
