//! Chat messages and attached files

use serde::{Deserialize, Serialize};
use std::fmt;
use zola_ai::Role;

/// The assistant's opening line in every fresh or cleared conversation
pub const GREETING: &str =
    "Hi, I am your friendly neighborhood Arnim-ZOLA. How can I assist you today?";

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Upstream role for this sender
    pub fn role(&self) -> Role {
        match self {
            Sender::User => Role::User,
            Sender::Assistant => Role::Model,
        }
    }
}

/// Opaque message identifier, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub(crate) u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a message bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Complete,
    /// Text is still arriving
    Streaming,
    /// The send cycle that produced this bubble failed
    Failed,
}

/// One message bubble in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: Sender,
    pub content: String,
    pub status: MessageStatus,
}

impl ChatMessage {
    pub fn user(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            id,
            sender: Sender::User,
            content: content.into(),
            status: MessageStatus::Complete,
        }
    }

    pub fn assistant(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            id,
            sender: Sender::Assistant,
            content: content.into(),
            status: MessageStatus::Complete,
        }
    }

    /// Empty assistant bubble that fills in as the reply streams
    pub fn placeholder(id: MessageId) -> Self {
        Self {
            id,
            sender: Sender::Assistant,
            content: String::new(),
            status: MessageStatus::Streaming,
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.status == MessageStatus::Streaming
    }

    pub fn is_failed(&self) -> bool {
        self.status == MessageStatus::Failed
    }
}

/// Text extracted from an attached document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// File name as shown in the attachment list (not unique)
    pub name: String,
    pub content: String,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}
