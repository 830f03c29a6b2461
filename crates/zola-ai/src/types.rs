//! Core types shared by the relay and the chat client

use serde::{Deserialize, Serialize};

/// Conversation roles in the upstream vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Get the role as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// A single text part of a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One conversation turn: `{ role, parts: [{ text }] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Turn {
    /// Create a user turn with a single text part
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
        }
    }

    /// Create a model turn with a single text part
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::text(text)],
        }
    }

    /// Get combined text content
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Body of a relay request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayRequest {
    /// The composed prompt (user input plus attached document text)
    pub prompt: String,
    /// Prior conversation turns, oldest first
    #[serde(default)]
    pub history: Vec<Turn>,
}

impl RelayRequest {
    /// Create a new request
    pub fn new(prompt: impl Into<String>, history: Vec<Turn>) -> Self {
        Self {
            prompt: prompt.into(),
            history,
        }
    }

    /// Full upstream context: the history followed by the new user turn
    pub fn contents(&self) -> Vec<Turn> {
        let mut contents = self.history.clone();
        contents.push(Turn::user(self.prompt.clone()));
        contents
    }
}

/// Token usage reported by the upstream service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input: u32,
    pub output: u32,
}
