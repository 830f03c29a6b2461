//! Streaming event types

use crate::types::Usage;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use tokio_stream::Stream;

/// Events emitted while the upstream model generates text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextEvent {
    /// Upstream accepted the request
    Start { model: String },
    /// A chunk of generated text, in generation order
    TextDelta { delta: String },
    /// Generation completed
    Done {
        finish_reason: Option<String>,
        usage: Usage,
    },
    /// Error occurred; no further events follow
    Error { message: String },
}

/// A stream of text events
pub type TextEventStream = Pin<Box<dyn Stream<Item = TextEvent> + Send>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_shape() {
        let json = serde_json::to_value(TextEvent::TextDelta { delta: "Hi".into() }).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "text_delta", "delta": "Hi" }));
    }
}
