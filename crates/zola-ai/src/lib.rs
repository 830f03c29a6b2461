//! zola-ai: Wire vocabulary and upstream model access
//!
//! This crate defines the `{ role, parts: [{ text }] }` turn format shared by
//! the relay and the chat client, and the streaming provider used by the relay
//! to talk to Gemini.

pub mod error;
pub mod models;
pub mod providers;
pub mod stream;
pub mod types;

pub use error::{Error, Result};
pub use models::Model;
pub use stream::{TextEvent, TextEventStream};
pub use types::*;
