//! zola-client: Chat session runtime
//!
//! This crate holds the conversation state, drives one send cycle at a time
//! against the relay endpoint, reassembles the streamed reply into a single
//! growing message, and extracts text from attached PDF files so it can ride
//! along with the next prompt.

pub mod decode;
pub mod error;
pub mod events;
pub mod extract;
pub mod handle;
pub mod message;
pub mod notification;
pub mod prompt;
pub mod session;
pub mod transport;

pub use error::{Error, Result};
pub use events::ChatEvent;
pub use extract::{ExtractionService, PdfExtractLib, PdfExtractor, UploadOutcome};
pub use handle::SessionHandle;
pub use message::{ChatMessage, GREETING, MessageId, MessageStatus, Sender, UploadedFile};
pub use notification::{Notification, NotificationBanner, NotificationKind};
pub use prompt::{compose_prompt, history_turns};
pub use session::{ChatSession, SendState, SessionConfig};
pub use transport::{ByteStream, HttpRelayTransport, RelayTransport};
