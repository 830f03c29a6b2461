//! Error types for zola-client

use thiserror::Error;

/// Result type alias using zola-client Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the chat client
#[derive(Error, Debug)]
pub enum Error {
    /// An error from the shared wire layer
    #[error(transparent)]
    Ai(#[from] zola_ai::Error),

    /// The relay answered with a non-success status
    #[error("Relay returned {status}: {message}")]
    Relay { status: u16, message: String },

    /// Connecting to or reading from the relay failed
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Only PDF attachments are accepted
    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    /// Reading or extracting text from an attachment failed
    #[error("Failed to parse {name}: {message}")]
    Extraction { name: String, message: String },

    /// A send was requested while another one is still in flight
    #[error("A message is already being sent")]
    Busy,
}

impl Error {
    /// Whether re-sending the same request might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Relay { status, .. } => *status >= 500 || *status == 429,
            Error::Transport(_) | Error::Io(_) => true,
            Error::Ai(e) => e.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_error_display() {
        let err = Error::Relay {
            status: 502,
            message: "Upstream error: UNAVAILABLE".into(),
        };
        assert_eq!(err.to_string(), "Relay returned 502: Upstream error: UNAVAILABLE");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_client_errors_not_retryable() {
        assert!(!Error::Busy.is_retryable());
        assert!(
            !Error::Relay {
                status: 400,
                message: "bad".into()
            }
            .is_retryable()
        );
        assert!(!Error::UnsupportedFile("notes.txt".into()).is_retryable());
    }
}
