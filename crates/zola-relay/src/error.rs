//! Error responses produced by the relay

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures that happen before the first byte of a relay response
#[derive(Error, Debug)]
pub enum RelayError {
    /// The upstream stream could not be opened
    #[error(transparent)]
    Upstream(#[from] zola_ai::Error),

    /// The upstream stream failed before producing any text
    #[error("Upstream error: {0}")]
    UpstreamStream(String),
}

impl RelayError {
    /// HTTP status for this failure
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Upstream(zola_ai::Error::InvalidApiKey) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            RelayError::Upstream(zola_ai::Error::InvalidApiKey) => {
                "Upstream credential is not configured".to_string()
            }
            other => other.to_string(),
        };
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}
