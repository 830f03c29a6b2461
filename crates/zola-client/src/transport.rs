//! Transport to the relay endpoint

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use zola_ai::RelayRequest;

use crate::error::{Error, Result};

/// Relay endpoint used when nothing is configured
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000/api/gemini";

/// Raw body chunks, in arrival order
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Opens a streamed reply for one relay request
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Send the request and return the response body as a byte stream.
    ///
    /// Resolves once the relay has answered with a success status; body bytes
    /// then arrive through the stream.
    async fn open(&self, request: &RelayRequest) -> Result<ByteStream>;
}

/// HTTP transport posting JSON to the relay
pub struct HttpRelayTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpRelayTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpRelayTransport {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_URL)
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn open(&self, request: &RelayRequest) -> Result<ByteStream> {
        tracing::debug!(
            url = %self.url,
            history = request.history.len(),
            "posting to relay"
        );

        let response = self.client.post(&self.url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match body.trim() {
                "" => status.canonical_reason().unwrap_or("request failed").to_string(),
                text => text.to_string(),
            };
            return Err(Error::Relay {
                status: status.as_u16(),
                message,
            });
        }

        Ok(Box::pin(
            response.bytes_stream().map(|chunk| chunk.map_err(Error::from)),
        ))
    }
}
