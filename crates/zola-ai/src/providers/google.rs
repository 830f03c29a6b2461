//! Google Generative AI (Gemini) streaming provider

use crate::{
    error::{Error, Result},
    models::Model,
    providers::{LlmProvider, get_api_key},
    stream::{TextEvent, TextEventStream},
    types::{Turn, Usage},
};
use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest_eventsource::{Event, EventSource};
use serde::{Deserialize, Serialize};

/// Environment variables checked for the Gemini credential, in order
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Google Generative AI client
///
/// The credential is optional at construction time; a missing key surfaces as
/// [`Error::InvalidApiKey`] when a stream is requested.
pub struct GoogleProvider {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl GoogleProvider {
    /// Create a new Google provider with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: Some(api_key.into()),
        }
    }

    /// Create from an optional configured key, falling back to the environment
    pub fn from_config(api_key: Option<&str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: get_api_key(api_key, API_KEY_ENV_VARS).ok(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_config(None)
    }

    /// Whether a credential is available
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_request(&self, model: &Model, contents: &[Turn]) -> GeminiRequest {
        let tools = if model.search {
            Some(vec![GeminiTool {
                google_search: GoogleSearch {},
            }])
        } else {
            None
        };

        GeminiRequest {
            contents: contents.to_vec(),
            tools,
            generation_config: GeminiGenerationConfig {
                response_mime_type: "text/plain".to_string(),
            },
        }
    }
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    async fn stream(&self, model: &Model, contents: &[Turn]) -> Result<TextEventStream> {
        let api_key = self.api_key.as_deref().ok_or(Error::InvalidApiKey)?;
        let request = self.build_request(model, contents);
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            model.base_url, model.id
        );

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let key_value = reqwest::header::HeaderValue::from_str(api_key)
            .map_err(|_| Error::InvalidConfig("API key contains invalid characters".into()))?;
        headers.insert("x-goog-api-key", key_value);

        // Add model-specific headers
        for (key, value) in &model.headers {
            if let (Ok(name), Ok(val)) = (
                key.parse::<reqwest::header::HeaderName>(),
                value.parse::<reqwest::header::HeaderValue>(),
            ) {
                headers.insert(name, val);
            }
        }

        tracing::debug!(
            model = %model.id,
            turns = contents.len(),
            search = model.search,
            "opening Gemini stream"
        );

        let request_builder = self.client.post(&url).headers(headers).json(&request);

        let event_source = EventSource::new(request_builder)
            .map_err(|e| Error::Sse(format!("Failed to create event source: {}", e)))?;

        Ok(Box::pin(create_stream(event_source, model.id.clone())))
    }
}

/// Text, finish reason and usage carried by one SSE `data:` payload
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ParsedChunk {
    pub texts: Vec<String>,
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
}

/// Parse one streamed payload. An `{"error": ..}` payload becomes [`Error::Api`].
pub(crate) fn parse_chunk(data: &str) -> Result<ParsedChunk> {
    let response: GeminiStreamResponse = serde_json::from_str(data)?;
    if let Some(error) = response.error {
        return Err(error.into_api_error());
    }

    let mut chunk = ParsedChunk::default();
    for candidate in response.candidates {
        if let Some(content) = candidate.content {
            chunk.texts.extend(
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .filter(|t| !t.is_empty()),
            );
        }
        if candidate.finish_reason.is_some() {
            chunk.finish_reason = candidate.finish_reason;
        }
    }
    chunk.usage = response.usage_metadata.map(|u| Usage {
        input: u.prompt_token_count.unwrap_or(0),
        output: u.candidates_token_count.unwrap_or(0),
    });
    Ok(chunk)
}

/// Error for a non-2xx answer, from its JSON error body when there is one
async fn status_error(status: reqwest::StatusCode, response: reqwest::Response) -> Error {
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return Error::Http(e),
    };
    match serde_json::from_str::<GeminiErrorResponse>(&body) {
        Ok(parsed) => parsed.error.into_api_error(),
        Err(_) => Error::UnexpectedResponse(format!("HTTP {}: {}", status, body.trim())),
    }
}

/// Log an upstream failure and turn it into the terminal stream event
fn error_event(error: Error) -> TextEvent {
    tracing::warn!(retryable = error.is_retryable(), "Gemini stream failed: {}", error);
    TextEvent::Error {
        message: error.to_string(),
    }
}

fn create_stream(
    mut event_source: EventSource,
    model_id: String,
) -> impl futures::Stream<Item = TextEvent> {
    stream! {
        let mut finish_reason: Option<String> = None;
        let mut usage = Usage::default();

        yield TextEvent::Start { model: model_id };

        while let Some(event) = event_source.next().await {
            match event {
                Ok(Event::Open) => {}
                Ok(Event::Message(msg)) => {
                    if msg.data.is_empty() || msg.data == "[DONE]" {
                        continue;
                    }

                    match parse_chunk(&msg.data) {
                        Ok(chunk) => {
                            for text in chunk.texts {
                                yield TextEvent::TextDelta { delta: text };
                            }
                            if chunk.finish_reason.is_some() {
                                finish_reason = chunk.finish_reason;
                            }
                            if let Some(u) = chunk.usage {
                                usage = u;
                            }
                        }
                        Err(e) => {
                            event_source.close();
                            yield error_event(e);
                            return;
                        }
                    }
                }
                Err(reqwest_eventsource::Error::StreamEnded) => {
                    event_source.close();
                    break;
                }
                Err(reqwest_eventsource::Error::InvalidStatusCode(status, response)) => {
                    event_source.close();
                    yield error_event(status_error(status, response).await);
                    return;
                }
                Err(e) => {
                    event_source.close();
                    yield error_event(Error::Sse(e.to_string()));
                    return;
                }
            }
        }

        yield TextEvent::Done { finish_reason, usage };
    }
}

// Request types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Turn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTool>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_mime_type: String,
}

// Response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiStreamResponse {
    #[serde(default)]
    error: Option<GeminiError>,
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

// Search grounding can add non-text parts; only text is relayed.
#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    #[serde(default)]
    code: Option<u16>,
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GeminiError {
    fn into_api_error(self) -> Error {
        let error_type = match (self.status, self.code) {
            (Some(status), _) => status,
            (None, Some(code)) => code.to_string(),
            (None, None) => "error".to_string(),
        };
        Error::api(error_type, self.message)
    }
}
