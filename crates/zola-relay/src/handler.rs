//! The relay handler

use async_stream::stream;
use axum::{
    Json,
    body::{Body, Bytes},
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use futures::{Stream, StreamExt};
use tracing::{Instrument, Span};
use zola_ai::{RelayRequest, TextEvent, TextEventStream};

use crate::{error::RelayError, state::RelayState};

/// `POST /api/gemini`
///
/// The first upstream event is awaited before headers go out, so a request
/// that upstream rejects outright gets an error status instead of an empty
/// `200`. Everything after that is forwarded as it arrives.
pub async fn relay(
    State(state): State<RelayState>,
    Json(request): Json<RelayRequest>,
) -> Result<Response, RelayError> {
    let span = tracing::info_span!(
        "relay",
        model = %state.model.id,
        history = request.history.len(),
        prompt_chars = request.prompt.chars().count()
    );
    open_relay(state, request, span.clone()).instrument(span).await
}

async fn open_relay(
    state: RelayState,
    request: RelayRequest,
    span: Span,
) -> Result<Response, RelayError> {
    let contents = request.contents();
    tracing::debug!(turns = contents.len(), "relaying prompt");

    let mut upstream = match state.provider.stream(&state.model, &contents).await {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(retryable = e.is_retryable(), "failed to open upstream stream: {}", e);
            return Err(e.into());
        }
    };

    let mut head = None;
    while let Some(event) = upstream.next().await {
        match event {
            TextEvent::Start { .. } => continue,
            TextEvent::TextDelta { delta } => {
                head = Some(delta);
                break;
            }
            TextEvent::Done { .. } => break,
            TextEvent::Error { message } => {
                tracing::warn!("upstream failed before first chunk: {}", message);
                return Err(RelayError::UpstreamStream(message));
            }
        }
    }

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(relay_body(head, upstream, span)),
    )
        .into_response())
}

/// Forward upstream text as raw bytes. An upstream error after the first
/// chunk aborts the body so the client sees a broken stream, not a silent end.
fn relay_body(
    head: Option<String>,
    mut upstream: TextEventStream,
    span: Span,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    stream! {
        let mut chunks = 0usize;
        let mut bytes = 0usize;

        if let Some(text) = head {
            chunks += 1;
            bytes += text.len();
            yield Ok(Bytes::from(text));
        }

        while let Some(event) = upstream.next().await {
            match event {
                TextEvent::TextDelta { delta } => {
                    chunks += 1;
                    bytes += delta.len();
                    yield Ok(Bytes::from(delta));
                }
                TextEvent::Done { finish_reason, usage } => {
                    tracing::debug!(
                        parent: &span,
                        chunks,
                        bytes,
                        finish_reason = finish_reason.as_deref().unwrap_or("none"),
                        input_tokens = usage.input,
                        output_tokens = usage.output,
                        "relay stream complete"
                    );
                    return;
                }
                TextEvent::Error { message } => {
                    tracing::warn!(parent: &span, chunks, "upstream failed mid-stream: {}", message);
                    yield Err(std::io::Error::other(message));
                    return;
                }
                TextEvent::Start { .. } => {}
            }
        }

        tracing::debug!(parent: &span, chunks, bytes, "relay stream ended");
    }
}
