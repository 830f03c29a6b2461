//! Chat session state and the send cycle

use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::broadcast;
use zola_ai::RelayRequest;

use crate::{
    decode::Utf8ChunkDecoder,
    error::{Error, Result},
    events::ChatEvent,
    handle::SessionHandle,
    message::{ChatMessage, GREETING, MessageId, MessageStatus, UploadedFile},
    prompt::{compose_prompt, history_turns},
    transport::RelayTransport,
};

/// Default number of prior turns replayed upstream
pub const DEFAULT_HISTORY_LIMIT: usize = 40;

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Keep only this many prior turns in each request (`None` = all)
    pub history_limit: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

/// Where the session is in its send cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendState {
    Idle,
    /// Request dispatched, no response yet
    Sending,
    /// Response body is arriving
    Streaming,
    Done,
    Failed { error: String },
}

impl SendState {
    pub fn is_busy(&self) -> bool {
        matches!(self, SendState::Sending | SendState::Streaming)
    }
}

/// The request of a failed cycle, kept for `retry`
#[derive(Debug, Clone)]
struct FailedSend {
    request: RelayRequest,
    placeholder: MessageId,
}

/// One conversation with the relay
pub struct ChatSession {
    config: SessionConfig,
    messages: Vec<ChatMessage>,
    state: SendState,
    next_id: u64,
    transport: Arc<dyn RelayTransport>,
    event_tx: broadcast::Sender<ChatEvent>,
    handle: SessionHandle,
    failed: Option<FailedSend>,
}

impl ChatSession {
    /// Create a session that opens with the greeting
    pub fn new(config: SessionConfig, transport: Arc<dyn RelayTransport>) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        let handle = SessionHandle::new(event_tx.clone());
        let mut session = Self {
            config,
            messages: vec![],
            state: SendState::Idle,
            next_id: 0,
            transport,
            event_tx,
            handle,
            failed: None,
        };
        let id = session.next_id();
        session.messages.push(ChatMessage::assistant(id, GREETING));
        session
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.event_tx.subscribe()
    }

    /// Get a cloneable handle for attachments and the typing flag
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> &SendState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn set_history_limit(&mut self, limit: Option<usize>) {
        self.config.history_limit = limit;
    }

    pub fn is_typing(&self) -> bool {
        self.handle.is_typing()
    }

    /// Current attachments
    pub fn files(&self) -> Vec<UploadedFile> {
        self.handle.files()
    }

    /// Whether the last cycle failed and can be retried
    pub fn can_retry(&self) -> bool {
        self.failed.is_some() && !self.state.is_busy()
    }

    fn next_id(&mut self) -> MessageId {
        self.next_id += 1;
        MessageId(self.next_id)
    }

    /// Send typed input, streaming the reply into a new assistant bubble.
    ///
    /// Blank input is ignored. The attachments are snapshotted before
    /// dispatch; files that finish extracting later only affect the next send.
    pub async fn send(&mut self, input: &str) -> Result<()> {
        if input.trim().is_empty() {
            return Ok(());
        }
        if self.state.is_busy() {
            return Err(Error::Busy);
        }

        let files = self.handle.files();
        let prompt = compose_prompt(input, &files);
        let history = history_turns(&self.messages, self.config.history_limit);

        tracing::debug!(
            attachments = files.len(),
            history = history.len(),
            "sending prompt"
        );

        let id = self.next_id();
        let user = ChatMessage::user(id, input);
        self.messages.push(user.clone());
        let _ = self.event_tx.send(ChatEvent::MessageStart { message: user });

        self.failed = None;
        self.run(RelayRequest::new(prompt, history)).await
    }

    /// Re-send the request of a failed cycle in place of its failed bubble.
    ///
    /// Returns `false` if there is nothing to retry.
    pub async fn retry(&mut self) -> Result<bool> {
        if self.state.is_busy() {
            return Err(Error::Busy);
        }
        let Some(failed) = self.failed.take() else {
            return Ok(false);
        };

        self.messages.retain(|m| m.id != failed.placeholder);
        let _ = self.event_tx.send(ChatEvent::MessageRemoved {
            id: failed.placeholder,
        });

        tracing::debug!("retrying failed send");
        self.run(failed.request).await?;
        Ok(true)
    }

    /// Reset the conversation to the greeting alone.
    ///
    /// Attachments are kept.
    pub fn clear(&mut self) -> Result<()> {
        if self.state.is_busy() {
            return Err(Error::Busy);
        }
        let id = self.next_id();
        let greeting = ChatMessage::assistant(id, GREETING);
        self.messages = vec![greeting.clone()];
        self.state = SendState::Idle;
        self.failed = None;
        let _ = self.event_tx.send(ChatEvent::Cleared { greeting });
        Ok(())
    }

    async fn run(&mut self, request: RelayRequest) -> Result<()> {
        self.state = SendState::Sending;
        self.handle.set_typing(true);
        let _ = self.event_tx.send(ChatEvent::SendStart);

        let id = self.next_id();
        let placeholder = ChatMessage::placeholder(id);
        self.messages.push(placeholder.clone());
        let _ = self.event_tx.send(ChatEvent::MessageStart {
            message: placeholder,
        });

        let mut body = match self.transport.open(&request).await {
            Ok(body) => body,
            Err(e) => return Err(self.fail(id, request, e)),
        };

        self.state = SendState::Streaming;
        let mut decoder = Utf8ChunkDecoder::new();
        let mut chunks = 0usize;

        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(bytes) => {
                    chunks += 1;
                    let text = decoder.push(&bytes);
                    self.append(id, text);
                }
                Err(e) => {
                    let tail = decoder.finish();
                    self.append(id, tail);
                    return Err(self.fail(id, request, e));
                }
            }
        }

        let tail = decoder.finish();
        self.append(id, tail);

        let message = match self.message_mut(id) {
            Some(message) => {
                message.status = MessageStatus::Complete;
                message.clone()
            }
            None => ChatMessage::assistant(id, ""),
        };

        tracing::debug!(chunks, chars = message.content.chars().count(), "reply complete");

        self.state = SendState::Done;
        self.handle.set_typing(false);
        let _ = self.event_tx.send(ChatEvent::MessageEnd { message });
        Ok(())
    }

    fn message_mut(&mut self, id: MessageId) -> Option<&mut ChatMessage> {
        self.messages.iter_mut().rev().find(|m| m.id == id)
    }

    fn append(&mut self, id: MessageId, delta: String) {
        if delta.is_empty() {
            return;
        }
        if let Some(message) = self.message_mut(id) {
            message.content.push_str(&delta);
            let message = message.clone();
            let _ = self.event_tx.send(ChatEvent::MessageDelta { id, delta });
            // Full content after every piece, so a lagging subscriber can resync
            let _ = self.event_tx.send(ChatEvent::MessageUpdate { message });
        }
    }

    /// Mark the placeholder failed, keep the request for retry, hand the
    /// error back to the caller.
    fn fail(&mut self, id: MessageId, request: RelayRequest, error: Error) -> Error {
        let text = error.to_string();
        tracing::warn!(retryable = error.is_retryable(), "send failed: {}", text);

        if let Some(message) = self.message_mut(id) {
            message.status = MessageStatus::Failed;
            message.content = if message.content.is_empty() {
                format!("Error: {}", text)
            } else {
                format!("{}\n\nError: {}", message.content, text)
            };
            let message = message.clone();
            let _ = self.event_tx.send(ChatEvent::MessageUpdate { message });
        }

        self.failed = Some(FailedSend {
            request,
            placeholder: id,
        });
        self.state = SendState::Failed {
            error: text.clone(),
        };
        self.handle.set_typing(false);
        let _ = self.event_tx.send(ChatEvent::SendFailed { error: text });
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;
    use crate::transport::ByteStream;
    use async_trait::async_trait;
    use bytes::Bytes;
    use parking_lot::Mutex;
    use zola_ai::Turn;

    /// One scripted reply: either an open failure or a list of body chunks,
    /// where an `Err` chunk breaks the body.
    enum Reply {
        Refuse(u16, &'static str),
        Body(Vec<std::result::Result<Vec<u8>, &'static str>>),
    }

    /// A transport that replays scripted replies and records every request.
    struct MockTransport {
        replies: Mutex<Vec<Reply>>,
        requests: Arc<Mutex<Vec<RelayRequest>>>,
    }

    impl MockTransport {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl RelayTransport for MockTransport {
        async fn open(&self, request: &RelayRequest) -> Result<ByteStream> {
            self.requests.lock().push(request.clone());
            let reply = {
                let mut replies = self.replies.lock();
                if replies.is_empty() {
                    Reply::Body(vec![Ok(b"done".to_vec())])
                } else {
                    replies.remove(0)
                }
            };

            match reply {
                Reply::Refuse(status, message) => Err(Error::Relay {
                    status,
                    message: message.to_string(),
                }),
                Reply::Body(chunks) => {
                    let stream: ByteStream = Box::pin(async_stream::stream! {
                        for chunk in chunks {
                            match chunk {
                                Ok(bytes) => yield Ok(Bytes::from(bytes)),
                                Err(msg) => {
                                    yield Err(Error::Io(std::io::Error::other(msg)));
                                    return;
                                }
                            }
                        }
                    });
                    Ok(stream)
                }
            }
        }
    }

    fn body(chunks: &[&str]) -> Reply {
        Reply::Body(chunks.iter().map(|c| Ok(c.as_bytes().to_vec())).collect())
    }

    fn session(replies: Vec<Reply>) -> (ChatSession, Arc<Mutex<Vec<RelayRequest>>>) {
        let transport = MockTransport::new(replies);
        let requests = Arc::clone(&transport.requests);
        (
            ChatSession::new(SessionConfig::default(), Arc::new(transport)),
            requests,
        )
    }

    #[test]
    fn test_new_session_has_greeting() {
        let (session, _) = session(vec![]);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].content, GREETING);
        assert_eq!(session.messages()[0].sender, Sender::Assistant);
        assert_eq!(*session.state(), SendState::Idle);
    }

    #[tokio::test]
    async fn test_first_send_request_shape() {
        let (mut session, requests) = session(vec![body(&["Hi", " there"])]);
        session.send("Hello").await.unwrap();

        let requests = requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, "Hello\n\n");
        assert!(requests[0].history.is_empty());
    }

    #[tokio::test]
    async fn test_reply_streams_into_single_bubble() {
        let (mut session, _) = session(vec![body(&["Hel", "lo, ", "world"])]);
        let mut rx = session.subscribe();
        session.send("Hello").await.unwrap();

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].content, "Hello");
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[2].content, "Hello, world");
        assert_eq!(messages[2].status, MessageStatus::Complete);
        assert_eq!(*session.state(), SendState::Done);
        assert!(!session.is_typing());

        let mut deltas = Vec::new();
        let mut ended = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                ChatEvent::MessageDelta { delta, .. } => deltas.push(delta),
                ChatEvent::MessageEnd { message } => {
                    ended = true;
                    assert_eq!(message.content, "Hello, world");
                }
                _ => {}
            }
        }
        assert_eq!(deltas, vec!["Hel", "lo, ", "world"]);
        assert!(ended);
    }

    #[tokio::test]
    async fn test_send_event_sequence() {
        let (mut session, _) = session(vec![body(&["Hel", "lo"])]);
        let mut rx = session.subscribe();
        session.send("Hi").await.unwrap();

        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push(match event {
                ChatEvent::SendStart => "start".to_string(),
                ChatEvent::MessageStart { message } => format!("open {:?}", message.sender),
                ChatEvent::MessageDelta { delta, .. } => format!("delta {}", delta),
                ChatEvent::MessageUpdate { message } => format!("update {}", message.content),
                ChatEvent::MessageEnd { message } => format!("end {}", message.content),
                other => format!("{:?}", other),
            });
        }
        assert_eq!(
            seen,
            vec![
                "open User",
                "start",
                "open Assistant",
                "delta Hel",
                "update Hel",
                "delta lo",
                "update Hello",
                "end Hello",
            ]
        );
    }

    #[tokio::test]
    async fn test_lagging_subscriber_resyncs_from_updates() {
        let chunks: Vec<&str> = std::iter::repeat_n("x", 300).collect();
        let (mut session, _) = session(vec![body(&chunks)]);
        let mut rx = session.subscribe();
        session.send("long answer please").await.unwrap();

        let mut lagged = false;
        let mut content = String::new();
        loop {
            match rx.try_recv() {
                Ok(ChatEvent::MessageDelta { delta, .. }) => content.push_str(&delta),
                Ok(ChatEvent::MessageUpdate { message } | ChatEvent::MessageEnd { message }) => {
                    content = message.content;
                }
                Ok(_) => {}
                Err(broadcast::error::TryRecvError::Lagged(_)) => lagged = true,
                Err(_) => break,
            }
        }
        assert!(lagged);
        assert_eq!(content, "x".repeat(300));
    }

    #[tokio::test]
    async fn test_attachments_in_prompt_not_bubble() {
        let (mut session, requests) = session(vec![body(&["ok"])]);
        let handle = session.handle();
        handle.add_file(UploadedFile::new("a.pdf", "A"));
        handle.add_file(UploadedFile::new("b.pdf", "B"));

        session.send("Q").await.unwrap();

        assert_eq!(requests.lock()[0].prompt, "Q\n\nA\n\nB");
        assert_eq!(session.messages()[1].content, "Q");
    }

    #[tokio::test]
    async fn test_blank_input_ignored() {
        let (mut session, requests) = session(vec![]);
        session.send("   \n").await.unwrap();
        assert!(requests.lock().is_empty());
        assert_eq!(session.messages().len(), 1);
        assert_eq!(*session.state(), SendState::Idle);
    }

    #[tokio::test]
    async fn test_history_carries_prior_turns() {
        let (mut session, requests) = session(vec![body(&["first answer"]), body(&["second"])]);
        session.send("first").await.unwrap();
        session.send("second question").await.unwrap();

        let requests = requests.lock();
        assert_eq!(
            requests[1].history,
            vec![Turn::user("first"), Turn::model("first answer")]
        );
        assert_eq!(requests[1].prompt, "second question\n\n");
    }

    #[tokio::test]
    async fn test_multibyte_split_across_chunks() {
        let (mut session, _) = session(vec![Reply::Body(vec![
            Ok(vec![b'c', b'a', b'f', 0xC3]),
            Ok(vec![0xA9, b'!']),
        ])]);
        let mut rx = session.subscribe();
        session.send("coffee?").await.unwrap();

        assert_eq!(session.messages()[2].content, "café!");
        while let Ok(event) = rx.try_recv() {
            if let ChatEvent::MessageDelta { delta, .. } = event {
                assert!(!delta.contains('\u{FFFD}'));
            }
        }
    }

    #[tokio::test]
    async fn test_empty_reply_completes_empty() {
        let (mut session, _) = session(vec![body(&[])]);
        session.send("anything").await.unwrap();
        let reply = &session.messages()[2];
        assert_eq!(reply.content, "");
        assert_eq!(reply.status, MessageStatus::Complete);
        assert_eq!(*session.state(), SendState::Done);
    }

    #[tokio::test]
    async fn test_relay_refusal_marks_failed() {
        let (mut session, _) = session(vec![Reply::Refuse(
            500,
            "Upstream credential is not configured",
        )]);
        let mut rx = session.subscribe();
        let err = session.send("Hello").await.unwrap_err();
        assert!(matches!(err, Error::Relay { status: 500, .. }));

        let reply = &session.messages()[2];
        assert!(reply.is_failed());
        assert!(reply.content.contains("Upstream credential is not configured"));
        assert!(matches!(session.state(), SendState::Failed { .. }));
        assert!(!session.is_typing());
        assert!(session.can_retry());

        let mut saw_failed = false;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, ChatEvent::SendFailed { .. }) {
                saw_failed = true;
            }
        }
        assert!(saw_failed);
    }

    #[tokio::test]
    async fn test_mid_stream_break_keeps_partial_text() {
        let (mut session, _) = session(vec![Reply::Body(vec![
            Ok(b"partial ".to_vec()),
            Err("connection reset"),
        ])]);
        assert!(session.send("Hello").await.is_err());

        let reply = &session.messages()[2];
        assert!(reply.is_failed());
        assert!(reply.content.starts_with("partial "));
        assert!(reply.content.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_retry_replaces_failed_bubble() {
        let (mut session, requests) = session(vec![
            Reply::Refuse(502, "Upstream error: UNAVAILABLE"),
            body(&["recovered"]),
        ]);
        assert!(session.send("Hello").await.is_err());
        assert!(session.retry().await.unwrap());

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].content, "Hello");
        assert_eq!(messages[2].content, "recovered");
        assert_eq!(messages[2].status, MessageStatus::Complete);

        let requests = requests.lock();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].prompt, requests[1].prompt);
        assert_eq!(requests[0].history, requests[1].history);
        assert!(!session.can_retry());
    }

    #[tokio::test]
    async fn test_retry_without_failure_is_noop() {
        let (mut session, requests) = session(vec![]);
        assert!(!session.retry().await.unwrap());
        assert!(requests.lock().is_empty());
    }

    #[tokio::test]
    async fn test_failed_turn_excluded_from_next_history() {
        let (mut session, requests) = session(vec![
            Reply::Refuse(502, "bad gateway"),
            body(&["fine"]),
        ]);
        assert!(session.send("first").await.is_err());
        session.send("second").await.unwrap();

        let requests = requests.lock();
        assert_eq!(requests[1].history, vec![Turn::user("first")]);
    }

    #[tokio::test]
    async fn test_busy_send_rejected() {
        let (mut session, _) = session(vec![]);
        session.state = SendState::Streaming;
        assert!(matches!(session.send("again").await, Err(Error::Busy)));
        assert!(matches!(session.clear(), Err(Error::Busy)));
    }

    #[tokio::test]
    async fn test_clear_resets_to_greeting() {
        let (mut session, _) = session(vec![body(&["answer"])]);
        let handle = session.handle();
        handle.add_file(UploadedFile::new("a.pdf", "A"));
        session.send("question").await.unwrap();
        let old_greeting = session.messages()[0].id;

        session.clear().unwrap();

        let messages = session.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, GREETING);
        assert_ne!(messages[0].id, old_greeting);
        assert_eq!(*session.state(), SendState::Idle);
        assert_eq!(session.files().len(), 1);
    }

    #[tokio::test]
    async fn test_message_ids_unique() {
        let (mut session, _) = session(vec![body(&["a"]), body(&["b"])]);
        session.send("one").await.unwrap();
        session.send("two").await.unwrap();
        let mut ids: Vec<_> = session.messages().iter().map(|m| m.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn test_history_limit_applied() {
        let (mut session, requests) = session(vec![body(&["a1"]), body(&["a2"]), body(&["a3"])]);
        session.set_history_limit(Some(2));
        session.send("q1").await.unwrap();
        session.send("q2").await.unwrap();
        session.send("q3").await.unwrap();

        let requests = requests.lock();
        assert_eq!(
            requests[2].history,
            vec![Turn::user("q2"), Turn::model("a2")]
        );
    }
}
