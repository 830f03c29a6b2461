//! Line-mode output for `zola chat --no-tui`

use std::future::Future;
use std::io::{self, Write};

use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use zola_client::{ChatEvent, ChatMessage, MessageId, MessageStatus, NotificationKind, Sender};

fn notification_icon(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "✔",
        NotificationKind::Error => "✖",
    }
}

/// The reply currently being printed
struct Reply {
    id: MessageId,
    /// Bytes of its content already written
    printed: usize,
}

/// Writes session events as plain text.
///
/// Deltas are printed as they arrive. After a lag the missed text is filled
/// in from the next full-content update instead.
pub struct LinePrinter<W: Write> {
    out: W,
    reply: Option<Reply>,
    stale: bool,
}

impl<W: Write> LinePrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            reply: None,
            stale: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Drive `job` to completion while printing the events it produces
    pub async fn pump<F: Future>(
        &mut self,
        job: F,
        rx: &mut broadcast::Receiver<ChatEvent>,
    ) -> io::Result<F::Output> {
        tokio::pin!(job);
        let output = loop {
            tokio::select! {
                biased;

                event = rx.recv() => match event {
                    Ok(event) => self.handle(&event)?,
                    Err(RecvError::Lagged(skipped)) => self.lagged(skipped),
                    Err(RecvError::Closed) => break (&mut job).await,
                },

                output = &mut job => break output,
            }
        };
        self.drain(rx)?;
        Ok(output)
    }

    /// Print everything already queued on `rx`
    pub fn drain(&mut self, rx: &mut broadcast::Receiver<ChatEvent>) -> io::Result<()> {
        loop {
            match rx.try_recv() {
                Ok(event) => self.handle(&event)?,
                Err(TryRecvError::Lagged(skipped)) => self.lagged(skipped),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return Ok(()),
            }
        }
    }

    fn lagged(&mut self, skipped: u64) {
        tracing::debug!(skipped, "line printer lagged");
        self.stale = true;
    }

    pub fn handle(&mut self, event: &ChatEvent) -> io::Result<()> {
        match event {
            ChatEvent::MessageStart { message }
                if message.sender == Sender::Assistant
                    && message.status == MessageStatus::Streaming =>
            {
                self.reply = Some(Reply {
                    id: message.id,
                    printed: 0,
                });
                self.stale = false;
            }
            ChatEvent::MessageDelta { id, delta } => {
                if self.stale {
                    return Ok(());
                }
                if let Some(reply) = self.reply.as_mut().filter(|r| r.id == *id) {
                    write!(self.out, "{}", delta)?;
                    self.out.flush()?;
                    reply.printed += delta.len();
                }
            }
            ChatEvent::MessageUpdate { message } => self.catch_up(message)?,
            ChatEvent::MessageEnd { message } => {
                self.catch_up(message)?;
                writeln!(self.out)?;
            }
            ChatEvent::SendFailed { error } => writeln!(self.out, "\nError: {}", error)?,
            ChatEvent::Cleared { .. } => writeln!(self.out, "Cleared conversation.")?,
            ChatEvent::Notification { kind, message } => {
                writeln!(self.out, "[{} {}]", notification_icon(*kind), message)?;
            }
            ChatEvent::FileRemoved { name, removed } => {
                writeln!(self.out, "[removed {} × {}]", removed, name)?;
            }
            _ => {}
        }

        if event.is_terminal() {
            self.reply = None;
            self.stale = false;
        }
        Ok(())
    }

    /// Print whatever part of the reply's full content is not on screen yet
    fn catch_up(&mut self, message: &ChatMessage) -> io::Result<()> {
        if message.status == MessageStatus::Failed {
            return Ok(());
        }
        if message.sender != Sender::Assistant {
            return Ok(());
        }
        // The start of this reply was skipped in a lag
        if self.reply.as_ref().is_none_or(|r| r.id != message.id) {
            if self.reply.is_some() {
                writeln!(self.out)?;
            }
            self.reply = Some(Reply {
                id: message.id,
                printed: 0,
            });
        }
        let Some(reply) = self.reply.as_mut() else {
            return Ok(());
        };
        if let Some(rest) = message.content.get(reply.printed..) {
            write!(self.out, "{}", rest)?;
            self.out.flush()?;
            reply.printed = message.content.len();
        }
        self.stale = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Arc;
    use zola_ai::RelayRequest;
    use zola_client::{ByteStream, ChatSession, RelayTransport, SessionConfig};

    /// Replies with the same body, one byte per chunk.
    struct ByteByByte(String);

    #[async_trait]
    impl RelayTransport for ByteByByte {
        async fn open(&self, _request: &RelayRequest) -> zola_client::Result<ByteStream> {
            let chunks: Vec<zola_client::Result<Bytes>> = self
                .0
                .bytes()
                .map(|b| Ok(Bytes::copy_from_slice(&[b])))
                .collect();
            Ok(Box::pin(futures::stream::iter(chunks)))
        }
    }

    struct Refuse;

    #[async_trait]
    impl RelayTransport for Refuse {
        async fn open(&self, _request: &RelayRequest) -> zola_client::Result<ByteStream> {
            Err(zola_client::Error::Relay {
                status: 502,
                message: "Upstream error: UNAVAILABLE".into(),
            })
        }
    }

    fn printed(printer: LinePrinter<Vec<u8>>) -> String {
        String::from_utf8(printer.into_inner()).unwrap()
    }

    #[tokio::test]
    async fn test_long_replies_printed_in_full() {
        let reply = "ab".repeat(300);
        let mut session = ChatSession::new(
            SessionConfig::default(),
            Arc::new(ByteByByte(reply.clone())),
        );
        let mut rx = session.subscribe();
        let mut printer = LinePrinter::new(Vec::new());

        printer.pump(session.send("hi"), &mut rx).await.unwrap().unwrap();
        printer.pump(session.send("again"), &mut rx).await.unwrap().unwrap();

        assert_eq!(printed(printer), format!("{}\n", reply).repeat(2));
    }

    #[tokio::test]
    async fn test_short_replies_stream_through_deltas() {
        let mut session = ChatSession::new(
            SessionConfig::default(),
            Arc::new(ByteByByte("0123456789".into())),
        );
        let mut rx = session.subscribe();
        let mut printer = LinePrinter::new(Vec::new());

        for _ in 0..30 {
            printer.pump(session.send("again"), &mut rx).await.unwrap().unwrap();
        }

        assert_eq!(printed(printer), "0123456789\n".repeat(30));
    }

    #[tokio::test]
    async fn test_failure_and_clear_reported() {
        let mut session = ChatSession::new(SessionConfig::default(), Arc::new(Refuse));
        let mut rx = session.subscribe();
        let mut printer = LinePrinter::new(Vec::new());

        assert!(printer.pump(session.send("hi"), &mut rx).await.unwrap().is_err());
        session.clear().unwrap();
        printer.drain(&mut rx).unwrap();

        assert_eq!(
            printed(printer),
            "\nError: Relay returned 502: Upstream error: UNAVAILABLE\nCleared conversation.\n"
        );
    }

    #[test]
    fn test_gap_filled_from_update() {
        let mut printer = LinePrinter::new(Vec::new());
        let id = MessageId::default();
        let mut reply = ChatMessage::placeholder(id);
        printer
            .handle(&ChatEvent::MessageStart {
                message: reply.clone(),
            })
            .unwrap();
        printer
            .handle(&ChatEvent::MessageDelta {
                id,
                delta: "Hel".into(),
            })
            .unwrap();
        printer.lagged(2);
        printer
            .handle(&ChatEvent::MessageDelta {
                id,
                delta: "d".into(),
            })
            .unwrap();
        reply.content = "Hello, world".into();
        printer
            .handle(&ChatEvent::MessageUpdate { message: reply })
            .unwrap();

        assert_eq!(printed(printer), "Hello, world");
    }
}
