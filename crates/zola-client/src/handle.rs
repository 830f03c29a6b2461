//! A cloneable handle for touching session state from other tasks.

use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::broadcast;

use crate::{events::ChatEvent, message::UploadedFile, notification::NotificationKind};

/// A cloneable handle for touching session state from other tasks.
///
/// Uploads finish on their own schedule, possibly while a send is in flight,
/// so the attachment list lives here rather than behind the session's
/// `&mut self`. All fields are `Arc`-wrapped, so cloning is cheap.
#[derive(Clone)]
pub struct SessionHandle {
    pub(crate) files: Arc<Mutex<Vec<UploadedFile>>>,
    pub(crate) typing: Arc<AtomicBool>,
    pub(crate) event_tx: broadcast::Sender<ChatEvent>,
}

impl SessionHandle {
    pub(crate) fn new(event_tx: broadcast::Sender<ChatEvent>) -> Self {
        Self {
            files: Arc::new(Mutex::new(Vec::new())),
            typing: Arc::new(AtomicBool::new(false)),
            event_tx,
        }
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.event_tx.subscribe()
    }

    /// Append an extracted attachment.
    pub fn add_file(&self, file: UploadedFile) {
        let name = file.name.clone();
        self.files.lock().push(file);
        let _ = self.event_tx.send(ChatEvent::FileAdded { name });
    }

    /// Remove every attachment named exactly `name`, keeping the rest in order.
    pub fn remove_file(&self, name: &str) -> usize {
        let removed = {
            let mut files = self.files.lock();
            let before = files.len();
            files.retain(|f| f.name != name);
            before - files.len()
        };
        if removed > 0 {
            let _ = self.event_tx.send(ChatEvent::FileRemoved {
                name: name.to_string(),
                removed,
            });
        }
        removed
    }

    /// Snapshot of the current attachments
    pub fn files(&self) -> Vec<UploadedFile> {
        self.files.lock().clone()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.files.lock().iter().map(|f| f.name.clone()).collect()
    }

    /// Whether a reply is being awaited or streamed
    pub fn is_typing(&self) -> bool {
        self.typing.load(Ordering::Acquire)
    }

    pub(crate) fn set_typing(&self, typing: bool) {
        self.typing.store(typing, Ordering::Release);
    }

    /// Publish a transient notice for the UI banner.
    pub fn notify(&self, kind: NotificationKind, message: impl Into<String>) {
        let _ = self.event_tx.send(ChatEvent::Notification {
            kind,
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> SessionHandle {
        let (tx, _) = broadcast::channel(16);
        SessionHandle::new(tx)
    }

    #[test]
    fn test_remove_all_matches_preserving_order() {
        let handle = handle();
        handle.add_file(UploadedFile::new("a.pdf", "1"));
        handle.add_file(UploadedFile::new("b.pdf", "2"));
        handle.add_file(UploadedFile::new("a.pdf", "3"));
        handle.add_file(UploadedFile::new("c.pdf", "4"));

        assert_eq!(handle.remove_file("a.pdf"), 2);
        assert_eq!(handle.file_names(), vec!["b.pdf", "c.pdf"]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let handle = handle();
        handle.add_file(UploadedFile::new("a.pdf", "1"));
        assert_eq!(handle.remove_file("A.pdf"), 0);
        assert_eq!(handle.files().len(), 1);
    }

    #[tokio::test]
    async fn test_file_events() {
        let handle = handle();
        let mut rx = handle.subscribe();
        handle.add_file(UploadedFile::new("a.pdf", "1"));
        handle.remove_file("a.pdf");

        assert!(matches!(rx.recv().await, Ok(ChatEvent::FileAdded { name }) if name == "a.pdf"));
        assert!(matches!(
            rx.recv().await,
            Ok(ChatEvent::FileRemoved { removed: 1, .. })
        ));
    }
}
