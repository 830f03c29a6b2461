//! TUI implementation for zola

use tokio::sync::{broadcast, mpsc};

use crossterm::event::{Event, EventStream, MouseEventKind};
use futures::StreamExt;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::{Duration, Instant};
use zola_client::{
    ChatEvent, ChatSession, Error, ExtractionService, NotificationBanner, SessionHandle,
};
use zola_tui::{
    Theme,
    input::Action,
    widgets::{
        Banner, DisplayMessage, FileList, InputBox, MessageList, Spinner,
        message_list::calculate_message_height,
    },
};

use crate::commands::{CommandResult, execute_command};
use crate::utils::preview_line;

/// Messages sent from UI to the session driver
#[derive(Debug)]
pub enum UiMessage {
    /// User submitted input
    Submit(String),
    /// Slash command
    Command(String),
    /// Ctrl+L
    Clear,
    /// Ctrl+R
    Retry,
    /// User requested quit
    Quit,
}

/// Work that needs the session mutably
enum Job {
    Send(String),
    Retry,
}

/// TUI application state
pub struct TuiState {
    /// Conversation mirror plus local system lines
    messages: Vec<DisplayMessage>,
    input: InputBox,
    /// Current scroll position
    scroll: usize,
    /// Whether a reply is pending
    is_processing: bool,
    status: String,
    theme: Theme,
    relay_url: String,
    /// Attached file names, in attach order
    files: Vec<String>,
    banner: NotificationBanner,
    ui_tx: mpsc::Sender<UiMessage>,
    /// Spinner start time for animation
    spinner_start: Instant,
}

impl TuiState {
    pub fn new(
        session: &ChatSession,
        relay_url: impl Into<String>,
        notification_window: Duration,
        ui_tx: mpsc::Sender<UiMessage>,
    ) -> Self {
        let mut input = InputBox::new().with_placeholder("Type your message here...");
        input.set_focused(true);

        Self {
            messages: session.messages().iter().map(DisplayMessage::from).collect(),
            input,
            scroll: usize::MAX,
            is_processing: false,
            status: "Ready".to_string(),
            theme: Theme::dark(),
            relay_url: relay_url.into(),
            files: session.handle().file_names(),
            banner: NotificationBanner::new(notification_window),
            ui_tx,
            spinner_start: Instant::now(),
        }
    }

    fn find_mut(&mut self, id: zola_client::MessageId) -> Option<&mut DisplayMessage> {
        self.messages.iter_mut().rev().find(|m| m.id == Some(id))
    }

    /// Replace a bubble wholesale, adding it if its start was never seen
    fn upsert(&mut self, message: &zola_client::ChatMessage) {
        match self.find_mut(message.id) {
            Some(msg) => *msg = DisplayMessage::from(message),
            None => self.messages.push(DisplayMessage::from(message)),
        }
        self.scroll_to_bottom();
    }

    /// Apply one broadcast receive. Lagging only skips deltas; the next
    /// update carries the whole bubble.
    pub fn handle_chat_recv(&mut self, event: Result<ChatEvent, broadcast::error::RecvError>) {
        match event {
            Ok(chat_event) => self.handle_chat_event(chat_event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "chat events lagged");
            }
            Err(broadcast::error::RecvError::Closed) => {}
        }
    }

    /// Apply everything already queued on `rx`
    pub fn drain_chat_events(&mut self, rx: &mut broadcast::Receiver<ChatEvent>) {
        loop {
            match rx.try_recv() {
                Ok(chat_event) => self.handle_chat_event(chat_event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "chat events lagged");
                }
                Err(_) => break,
            }
        }
    }

    /// Handle session events
    pub fn handle_chat_event(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::SendStart => {
                self.is_processing = true;
                self.spinner_start = Instant::now();
                self.status = zola_tui::widgets::spinner::TYPING_LABEL.to_string();
            }
            ChatEvent::MessageStart { message } => {
                self.messages.push(DisplayMessage::from(&message));
                self.scroll_to_bottom();
            }
            ChatEvent::MessageDelta { id, delta } => {
                if let Some(msg) = self.find_mut(id) {
                    msg.content.push_str(&delta);
                    self.scroll_to_bottom();
                }
            }
            ChatEvent::MessageUpdate { message } => self.upsert(&message),
            ChatEvent::MessageEnd { message } => {
                self.upsert(&message);
                self.is_processing = false;
                self.status = "Ready".to_string();
            }
            ChatEvent::MessageRemoved { id } => {
                self.messages.retain(|m| m.id != Some(id));
            }
            ChatEvent::SendFailed { error } => {
                self.is_processing = false;
                self.status = format!("Error: {} (Ctrl+R to retry)", preview_line(&error, 60));
                self.scroll_to_bottom();
            }
            ChatEvent::Cleared { greeting } => {
                self.messages = vec![DisplayMessage::from(&greeting)];
                self.scroll = usize::MAX;
                self.status = "Cleared".to_string();
            }
            ChatEvent::FileAdded { name } => {
                self.files.push(name);
            }
            ChatEvent::FileRemoved { name, .. } => {
                self.files.retain(|f| *f != name);
            }
            ChatEvent::Notification { kind, message } => {
                self.banner.show(kind, message, Instant::now());
            }
        }
    }

    fn scroll_to_bottom(&mut self) {
        // Will be calculated during render based on content height
        self.scroll = usize::MAX;
    }

    /// Show a system message
    pub fn show_system_message(&mut self, content: &str) {
        self.messages.push(DisplayMessage::system(content));
        self.scroll_to_bottom();
    }

    /// Handle keyboard action. Returns `false` to quit.
    pub async fn handle_action(&mut self, action: Action, width: u16) -> bool {
        match action {
            Action::Submit => {
                if self.input.content().trim().is_empty() {
                    return true;
                }
                let content = self.input.take();
                let msg = if content.starts_with('/') {
                    UiMessage::Command(content)
                } else {
                    UiMessage::Submit(content)
                };
                let _ = self.ui_tx.send(msg).await;
                true
            }
            Action::Interrupt | Action::Escape => {
                let _ = self.ui_tx.send(UiMessage::Quit).await;
                false
            }
            Action::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                true
            }
            Action::PageDown => {
                self.scroll = self.scroll.saturating_add(10);
                true
            }
            Action::Clear => {
                let _ = self.ui_tx.send(UiMessage::Clear).await;
                true
            }
            Action::Retry => {
                let _ = self.ui_tx.send(UiMessage::Retry).await;
                true
            }
            Action::Attach => {
                self.input.set_content("/attach ");
                true
            }
            _ => {
                self.input.handle_action(&action, width);
                true
            }
        }
    }

    fn scroll_by(&mut self, kind: MouseEventKind) {
        match kind {
            MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(3),
            MouseEventKind::ScrollDown => self.scroll = self.scroll.saturating_add(3),
            _ => {}
        }
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();
        let now = Instant::now();
        let banner_height = u16::from(self.banner.current(now).is_some());
        let files_height = FileList::height(&self.files, size.width);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),                // Messages
                Constraint::Length(banner_height), // Notification
                Constraint::Length(files_height),  // Attachments
                Constraint::Length(1),             // Status
                Constraint::Length(3),             // Input
            ])
            .split(size);

        self.render_messages(frame, chunks[0]);

        if let Some(notification) = self.banner.current(now) {
            frame.render_widget(Banner::new(notification, &self.theme), chunks[1]);
        }

        frame.render_widget(FileList::new(&self.files, &self.theme), chunks[2]);

        self.render_status(frame, chunks[3]);

        self.input
            .render(chunks[4], frame.buffer_mut(), &self.theme);
    }

    fn render_messages(&mut self, frame: &mut Frame, area: Rect) {
        let title = format!(" zola │ {} ", self.relay_url);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title(title);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let content_height = calculate_message_height(&self.messages, inner.width as usize);
        let max_scroll = content_height.saturating_sub(inner.height as usize);

        if self.scroll == usize::MAX {
            // Auto-scroll to bottom
            self.scroll = max_scroll;
        } else {
            self.scroll = self.scroll.min(max_scroll);
        }

        let message_list = MessageList::new(&self.messages, &self.theme)
            .scroll(self.scroll)
            .typing_since(self.spinner_start);
        frame.render_widget(message_list, inner);

        if content_height > inner.height as usize {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .track_symbol(Some("│"))
                .thumb_symbol("█");

            let mut scrollbar_state = ScrollbarState::new(content_height)
                .position(self.scroll)
                .viewport_content_length(inner.height as usize);

            frame.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        if self.is_processing {
            let spinner = Spinner::typing(&self.theme).with_start_time(self.spinner_start);
            frame.render_widget(spinner, area);
            return;
        }

        let left_content = match self.files.len() {
            0 => self.status.clone(),
            n => format!("{} │ {} attached", self.status, n),
        };
        let right_content = "Ctrl+O: attach │ Ctrl+R: retry │ Ctrl+L: clear │ Ctrl+C: quit";

        let left_width = left_content.chars().count();
        let right_width = right_content.chars().count();
        let available = area.width as usize;

        let line = if left_width + right_width + 2 <= available {
            let spacing = available - left_width - right_width;
            Line::from(vec![
                Span::styled(left_content, self.theme.dim_style()),
                Span::raw(" ".repeat(spacing)),
                Span::styled(right_content, self.theme.border_style()),
            ])
        } else {
            Line::from(Span::styled(left_content, self.theme.dim_style()))
        };

        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Start extracting `paths` in the background; outcomes arrive as events.
pub fn spawn_upload(extraction: &ExtractionService, handle: &SessionHandle, paths: Vec<PathBuf>) {
    let extraction = extraction.clone();
    let handle = handle.clone();
    tokio::spawn(async move {
        extraction.upload(&paths, &handle).await;
    });
}

/// Apply a slash command.
///
/// `session` is `None` while a reply is in flight. Returns the job to run,
/// or `None` once handled. `Err(())` asks to quit.
fn apply_command(
    state: &mut TuiState,
    extraction: &ExtractionService,
    handle: &SessionHandle,
    session: Option<&mut ChatSession>,
    cmd: &str,
) -> Result<Option<Job>, ()> {
    let Some(result) = execute_command(cmd, &handle.file_names()) else {
        return Ok(None);
    };
    match result {
        CommandResult::Attach(paths) => spawn_upload(extraction, handle, paths),
        CommandResult::Remove(name) => {
            if handle.remove_file(&name) == 0 {
                state.show_system_message(&format!("No attached file named {}", name));
            }
        }
        CommandResult::Clear => clear_or_refuse(state, session),
        CommandResult::Retry => return Ok(Some(Job::Retry)),
        CommandResult::Message(msg) => state.show_system_message(&msg),
        CommandResult::Exit => return Err(()),
        CommandResult::Unknown(cmd) => {
            state.show_system_message(&format!(
                "Unknown command: /{}\nType /help for available commands.",
                cmd
            ));
        }
    }
    Ok(None)
}

fn clear_or_refuse(state: &mut TuiState, session: Option<&mut ChatSession>) {
    match session.map(|s| s.clear()) {
        Some(Ok(())) => {}
        Some(Err(e)) => state.show_system_message(&format!("Cannot clear: {}", e)),
        None => state.show_system_message("Wait for the reply to finish before clearing."),
    }
}

/// Run the TUI application
pub async fn run_tui(
    session: &mut ChatSession,
    extraction: ExtractionService,
    relay_url: &str,
    notification_window: Duration,
    attach: Vec<PathBuf>,
) -> anyhow::Result<()> {
    use crossterm::{
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    };
    use ratatui::{Terminal, backend::CrosstermBackend};
    use std::io;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (ui_tx, mut ui_rx) = mpsc::channel::<UiMessage>(32);

    let mut state = TuiState::new(session, relay_url, notification_window, ui_tx);

    let mut chat_rx = session.subscribe();
    let handle = session.handle();

    if !attach.is_empty() {
        spawn_upload(&extraction, &handle, attach);
    }

    let mut event_stream = EventStream::new();

    // Tick interval for animations (80ms for smooth spinner)
    let mut tick_interval = tokio::time::interval(Duration::from_millis(80));

    let mut pending: Option<Job> = None;

    let result = 'outer: loop {
        if let Some(job) = pending.take() {
            state.spinner_start = Instant::now();

            let session_ref = &mut *session;
            let mut job_future: Pin<Box<dyn Future<Output = zola_client::Result<bool>> + '_>> =
                match job {
                    Job::Send(content) => {
                        Box::pin(async move { session_ref.send(&content).await.map(|_| true) })
                    }
                    Job::Retry => Box::pin(session_ref.retry()),
                };

            // Poll the job alongside other events until completion
            loop {
                terminal.draw(|frame| state.render(frame))?;
                let area_width = terminal.size()?.width;

                tokio::select! {
                    biased;

                    result = &mut job_future => {
                        match result {
                            Ok(false) => state.show_system_message("Nothing to retry."),
                            Err(Error::Busy) => state.show_system_message("Still waiting for the previous reply."),
                            // Failures already arrived as SendFailed
                            Err(e) => tracing::debug!("send ended with error: {}", e),
                            Ok(true) => {}
                        }
                        break;
                    }

                    event = chat_rx.recv() => state.handle_chat_recv(event),

                    // Input stays live while the reply streams
                    event = event_stream.next() => {
                        match event {
                            Some(Ok(Event::Key(key))) => {
                                let action = zola_tui::input::key_to_action(key);
                                if !state.handle_action(action, area_width).await {
                                    break 'outer Ok(());
                                }
                            }
                            Some(Ok(Event::Paste(text))) => {
                                state.input.handle_action(&Action::Paste(text), area_width);
                            }
                            Some(Ok(Event::Mouse(mouse))) => state.scroll_by(mouse.kind),
                            Some(Err(e)) => break 'outer Err(anyhow::anyhow!("Event error: {}", e)),
                            None => break 'outer Ok(()),
                            _ => {}
                        }
                    }

                    msg = ui_rx.recv() => {
                        match msg {
                            Some(UiMessage::Submit(content)) => {
                                // Keep the draft for after the reply
                                state.input.set_content(content);
                                state.show_system_message("Still waiting for the previous reply.");
                            }
                            Some(UiMessage::Command(cmd)) => {
                                match apply_command(&mut state, &extraction, &handle, None, &cmd) {
                                    Ok(Some(Job::Retry)) => {
                                        state.show_system_message("Still waiting for the previous reply.");
                                    }
                                    Ok(_) => {}
                                    Err(()) => break 'outer Ok(()),
                                }
                            }
                            Some(UiMessage::Clear) => clear_or_refuse(&mut state, None),
                            Some(UiMessage::Retry) => {
                                state.show_system_message("Still waiting for the previous reply.");
                            }
                            Some(UiMessage::Quit) | None => break 'outer Ok(()),
                        }
                    }

                    _ = tick_interval.tick() => {
                        state.banner.tick(Instant::now());
                    }
                }
            }

            drop(job_future);

            // Drain any remaining events after the job completes
            state.drain_chat_events(&mut chat_rx);

            continue;
        }

        terminal.draw(|frame| state.render(frame))?;

        let area_width = terminal.size()?.width;

        tokio::select! {
            biased;

            event = chat_rx.recv() => state.handle_chat_recv(event),

            event = event_stream.next() => {
                match event {
                    Some(Ok(Event::Key(key))) => {
                        let action = zola_tui::input::key_to_action(key);
                        if !state.handle_action(action, area_width).await {
                            break Ok(());
                        }
                    }
                    Some(Ok(Event::Paste(text))) => {
                        state.handle_action(Action::Paste(text), area_width).await;
                    }
                    Some(Ok(Event::Mouse(mouse))) => state.scroll_by(mouse.kind),
                    Some(Ok(Event::Resize(_, _))) => {}
                    Some(Err(e)) => {
                        break Err(anyhow::anyhow!("Event error: {}", e));
                    }
                    None => {
                        break Ok(());
                    }
                    _ => {}
                }
            }

            _ = tick_interval.tick() => {
                state.banner.tick(Instant::now());
            }

            msg = ui_rx.recv() => {
                match msg {
                    Some(UiMessage::Submit(content)) => {
                        // Picked up at the start of the next iteration
                        pending = Some(Job::Send(content));
                    }
                    Some(UiMessage::Command(cmd)) => {
                        match apply_command(&mut state, &extraction, &handle, Some(&mut *session), &cmd) {
                            Ok(Some(job)) => pending = Some(job),
                            Ok(None) => {}
                            Err(()) => break Ok(()),
                        }
                    }
                    Some(UiMessage::Clear) => clear_or_refuse(&mut state, Some(&mut *session)),
                    Some(UiMessage::Retry) => pending = Some(Job::Retry),
                    Some(UiMessage::Quit) | None => break Ok(()),
                }
            }
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use zola_client::{
        ChatMessage, GREETING, HttpRelayTransport, MessageId, MessageStatus, NotificationKind,
        SessionConfig,
    };
    use zola_tui::widgets::Speaker;

    fn state() -> (TuiState, mpsc::Receiver<UiMessage>) {
        let session = ChatSession::new(
            SessionConfig::default(),
            Arc::new(HttpRelayTransport::new("http://127.0.0.1:9/api/gemini")),
        );
        let (tx, rx) = mpsc::channel(8);
        (
            TuiState::new(&session, "http://relay", Duration::from_secs(2), tx),
            rx,
        )
    }

    #[test]
    fn test_starts_with_greeting() {
        let (state, _rx) = state();
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].content, GREETING);
        assert_eq!(state.messages[0].speaker, Speaker::Assistant);
    }

    #[test]
    fn test_streaming_events_update_bubble() {
        let (mut state, _rx) = state();
        let id = MessageId::default();
        state.handle_chat_event(ChatEvent::SendStart);
        assert!(state.is_processing);

        state.handle_chat_event(ChatEvent::MessageStart {
            message: ChatMessage::placeholder(id),
        });
        state.handle_chat_event(ChatEvent::MessageDelta {
            id,
            delta: "Hel".into(),
        });
        state.handle_chat_event(ChatEvent::MessageDelta {
            id,
            delta: "lo".into(),
        });
        assert_eq!(state.messages.last().map(|m| m.content.as_str()), Some("Hello"));

        let mut done = ChatMessage::placeholder(id);
        done.content = "Hello".into();
        done.status = MessageStatus::Complete;
        state.handle_chat_event(ChatEvent::MessageEnd { message: done });
        assert!(!state.is_processing);
        assert_eq!(state.messages.last().map(|m| m.status), Some(MessageStatus::Complete));
    }

    #[test]
    fn test_lagged_drain_rebuilds_bubble() {
        let (mut state, _rx) = state();
        let (tx, mut chat_rx) = broadcast::channel(4);
        let id = MessageId::default();
        let mut reply = ChatMessage::placeholder(id);
        tx.send(ChatEvent::MessageStart {
            message: reply.clone(),
        })
        .unwrap();
        for _ in 0..20 {
            reply.content.push('x');
            tx.send(ChatEvent::MessageDelta {
                id,
                delta: "x".into(),
            })
            .unwrap();
            tx.send(ChatEvent::MessageUpdate {
                message: reply.clone(),
            })
            .unwrap();
        }

        state.drain_chat_events(&mut chat_rx);

        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].content, "x".repeat(20));
    }

    #[tokio::test]
    async fn test_lagged_recv_keeps_receiving() {
        let (mut state, _rx) = state();
        let (tx, mut chat_rx) = broadcast::channel(2);
        let id = MessageId::default();
        for text in ["a", "ab", "abc"] {
            let mut reply = ChatMessage::placeholder(id);
            reply.content = text.into();
            tx.send(ChatEvent::MessageUpdate { message: reply }).unwrap();
        }

        let first = chat_rx.recv().await;
        assert!(first.is_err());
        state.handle_chat_recv(first);
        state.handle_chat_recv(chat_rx.recv().await);
        state.handle_chat_recv(chat_rx.recv().await);

        assert_eq!(state.messages.last().map(|m| m.content.as_str()), Some("abc"));
    }

    #[test]
    fn test_failure_then_removal() {
        let (mut state, _rx) = state();
        let id = MessageId::default();
        state.handle_chat_event(ChatEvent::MessageStart {
            message: ChatMessage::placeholder(id),
        });
        state.handle_chat_event(ChatEvent::SendFailed {
            error: "Relay returned 502: upstream".into(),
        });
        assert!(state.status.starts_with("Error: Relay returned 502"));

        state.handle_chat_event(ChatEvent::MessageRemoved { id });
        assert_eq!(state.messages.len(), 1);
    }

    #[test]
    fn test_files_and_notifications() {
        let (mut state, _rx) = state();
        state.handle_chat_event(ChatEvent::FileAdded { name: "a.pdf".into() });
        state.handle_chat_event(ChatEvent::FileAdded { name: "b.pdf".into() });
        state.handle_chat_event(ChatEvent::FileAdded { name: "a.pdf".into() });
        state.handle_chat_event(ChatEvent::FileRemoved {
            name: "a.pdf".into(),
            removed: 2,
        });
        assert_eq!(state.files, vec!["b.pdf".to_string()]);

        state.handle_chat_event(ChatEvent::Notification {
            kind: NotificationKind::Success,
            message: "b.pdf uploaded successfully!".into(),
        });
        let shown = state.banner.current(Instant::now()).map(|n| n.message.clone());
        assert_eq!(shown.as_deref(), Some("b.pdf uploaded successfully!"));
    }

    #[test]
    fn test_cleared_resets_to_greeting() {
        let (mut state, _rx) = state();
        state.show_system_message("hello");
        state.handle_chat_event(ChatEvent::Cleared {
            greeting: ChatMessage::assistant(MessageId::default(), GREETING),
        });
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].content, GREETING);
    }

    #[tokio::test]
    async fn test_submit_routes_commands() {
        let (mut state, mut rx) = state();
        for c in "/files".chars() {
            state.handle_action(Action::Char(c), 80).await;
        }
        assert!(state.handle_action(Action::Submit, 80).await);
        assert!(matches!(rx.recv().await, Some(UiMessage::Command(c)) if c == "/files"));

        for c in "hi".chars() {
            state.handle_action(Action::Char(c), 80).await;
        }
        state.handle_action(Action::Submit, 80).await;
        assert!(matches!(rx.recv().await, Some(UiMessage::Submit(c)) if c == "hi"));

        // Blank input sends nothing
        state.handle_action(Action::Submit, 80).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_attach_opens_prompt() {
        let (mut state, _rx) = state();
        state.handle_action(Action::Attach, 80).await;
        assert_eq!(state.input.content(), "/attach ");
    }
}
