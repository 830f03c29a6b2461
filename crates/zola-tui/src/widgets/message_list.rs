//! Message list widget for displaying the conversation

use crate::theme::Theme;
use crate::widgets::{markdown::render_markdown, spinner};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use std::time::Instant;
use zola_client::{ChatMessage, MessageId, MessageStatus, Sender};

/// Who a displayed entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
    /// Local output such as command results; never sent upstream
    System,
}

/// One entry in the message list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMessage {
    /// Session message this mirrors; `None` for local entries
    pub id: Option<MessageId>,
    pub speaker: Speaker,
    pub content: String,
    pub status: MessageStatus,
}

impl DisplayMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            id: None,
            speaker: Speaker::System,
            content: content.into(),
            status: MessageStatus::Complete,
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.status == MessageStatus::Streaming
    }
}

impl From<&ChatMessage> for DisplayMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: Some(message.id),
            speaker: match message.sender {
                Sender::User => Speaker::User,
                Sender::Assistant => Speaker::Assistant,
            },
            content: message.content.clone(),
            status: message.status,
        }
    }
}

/// Lines for one message: header, body, blank separator
pub fn message_lines(
    msg: &DisplayMessage,
    theme: &Theme,
    width: usize,
    typing_since: Instant,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let failed = msg.status == MessageStatus::Failed;

    let (label, mut style, prefix) = match msg.speaker {
        Speaker::User => ("You", theme.accent_bold(), "▶ "),
        Speaker::Assistant => ("ZOLA", theme.assistant_bold(), "◀ "),
        Speaker::System => ("zola", theme.dim_style(), "● "),
    };
    if failed {
        style = theme.error_style().add_modifier(Modifier::BOLD);
    }

    let header = match msg.status {
        MessageStatus::Streaming => format!("{}{} ▌", prefix, label),
        MessageStatus::Failed => format!("{}{} ✗", prefix, label),
        MessageStatus::Complete => format!("{}{}", prefix, label),
    };
    lines.push(Line::from(Span::styled(header, style)));

    let content_width = width.saturating_sub(2);

    if msg.speaker == Speaker::Assistant && !failed {
        if msg.content.is_empty() && msg.is_streaming() {
            lines.push(Line::from(Span::styled(
                format!("  {} {}", spinner::frame_at(typing_since.elapsed()), spinner::TYPING_LABEL),
                theme.dim_style(),
            )));
        } else {
            for line in render_markdown(&msg.content, theme, content_width) {
                let mut indented = vec![Span::raw("  ")];
                indented.extend(line.spans);
                lines.push(Line::from(indented));
            }
        }
    } else {
        let content_style = if failed {
            theme.error_style()
        } else if msg.speaker == Speaker::System {
            theme.dim_style()
        } else {
            theme.base_style()
        };
        for line in textwrap::wrap(&msg.content, content_width.max(1)) {
            lines.push(Line::from(Span::styled(format!("  {}", line), content_style)));
        }
    }

    lines.push(Line::from(""));
    lines
}

/// Rows `lines` occupy once wrapped to `width`
fn wrapped_rows(lines: &[Line], width: usize) -> usize {
    let width = width.max(1);
    lines
        .iter()
        .map(|l| l.width().div_ceil(width).max(1))
        .sum()
}

/// Total wrapped height of the conversation at `width`
pub fn calculate_message_height(messages: &[DisplayMessage], width: usize) -> usize {
    let theme = Theme::dark();
    let now = Instant::now();
    messages
        .iter()
        .map(|m| wrapped_rows(&message_lines(m, &theme, width, now), width))
        .sum()
}

/// Widget for displaying the conversation
pub struct MessageList<'a> {
    messages: &'a [DisplayMessage],
    theme: &'a Theme,
    scroll: usize,
    typing_since: Instant,
}

impl<'a> MessageList<'a> {
    pub fn new(messages: &'a [DisplayMessage], theme: &'a Theme) -> Self {
        Self {
            messages,
            theme,
            scroll: 0,
            typing_since: Instant::now(),
        }
    }

    /// Set scroll offset, in wrapped rows
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// Start of the current wait, for the placeholder animation
    pub fn typing_since(mut self, since: Instant) -> Self {
        self.typing_since = since;
        self
    }
}

impl Widget for MessageList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;
        let lines: Vec<Line> = self
            .messages
            .iter()
            .flat_map(|m| message_lines(m, self.theme, width, self.typing_since))
            .collect();

        let scroll = self.scroll.min(u16::MAX as usize) as u16;
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .render(area, buf);
    }
}
