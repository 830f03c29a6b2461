//! Notification banner widget

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use zola_client::{Notification, NotificationKind};

/// One-line banner for upload results
pub struct Banner<'a> {
    notification: &'a Notification,
    theme: &'a Theme,
}

impl<'a> Banner<'a> {
    pub fn new(notification: &'a Notification, theme: &'a Theme) -> Self {
        Self {
            notification,
            theme,
        }
    }
}

fn icon(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "✔",
        NotificationKind::Error => "✖",
    }
}

impl Widget for Banner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let style = self.theme.notification_style(self.notification.kind);
        let line = Line::from(Span::styled(
            format!(" {} {} ", icon(self.notification.kind), self.notification.message),
            style,
        ));
        Paragraph::new(line).style(style).render(area, buf);
    }
}
