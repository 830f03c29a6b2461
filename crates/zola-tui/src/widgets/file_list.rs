//! Attachment list widget

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

/// Attached file names as chips on one wrapping line
pub struct FileList<'a> {
    names: &'a [String],
    theme: &'a Theme,
}

impl<'a> FileList<'a> {
    pub fn new(names: &'a [String], theme: &'a Theme) -> Self {
        Self { names, theme }
    }

    /// Rows needed at `width`, 0 when nothing is attached
    pub fn height(names: &[String], width: u16) -> u16 {
        if names.is_empty() || width == 0 {
            return 0;
        }
        let total: usize = names.iter().map(|n| chip(n).chars().count() + 1).sum();
        total.div_ceil(width as usize).clamp(1, 3) as u16
    }
}

fn chip(name: &str) -> String {
    format!("📄 {} ✕", name)
}

impl Widget for FileList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.names.is_empty() || area.height == 0 {
            return;
        }
        let mut spans = Vec::with_capacity(self.names.len() * 2);
        for name in self.names {
            spans.push(Span::styled(chip(name), self.theme.accent_style()));
            spans.push(Span::raw(" "));
        }
        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
