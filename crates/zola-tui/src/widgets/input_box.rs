//! Text input widget

use crate::input::Action;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

/// How many submitted lines Up/Down can recall
const HISTORY_LIMIT: usize = 50;

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Single-line text input with recall of previously submitted lines
#[derive(Debug, Default)]
pub struct InputBox {
    content: String,
    /// Cursor position (character index, not byte index)
    cursor: usize,
    /// Horizontal scroll offset (in display width)
    scroll: usize,
    placeholder: String,
    title: Option<String>,
    focused: bool,
    history: Vec<String>,
    /// Index into `history` while recalling; `None` when editing fresh input
    recall: Option<usize>,
    /// The line being typed before recall started
    draft: String,
}

impl InputBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Title drawn on the top border (e.g. a prompt for a file path)
    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cursor = self.content.chars().count();
        self.scroll = 0;
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Take the current line for submission, remembering it for recall.
    pub fn take(&mut self) -> String {
        let line = std::mem::take(&mut self.content);
        self.cursor = 0;
        self.scroll = 0;
        self.recall = None;
        self.draft.clear();

        if !line.trim().is_empty() && self.history.last() != Some(&line) {
            if self.history.len() >= HISTORY_LIMIT {
                self.history.remove(0);
            }
            self.history.push(line.clone());
        }
        line
    }

    fn cursor_byte_offset(&self) -> usize {
        self.content
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    fn cursor_display_width(&self) -> usize {
        self.content.chars().take(self.cursor).map(char_width).sum()
    }

    fn remove_char_at_cursor(&mut self) {
        let start = self.cursor_byte_offset();
        let end = self.content[start..]
            .chars()
            .next()
            .map(|c| start + c.len_utf8())
            .unwrap_or(self.content.len());
        self.content.drain(start..end);
    }

    /// Handle an input action. Returns `true` if the input changed or moved.
    pub fn handle_action(&mut self, action: &Action, width: u16) -> bool {
        let char_count = self.content.chars().count();

        let handled = match action {
            Action::Char(c) => {
                self.insert_char(*c);
                true
            }
            Action::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.remove_char_at_cursor();
                true
            }
            Action::Delete if self.cursor < char_count => {
                self.remove_char_at_cursor();
                true
            }
            Action::Left if self.cursor > 0 => {
                self.cursor -= 1;
                true
            }
            Action::Right if self.cursor < char_count => {
                self.cursor += 1;
                true
            }
            Action::Home => {
                self.cursor = 0;
                true
            }
            Action::End => {
                self.cursor = char_count;
                true
            }
            Action::Up => self.recall_older(),
            Action::Down => self.recall_newer(),
            Action::ClearLine => {
                self.clear();
                true
            }
            Action::DeleteWord => {
                let chars: Vec<char> = self.content.chars().collect();
                let mut start = self.cursor;
                while start > 0 && chars[start - 1] == ' ' {
                    start -= 1;
                }
                while start > 0 && chars[start - 1] != ' ' {
                    start -= 1;
                }
                let start_byte = self
                    .content
                    .char_indices()
                    .nth(start)
                    .map(|(i, _)| i)
                    .unwrap_or(self.content.len());
                let end_byte = self.cursor_byte_offset();
                self.content.drain(start_byte..end_byte);
                self.cursor = start;
                true
            }
            Action::Paste(text) => {
                // Single-line input: line breaks collapse to one space
                for c in text.chars() {
                    if c == '\n' || c == '\r' {
                        if self.cursor > 0 && !self.content.ends_with(' ') {
                            self.insert_char(' ');
                        }
                    } else {
                        self.insert_char(c);
                    }
                }
                true
            }
            _ => false,
        };

        if handled {
            self.update_scroll(width as usize);
        }
        handled
    }

    fn recall_older(&mut self) -> bool {
        if self.history.is_empty() {
            return false;
        }
        let index = match self.recall {
            None => {
                self.draft = self.content.clone();
                self.history.len() - 1
            }
            Some(0) => return false,
            Some(i) => i - 1,
        };
        self.recall = Some(index);
        let line = self.history[index].clone();
        self.set_content(line);
        true
    }

    fn recall_newer(&mut self) -> bool {
        let Some(index) = self.recall else {
            return false;
        };
        if index + 1 < self.history.len() {
            self.recall = Some(index + 1);
            let line = self.history[index + 1].clone();
            self.set_content(line);
        } else {
            self.recall = None;
            let draft = std::mem::take(&mut self.draft);
            self.set_content(draft);
        }
        true
    }

    fn insert_char(&mut self, c: char) {
        let byte_offset = self.cursor_byte_offset();
        self.content.insert(byte_offset, c);
        self.cursor += 1;
    }

    fn update_scroll(&mut self, width: usize) {
        let visible_width = width.saturating_sub(4); // borders and padding
        let cursor_pos = self.cursor_display_width();

        if cursor_pos < self.scroll {
            self.scroll = cursor_pos;
        } else if cursor_pos >= self.scroll + visible_width {
            self.scroll = cursor_pos + 1 - visible_width.max(1);
        }
    }

    /// Render the input box
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(if self.focused {
                theme.accent_style()
            } else {
                theme.border_style()
            });
        if let Some(title) = &self.title {
            block = block.title(format!(" {} ", title));
        }

        let inner = block.inner(area);
        block.render(area, buf);

        let (display_text, style) = if self.content.is_empty() {
            (self.placeholder.clone(), theme.dim_style())
        } else {
            let visible_width = inner.width as usize;
            let mut skipped = 0;
            let mut used = 0;
            let mut visible = String::new();
            for c in self.content.chars() {
                let w = char_width(c);
                if skipped < self.scroll {
                    skipped += w;
                    continue;
                }
                if used + w > visible_width {
                    break;
                }
                visible.push(c);
                used += w;
            }
            (visible, theme.base_style())
        };

        Paragraph::new(display_text).style(style).render(inner, buf);

        if self.focused && inner.width > 0 {
            let cursor_x = self.cursor_display_width().saturating_sub(self.scroll);
            if cursor_x < inner.width as usize {
                let x = inner.x + cursor_x as u16;
                if let Some(cell) = buf.cell_mut((x, inner.y)) {
                    cell.set_style(Style::default().bg(theme.accent));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> InputBox {
        let mut input = InputBox::new();
        for c in text.chars() {
            input.handle_action(&Action::Char(c), 80);
        }
        input
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = typed("café");
        input.handle_action(&Action::Backspace, 80);
        assert_eq!(input.content(), "caf");
        input.handle_action(&Action::Home, 80);
        input.handle_action(&Action::Char('é'), 80);
        assert_eq!(input.content(), "écaf");
    }

    #[test]
    fn test_delete_word() {
        let mut input = typed("summarize this pdf  ");
        input.handle_action(&Action::DeleteWord, 80);
        assert_eq!(input.content(), "summarize this ");
    }

    #[test]
    fn test_paste_collapses_newlines() {
        let mut input = InputBox::new();
        input.handle_action(&Action::Paste("line one\r\nline two".into()), 80);
        assert_eq!(input.content(), "line one line two");
    }

    #[test]
    fn test_take_and_recall() {
        let mut input = typed("first");
        assert_eq!(input.take(), "first");
        assert_eq!(input.content(), "");
        for c in "second".chars() {
            input.handle_action(&Action::Char(c), 80);
        }
        input.take();

        input.handle_action(&Action::Char('x'), 80);
        assert!(input.handle_action(&Action::Up, 80));
        assert_eq!(input.content(), "second");
        assert!(input.handle_action(&Action::Up, 80));
        assert_eq!(input.content(), "first");
        assert!(!input.handle_action(&Action::Up, 80));
        input.handle_action(&Action::Down, 80);
        input.handle_action(&Action::Down, 80);
        assert_eq!(input.content(), "x");
    }

    #[test]
    fn test_blank_lines_not_remembered() {
        let mut input = typed("   ");
        input.take();
        assert!(!input.handle_action(&Action::Up, 80));
    }
}
