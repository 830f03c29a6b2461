//! Markdown rendering for assistant replies

use crate::theme::Theme;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

/// Cut `line` to at most `max` display columns, marking the cut with `…`.
fn truncate_to_width(line: &str, max: usize) -> String {
    let total: usize = line.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max {
        return line.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn flush<'a>(lines: &mut Vec<Line<'a>>, current: &mut Vec<Span<'a>>) {
    if !current.is_empty() {
        lines.push(Line::from(std::mem::take(current)));
    }
}

/// Convert markdown text to styled lines.
///
/// Prose is left for the caller's paragraph to wrap; code lines are cut at
/// `width` so indentation survives.
pub fn render_markdown<'a>(text: &str, theme: &Theme, width: usize) -> Vec<Line<'a>> {
    let mut lines: Vec<Line<'a>> = Vec::new();
    let mut current: Vec<Span<'a>> = Vec::new();
    let mut style = theme.base_style();
    let mut in_code_block = false;
    let mut code = String::new();
    // One entry per open list: next number for ordered lists
    let mut lists: Vec<Option<u64>> = Vec::new();

    for event in Parser::new(text) {
        match event {
            Event::Start(tag) => match tag {
                Tag::Heading { level, .. } => {
                    flush(&mut lines, &mut current);
                    style = match level {
                        HeadingLevel::H1 => theme
                            .accent_style()
                            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                        HeadingLevel::H2 => theme.accent_bold(),
                        _ => theme.accent_style(),
                    };
                }
                Tag::Paragraph => flush(&mut lines, &mut current),
                Tag::CodeBlock(_) => {
                    flush(&mut lines, &mut current);
                    in_code_block = true;
                    code.clear();
                }
                Tag::List(start) => {
                    lists.push(start);
                }
                Tag::Item => {
                    flush(&mut lines, &mut current);
                    let indent = "  ".repeat(lists.len().saturating_sub(1));
                    let marker = match lists.last_mut() {
                        Some(Some(n)) => {
                            let marker = format!("{}{}. ", indent, n);
                            *n += 1;
                            marker
                        }
                        _ => format!("{}• ", indent),
                    };
                    current.push(Span::styled(marker, theme.dim_style()));
                }
                Tag::Emphasis => style = style.add_modifier(Modifier::ITALIC),
                Tag::Strong => style = style.add_modifier(Modifier::BOLD),
                Tag::Strikethrough => style = style.add_modifier(Modifier::CROSSED_OUT),
                Tag::Link { .. } => {
                    style = Style::default()
                        .fg(theme.link)
                        .add_modifier(Modifier::UNDERLINED);
                }
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Heading(_) => {
                    flush(&mut lines, &mut current);
                    style = theme.base_style();
                }
                TagEnd::Paragraph => {
                    flush(&mut lines, &mut current);
                    if lists.is_empty() {
                        lines.push(Line::from(""));
                    }
                }
                TagEnd::CodeBlock => {
                    in_code_block = false;
                    let code_style = theme.code_style().add_modifier(Modifier::DIM);
                    for code_line in code.lines() {
                        let shown = truncate_to_width(code_line, width.saturating_sub(2));
                        lines.push(Line::from(Span::styled(format!("  {}", shown), code_style)));
                    }
                    lines.push(Line::from(""));
                }
                TagEnd::List(_) => {
                    lists.pop();
                    if lists.is_empty() {
                        lines.push(Line::from(""));
                    }
                }
                TagEnd::Item => flush(&mut lines, &mut current),
                TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                    style = theme.base_style();
                }
                _ => {}
            },
            Event::Text(text) => {
                if in_code_block {
                    code.push_str(&text);
                } else {
                    current.push(Span::styled(text.into_string(), style));
                }
            }
            Event::Code(inline) => {
                current.push(Span::styled(
                    format!("`{}`", inline),
                    theme.code_style().add_modifier(Modifier::BOLD),
                ));
            }
            Event::SoftBreak => current.push(Span::raw(" ")),
            Event::HardBreak => flush(&mut lines, &mut current),
            Event::Rule => {
                flush(&mut lines, &mut current);
                lines.push(Line::from(Span::styled(
                    "─".repeat(width.clamp(1, 40)),
                    theme.dim_style(),
                )));
            }
            _ => {}
        }
    }

    flush(&mut lines, &mut current);

    // Trailing blank lines come from the last block's spacing
    while lines.last().is_some_and(|l| l.width() == 0) {
        lines.pop();
    }

    lines
}
