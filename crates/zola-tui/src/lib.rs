//! zola-tui: Terminal UI widgets for the chat client
//!
//! Ratatui widgets for the message list, input line, typing indicator,
//! notification banner and attachment list, plus key-to-action mapping.

pub mod input;
pub mod theme;
pub mod widgets;

pub use theme::Theme;
