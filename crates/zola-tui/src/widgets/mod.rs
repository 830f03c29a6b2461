//! Custom widgets for the TUI

pub mod banner;
pub mod file_list;
pub mod input_box;
pub mod markdown;
pub mod message_list;
pub mod spinner;

pub use banner::Banner;
pub use file_list::FileList;
pub use input_box::InputBox;
pub use message_list::{DisplayMessage, MessageList, Speaker};
pub use spinner::Spinner;
