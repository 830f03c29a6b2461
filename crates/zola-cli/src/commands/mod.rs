//! Slash commands for interactive mode

use std::path::PathBuf;

/// Result of executing a slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Extract and attach these files
    Attach(Vec<PathBuf>),
    /// Detach every file with this name
    Remove(String),
    /// Reset the conversation to the greeting
    Clear,
    /// Re-send the last failed request
    Retry,
    /// Show a message to the user (not sent upstream)
    Message(String),
    /// Exit the application
    Exit,
    /// Unknown command
    Unknown(String),
}

/// Parse and execute a slash command
///
/// `files` are the currently attached names, used by `/files`.
pub fn execute_command(input: &str, files: &[String]) -> Option<CommandResult> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let (command, args) = match rest.split_once(char::is_whitespace) {
        Some((command, args)) => (command.to_lowercase(), args.trim()),
        None => (rest.to_lowercase(), ""),
    };

    Some(match command.as_str() {
        "help" | "h" | "?" => CommandResult::Message(help_message()),

        "attach" | "a" => {
            if args.is_empty() {
                CommandResult::Message("Usage: /attach <file.pdf>...".to_string())
            } else {
                CommandResult::Attach(args.split_whitespace().map(PathBuf::from).collect())
            }
        }

        "remove" | "rm" => {
            if args.is_empty() {
                CommandResult::Message("Usage: /remove <name>".to_string())
            } else {
                CommandResult::Remove(args.to_string())
            }
        }

        "files" | "f" => CommandResult::Message(file_list_message(files)),

        "clear" | "c" => CommandResult::Clear,

        "retry" | "r" => CommandResult::Retry,

        "quit" | "exit" | "q" => CommandResult::Exit,

        _ => CommandResult::Unknown(command),
    })
}

fn file_list_message(files: &[String]) -> String {
    if files.is_empty() {
        return "No files attached.".to_string();
    }
    let mut text = format!("Attached files ({}):", files.len());
    for name in files {
        text.push_str("\n  ");
        text.push_str(name);
    }
    text
}

fn help_message() -> String {
    r#"Available commands:
  /help, /h, /?          Show this help message
  /attach, /a <pdf>...   Extract PDFs and attach their text to the next message
  /remove, /rm <name>    Detach a file by name
  /files, /f             List attached files
  /retry, /r             Re-send the last failed message
  /clear, /c             Clear the conversation (attachments are kept)
  /quit, /exit, /q       Exit zola

Examples:
  /attach notes.pdf slides.pdf
  /remove notes.pdf"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_command() {
        assert_eq!(execute_command("hello", &[]), None);
    }

    #[test]
    fn test_attach_paths() {
        assert_eq!(
            execute_command("/attach a.pdf  docs/b.PDF", &[]),
            Some(CommandResult::Attach(vec![
                PathBuf::from("a.pdf"),
                PathBuf::from("docs/b.PDF")
            ]))
        );
        assert!(matches!(
            execute_command("/attach", &[]),
            Some(CommandResult::Message(_))
        ));
    }

    #[test]
    fn test_remove_keeps_spaces_in_name() {
        assert_eq!(
            execute_command("/remove my report.pdf", &[]),
            Some(CommandResult::Remove("my report.pdf".to_string()))
        );
    }

    #[test]
    fn test_files_lists_names() {
        let files = vec!["a.pdf".to_string(), "b.pdf".to_string()];
        let Some(CommandResult::Message(text)) = execute_command("/files", &files) else {
            panic!("expected message");
        };
        assert!(text.starts_with("Attached files (2):"));
        assert!(text.contains("  b.pdf"));

        assert_eq!(
            execute_command("/f", &[]),
            Some(CommandResult::Message("No files attached.".to_string()))
        );
    }

    #[test]
    fn test_aliases_and_unknown() {
        assert_eq!(execute_command("/CLEAR", &[]), Some(CommandResult::Clear));
        assert_eq!(execute_command("/r", &[]), Some(CommandResult::Retry));
        assert_eq!(execute_command("/q", &[]), Some(CommandResult::Exit));
        assert_eq!(
            execute_command("/model x", &[]),
            Some(CommandResult::Unknown("model".to_string()))
        );
    }
}
