//! Terminal output for the chat loop.
//!
//! Deltas are printed raw as they arrive; failures become one styled
//! notification line built from the error's user-facing message.

use std::io::Write;

use console::style;

use aftergame_types::chat::{ChatMessage, ChatRole};
use aftergame_types::error::ChatError;

use crate::cli::story::shorten;

/// Print a single streaming delta without a trailing newline.
pub fn print_streaming_token(token: &str) {
    print!("{token}");
    let _ = std::io::stdout().flush();
}

/// Label printed before the coach's reply.
pub fn print_reply_prefix() {
    print!("\n  {} ", style("Coach").cyan().bold());
    let _ = std::io::stdout().flush();
}

pub fn print_error(err: &ChatError) {
    eprintln!("\n  {} {}", style("!").red().bold(), err.user_message());
    if err.is_retryable() {
        eprintln!("  {}", style("Send your message again to retry.").dim());
    }
    eprintln!();
}

/// One line per message, truncated for readability.
pub fn print_history(messages: &[ChatMessage]) {
    println!();
    if messages.is_empty() {
        println!("  {}", style("Nothing said yet.").dim());
    }
    for line in history_lines(messages) {
        println!("  {line}");
    }
    println!();
}

fn history_lines(messages: &[ChatMessage]) -> Vec<String> {
    messages
        .iter()
        .map(|msg| {
            let label = match msg.role {
                ChatRole::User => style("You").green().bold(),
                ChatRole::Assistant => style("Coach").cyan().bold(),
            };
            format!("{label} {}", shorten(&msg.content, 100))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_lines_truncate_long_messages() {
        console::set_colors_enabled(false);
        let lines = history_lines(&[
            ChatMessage::user("I just got cut from the team"),
            ChatMessage::assistant("x".repeat(150)),
        ]);
        assert_eq!(lines[0], "You I just got cut from the team");
        assert!(lines[1].starts_with("Coach xxx"));
        assert!(lines[1].ends_with("..."));
        assert_eq!(lines[1].chars().count(), "Coach ".len() + 100);
    }
}
