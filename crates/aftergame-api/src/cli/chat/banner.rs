//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(server_url: &str, history_window: usize) {
    println!();
    println!("  * {}", style("Aftergame Coach").cyan().bold());
    println!(
        "  {}",
        style("A space to talk through life after your sport.").dim()
    );
    println!();
    println!("  {}  {}", style("Server:").bold(), style(server_url).dim());
    println!(
        "  {}  {}",
        style("Context:").bold(),
        style(format!("last {history_window} messages")).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
