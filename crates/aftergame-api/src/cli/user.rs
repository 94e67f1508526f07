//! Account CLI commands.

use anyhow::Result;
use console::style;

use aftergame_types::identity::Credentials;

use crate::state::AppState;

/// Create an account and print its first access token.
///
/// ```bash
/// aftergame user create --email sam@example.com --password 'correct horse'
/// ```
pub async fn create_user(state: &AppState, email: String, password: String, json: bool) -> Result<()> {
    let issued = state
        .account_service
        .signup(&Credentials { email, password })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&issued)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Account created ({})",
        style("✓").green().bold(),
        style(&issued.user_id).dim()
    );
    println!();
    println!(
        "  {} Access token (save this -- it won't be shown again):",
        style("🔑").bold()
    );
    println!();
    println!("  {}", style(&issued.token).yellow().bold());
    println!();
    println!(
        "  Start a session with: {}",
        style("aftergame chat --token <token>").cyan()
    );
    println!();

    Ok(())
}
