//! The chat loop: read a line, run a turn, render deltas live.
//!
//! Each completed turn is persisted in the background by the turn runner;
//! the loop waits for outstanding writes before returning.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use aftergame_core::chat::transport::{ChatTransport, ConversationSink};
use aftergame_core::chat::turn::{TurnConfig, TurnRunner};
use aftergame_infra::http::relay_client::{HttpChatTransport, HttpConversationSink};
use aftergame_types::config::AppConfig;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::renderer;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// What happened during one session.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub turns: usize,
    pub failures: usize,
}

/// Run an interactive session on stdin against the server at `url`.
pub async fn run_chat_loop(url: &str, token: String, config: &AppConfig) -> Result<()> {
    let client = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;
    let token = SecretString::from(token);

    let mut runner = TurnRunner::new(
        HttpChatTransport::new(client.clone(), url, token.clone()),
        HttpConversationSink::new(client, url, token),
        TurnConfig {
            idle_timeout: Duration::from_secs(config.stream_idle_timeout_secs),
            max_history: config.history_limit(),
        },
    );

    print_welcome_banner(url, config.history_limit());

    let summary = run_session(&mut runner, BufReader::new(tokio::io::stdin())).await?;
    tracing::info!(turns = summary.turns, failures = summary.failures, "chat session ended");
    Ok(())
}

/// Drive `runner` with lines from `input` until EOF or `/exit`.
pub async fn run_session<T, S, R>(runner: &mut TurnRunner<T, S>, input: R) -> Result<SessionSummary>
where
    T: ChatTransport,
    S: ConversationSink + 'static,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut summary = SessionSummary::default();
    let mut pending: Vec<JoinHandle<()>> = Vec::new();

    loop {
        print!("  {} ", style("You >").green().bold());
        let _ = std::io::stdout().flush();

        let Some(line) = lines.next_line().await? else {
            println!("\n  {}", style("Session ended.").dim());
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        if let Some(cmd) = commands::parse(text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => {
                    runner.reset();
                    println!("\n  {}\n", style("Started a fresh conversation.").dim());
                }
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::History => renderer::print_history(runner.transcript().messages()),
                ChatCommand::Unknown(name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
            }
            continue;
        }

        let spinner = thinking_spinner();
        let mut replying = false;
        let result = runner
            .run_turn(text, |update| {
                if !replying {
                    spinner.finish_and_clear();
                    renderer::print_reply_prefix();
                    replying = true;
                }
                renderer::print_streaming_token(update.delta);
            })
            .await;
        if !replying {
            spinner.finish_and_clear();
        }

        match result {
            Ok(turn) => {
                println!();
                println!();
                tracing::debug!(sentiment_score = turn.sentiment_score, "turn completed");
                summary.turns += 1;
                pending.retain(|handle| !handle.is_finished());
                pending.push(turn.persistence);
            }
            Err(e) => {
                summary.failures += 1;
                renderer::print_error(&e);
            }
        }
    }

    for handle in pending {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "conversation write task failed");
        }
    }
    Ok(summary)
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
