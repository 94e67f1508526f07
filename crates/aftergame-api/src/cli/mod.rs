//! CLI command definitions and dispatch for the `aftergame` binary.
//!
//! Uses clap derive macros for argument parsing. Commands are noun-verb
//! (e.g., `aftergame user create`, `aftergame stories import`).

pub mod chat;
pub mod score;
pub mod story;
pub mod user;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// A recovery companion for athletes leaving their sport.
#[derive(Parser)]
#[command(name = "aftergame", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (chat relay + REST API).
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Manage accounts.
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Talk to the coach through a running server.
    Chat {
        /// Base URL of the server.
        #[arg(long, env = "AFTERGAME_URL", default_value = "http://127.0.0.1:3000")]
        url: String,

        /// Access token from `aftergame user create` or login.
        #[arg(long, env = "AFTERGAME_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Manage the success story library.
    Stories {
        #[command(subcommand)]
        action: StoriesCommand,
    },

    /// Print the sentiment score of a piece of text.
    Score {
        /// Text to score.
        text: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create an account and print its first access token.
    Create {
        #[arg(long)]
        email: String,

        /// At least 8 characters.
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand)]
pub enum StoriesCommand {
    /// Import stories from a JSON array file.
    Import {
        /// Path to the JSON file.
        file: PathBuf,
    },

    /// List stories, featured first.
    #[command(alias = "ls")]
    List,
}
