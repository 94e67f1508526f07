//! Aftergame CLI and HTTP server entry point.
//!
//! Binary name: `aftergame`
//!
//! Parses CLI arguments, initializes tracing, database and services, then
//! dispatches to the appropriate command handler or starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use aftergame_infra::config::{load_app_config, resolve_data_dir};
use aftergame_observe::{TracingOptions, init_tracing, json_from_env, shutdown_tracing, verbosity_filter};
use cli::{Cli, Commands, StoriesCommand, UserCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&TracingOptions {
        default_filter: verbosity_filter(cli.verbose, cli.quiet).to_string(),
        json: json_from_env(),
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Commands that need no database
    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(*shell, &mut cmd, "aftergame", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Score { text } => return cli::score::print_score(text, cli.json),
        Commands::Chat { url, token } => {
            let config = load_app_config(&resolve_data_dir()).await;
            return cli::chat::loop_runner::run_chat_loop(url, token.clone(), &config).await;
        }
        _ => {}
    }

    // Initialize application state (DB, services)
    let state = AppState::init().await?;

    match cli.command {
        Commands::User { action } => match action {
            UserCommand::Create { email, password } => {
                cli::user::create_user(&state, email, password, cli.json).await?;
            }
        },

        Commands::Stories { action } => match action {
            StoriesCommand::Import { file } => {
                cli::story::import_stories(&state, &file, cli.json).await?;
            }
            StoriesCommand::List => {
                cli::story::list_stories(&state, cli.json).await?;
            }
        },

        Commands::Serve { port, host } => {
            if !state.chat_relay_configured() {
                println!(
                    "  {} No gateway API key set; chat requests will fail until {} is exported.",
                    console::style("!").yellow().bold(),
                    console::style(aftergame_infra::config::GATEWAY_KEY_ENV).yellow()
                );
            }

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Aftergame listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            tracing::info!(
                data_dir = %state.data_dir.display(),
                chat_model = %state.config.chat_model,
                "serving"
            );
            let db_pool = state.db_pool.clone();
            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            db_pool.close().await;
            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } | Commands::Score { .. } | Commands::Chat { .. } => {
            unreachable!("handled above")
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
