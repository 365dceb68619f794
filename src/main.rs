//! Hark CLI entry point.

use anyhow::Result;
use clap::Parser;
use hark::cli::{commands, Cli, Commands};
use hark::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("hark={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let config_path = commands::effective_path(cli.config.as_deref());
    let settings = Settings::load_from(Some(&config_path))?;

    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match &cli.command {
        Commands::List { level, pages } => {
            commands::run_list(level, *pages, settings).await?;
        }

        Commands::Search { query } => {
            commands::run_search(query, settings).await?;
        }

        Commands::Show { id, transcript, vocab } => {
            commands::run_show(id, *transcript, *vocab, settings).await?;
        }

        Commands::Next { id } => {
            commands::run_navigate(id, commands::Direction::Next, settings).await?;
        }

        Commands::Prev { id } => {
            commands::run_navigate(id, commands::Direction::Previous, settings).await?;
        }

        Commands::Favorite { id } => {
            commands::run_favorite(id, settings).await?;
        }

        Commands::Favorites => {
            commands::run_favorites(settings).await?;
        }

        Commands::Complete { id } => {
            commands::run_complete(id, settings).await?;
        }

        Commands::Track { id, position, duration } => {
            commands::run_track(id, *position, *duration, settings).await?;
        }

        Commands::Continue => {
            commands::run_continue(settings).await?;
        }

        Commands::Practice { id, line, said } => {
            commands::run_practice(id, *line, said, settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host, *port, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, &config_path)?;
        }
    }

    Ok(())
}
