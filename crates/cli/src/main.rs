use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::Cli;
use config::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vieweditor_cli=info,vieweditor_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Configuration ---
    let config = CliConfig::from_env();
    tracing::debug!(
        database = config.database_url.is_some(),
        pretty = config.pretty,
        "Loaded configuration"
    );

    let command = Cli::parse().command;
    if command.needs_database() {
        config.require_database_url()?;
    }

    let output = commands::run(command, &config).await?;
    println!("{output}");
    Ok(())
}
