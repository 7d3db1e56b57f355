mod cli;
mod client;

use std::time::Duration;

use clap::Parser;
use cli::Cli;
use clipsta::ClipboardConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = ClipboardConfig {
        open_attempts: cli.open_attempts,
        retry_interval: Duration::from_millis(cli.retry_interval_ms),
        ..ClipboardConfig::default()
    };

    let name = cli.command.name();
    if let Err(e) = client::run(cli.command, config).await {
        tracing::error!(error = %e, command = name, "command failed");
        eprintln!("clipsta {name}: {e}");
        std::process::exit(1);
    }
}
