mod app;
mod classify;
mod cli;
mod config;
mod model;
mod providers;
mod report;
mod util;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // A local .env may carry GITHUB_TOKEN
    dotenvy::dotenv().ok();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = cli::handle_run(&cli).await {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}
