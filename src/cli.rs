use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::app::App;
use crate::config::{self, Overrides, Settings};
use crate::providers;

/// Export "Pending Payment" items from a GitHub project board
#[derive(Parser, Debug)]
#[command(name = "pending-payments", version)]
#[command(about = "Export \"Pending Payment\" items from a GitHub project board")]
#[command(long_about = r#"pending-payments - Export "Pending Payment" items from a GitHub project board

Writes a CSV of every item whose Status is "Pending Payment", plus a text
summary of bounty totals per recipient.

REQUIREMENTS:
    GITHUB_TOKEN must hold a token allowed to read the organization's projects"#)]
pub struct Cli {
    /// GitHub organization that owns the project
    #[arg(long, value_name = "LOGIN")]
    pub org: Option<String>,

    /// Project number within the organization
    #[arg(long, value_name = "NUMBER")]
    pub project: Option<u32>,

    /// Where to write the CSV export
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Where to write the summary report
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,

    /// Config file (default: ~/.pending-payments/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// GraphQL endpoint
    #[arg(long, value_name = "URL", hide = true)]
    pub api_url: Option<String>,

    /// Log debug output, including every pending item
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            organization: self.org.clone(),
            project_number: self.project,
            api_url: self.api_url.clone(),
            csv_path: self.csv.clone(),
            summary_path: self.summary.clone(),
        }
    }
}

/// Resolve settings from flags, config file and environment, then run the export.
pub async fn handle_run(cli: &Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let config = config::load_config(&config_path)?;
    let token = config::load_token()?;
    let settings = Settings::resolve(config, cli.overrides(), token);

    tracing::debug!(
        organization = %settings.organization,
        project = settings.project_number,
        "Resolved settings"
    );

    let source = providers::create_source(&settings);
    let app = App::new(source, settings);
    let report = app.run().await?;
    tracing::debug!(
        project = %report.project_id,
        fetched = report.fetched,
        pending = report.pending,
        truncated = report.truncated,
        "Run finished"
    );
    Ok(())
}
