use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

pub const DEFAULT_ORGANIZATION: &str = "NautilusOSS";
pub const DEFAULT_PROJECT_NUMBER: u32 = 2;
pub const DEFAULT_API_URL: &str = "https://api.github.com/graphql";
pub const DEFAULT_CSV_PATH: &str = "pending_payment_tasks.csv";
pub const DEFAULT_SUMMARY_PATH: &str = "pending_payment_summary.txt";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("GitHub token not found. Set the GITHUB_TOKEN environment variable.")]
    MissingToken,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub github: Option<GitHubConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GitHubConfig {
    pub organization: Option<String>,
    pub project_number: Option<u32>,
    pub api_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    pub csv_path: Option<PathBuf>,
    pub summary_path: Option<PathBuf>,
}

/// Values given on the command line. Each one beats the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub organization: Option<String>,
    pub project_number: Option<u32>,
    pub api_url: Option<String>,
    pub csv_path: Option<PathBuf>,
    pub summary_path: Option<PathBuf>,
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub token: String,
    pub organization: String,
    pub project_number: u32,
    pub api_url: String,
    pub csv_path: PathBuf,
    pub summary_path: PathBuf,
}

impl Settings {
    pub fn resolve(config: AppConfig, overrides: Overrides, token: String) -> Self {
        let github = config.github.unwrap_or_default();
        let output = config.output.unwrap_or_default();

        Self {
            token,
            organization: overrides
                .organization
                .or(github.organization)
                .unwrap_or_else(|| DEFAULT_ORGANIZATION.to_string()),
            project_number: overrides
                .project_number
                .or(github.project_number)
                .unwrap_or(DEFAULT_PROJECT_NUMBER),
            api_url: overrides
                .api_url
                .or(github.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            csv_path: overrides
                .csv_path
                .or(output.csv_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_PATH)),
            summary_path: overrides
                .summary_path
                .or(output.summary_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SUMMARY_PATH)),
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pending-payments")
        .join("config.toml")
}

/// Load the config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

/// Validate the raw token value read from the environment.
pub fn token_from(value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(ConfigError::MissingToken),
    }
}

pub fn load_token() -> Result<String, ConfigError> {
    token_from(std::env::var(TOKEN_ENV).ok())
}
