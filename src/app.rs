use anyhow::{Context, Result};

use crate::classify::classify_items;
use crate::config::Settings;
use crate::providers::ProjectSource;
use crate::report::{export_records, write_summary};

/// What a run fetched and wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub project_id: String,
    pub fetched: usize,
    pub pending: usize,
    pub truncated: bool,
}

pub struct App {
    source: Box<dyn ProjectSource>,
    settings: Settings,
}

impl App {
    pub fn new(source: Box<dyn ProjectSource>, settings: Settings) -> Self {
        Self { source, settings }
    }

    /// Fetch the board, keep pending payments, then write the CSV followed by
    /// the summary.
    pub async fn run(&self) -> Result<RunReport> {
        let settings = &self.settings;

        let project_id = self
            .source
            .resolve_project_id(&settings.organization, settings.project_number)
            .await
            .with_context(|| {
                format!(
                    "Error getting project ID for {} project {}",
                    settings.organization, settings.project_number
                )
            })?;
        tracing::info!("Project ID: {project_id}");

        let page = self
            .source
            .fetch_items(&project_id)
            .await
            .context("Error getting project items")?;
        let fetched = page.items.len();
        if page.has_more {
            tracing::warn!(
                "{} holds more than {fetched} items; only the first page is processed",
                self.source.name()
            );
        }

        let items = classify_items(page.items);
        for item in &items {
            tracing::debug!(
                id = %item.id,
                recipient = %item.recipient,
                bounty = %item.bounty_amount,
                assignees = ?item.assignees,
                labels = ?item.labels,
                "pending payment: {}",
                item.title
            );
        }
        tracing::info!("Found {} 'Pending Payment' items in the project", items.len());

        export_records(&items, &settings.csv_path).context("Error generating CSV")?;
        tracing::info!("CSV file generated: {}", settings.csv_path.display());

        write_summary(&items, &settings.summary_path)
            .context("Error generating summary report")?;
        tracing::info!(
            "Summary report generated: {}",
            settings.summary_path.display()
        );

        Ok(RunReport {
            project_id,
            fetched,
            pending: items.len(),
            truncated: page.has_more,
        })
    }
}
