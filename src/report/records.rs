use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::model::ProjectItem;

pub const HEADER: [&str; 10] = [
    "ID",
    "Title",
    "URL",
    "Created At",
    "Updated At",
    "Due Date",
    "Description",
    "Recipient",
    "Bounty Amount",
    "Bounty Symbol",
];

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

fn row(item: &ProjectItem) -> [String; 10] {
    [
        item.id.clone(),
        item.title.clone(),
        item.url.clone(),
        timestamp(item.created_at),
        timestamp(item.updated_at),
        // No board field feeds the due date.
        String::new(),
        item.description.clone(),
        item.recipient.clone(),
        item.bounty_amount.clone(),
        item.bounty_symbol.clone(),
    ]
}

/// Write the header and one row per item.
pub fn write_records<W: Write>(items: &[ProjectItem], out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(HEADER)?;
    for item in items {
        writer.write_record(row(item))?;
    }
    writer.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write the records into it.
pub fn export_records(items: &[ProjectItem], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_records(items, file).with_context(|| format!("Failed to write {}", path.display()))
}
