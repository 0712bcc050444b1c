use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::classify::BOUNTY_SYMBOL;
use crate::model::ProjectItem;
use crate::util::amount::{format_whole, parse_amount};

const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Sum of all parsed bounty amounts.
pub fn total_bounty(items: &[ProjectItem]) -> f64 {
    items.iter().map(|i| parse_amount(&i.bounty_amount)).sum()
}

/// Bounty totals per recipient, ordered by name. Items without a recipient
/// are left out.
pub fn totals_by_recipient(items: &[ProjectItem]) -> BTreeMap<&str, f64> {
    let mut totals = BTreeMap::new();
    for item in items.iter().filter(|i| !i.recipient.is_empty()) {
        *totals.entry(item.recipient.as_str()).or_insert(0.0) += parse_amount(&item.bounty_amount);
    }
    totals
}

/// Write the four report sections.
pub fn write_report<W: Write>(
    items: &[ProjectItem],
    generated_at: DateTime<Utc>,
    mut out: W,
) -> io::Result<()> {
    writeln!(out, "# Project Summary Report")?;
    writeln!(
        out,
        "Generated on: {}\n",
        generated_at.format("%a, %d %b %Y %H:%M:%S UTC")
    )?;

    writeln!(out, "## Overview")?;
    writeln!(out, "Total Items: {}", items.len())?;
    writeln!(
        out,
        "Total Bounty Value: {} {BOUNTY_SYMBOL}\n",
        format_whole(total_bounty(items))
    )?;

    writeln!(out, "## Items by Recipient")?;
    for (recipient, amount) in totals_by_recipient(items) {
        writeln!(out, "- {recipient}: {} {BOUNTY_SYMBOL}", format_whole(amount))?;
    }
    writeln!(out)?;

    writeln!(out, "## Recent Activity")?;
    for item in items.iter().take(RECENT_ACTIVITY_LIMIT) {
        let updated = item
            .updated_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        writeln!(
            out,
            "- {} (Updated: {updated}) - Recipient: {}, Bounty: {} {}",
            item.title, item.recipient, item.bounty_amount, item.bounty_symbol
        )?;
    }

    out.flush()
}

/// Create (or truncate) `path` and write the report, stamped with the
/// current time.
pub fn write_summary(items: &[ProjectItem], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_report(items, Utc::now(), BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", path.display()))
}
