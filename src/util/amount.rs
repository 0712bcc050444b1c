/// Parse a bounty amount leniently. Empty, malformed or non-finite input
/// counts as zero.
pub fn parse_amount(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Format a value as a whole, non-negative number. Fractions are truncated.
pub fn format_whole(value: f64) -> String {
    let whole = value.trunc();
    if whole > 0.0 {
        format!("{whole:.0}")
    } else {
        "0".to_string()
    }
}
