//! Compact display formatting for market-cap amounts.

/// Formats an amount the way the header shows it: `1.23B`, `4.50M`, `12.5K`, `950`.
pub fn format_amount(amount: u64) -> String {
    let value = amount as f64;
    if amount >= 1_000_000_000 {
        format!("{:.2}B", value / 1_000_000_000.0)
    } else if amount >= 1_000_000 {
        format!("{:.2}M", value / 1_000_000.0)
    } else if amount >= 1_000 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        amount.to_string()
    }
}
