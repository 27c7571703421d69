//! Display helpers for amounts, dates and percentages.

use chrono::{DateTime, NaiveDate};

/// Format an amount the way the workshop prints it: `Bs 1.234,50`
pub fn format_money(value: f64, currency_symbol: &str) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = format_grouped_int(cents / 100);
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{} {},{:02}", sign, currency_symbol, whole, cents % 100)
}

/// Group digits in thousands with '.'
pub fn format_grouped_int(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

/// Render a fraction as a whole percentage (`0.256` → `26%`)
pub fn format_percent(fraction: f64) -> String {
    format_percent_with(fraction, 0)
}

pub fn format_percent_with(fraction: f64, decimals: usize) -> String {
    let pct = if fraction.is_finite() { fraction * 100.0 } else { 0.0 };
    format!("{:.*}%", decimals, pct)
}

/// Read the date part of a backend timestamp (`2025-03-14` or RFC 3339)
pub fn parse_backend_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    raw.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}

/// Day-first date for tables, `N/A` when missing
pub fn display_date(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => "N/A".to_string(),
        Some(s) => parse_backend_date(s)
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| s.to_string()),
    }
}

/// Progress bar for terminal tables, e.g. `[#####-----]`
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let clamped = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (clamped * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
