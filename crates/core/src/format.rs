//! Display formatting and HTML escaping.
//!
//! Every user-supplied string (notes, descriptions, names) must pass through
//! [`escape_html`] before it is placed in markup.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Shown in place of a missing value.
pub const PLACEHOLDER: &str = "—";

/// Escape text for safe insertion into HTML element content or a quoted
/// attribute value.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Format an integer with `,` thousands separators.
pub fn format_int(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format an odometer-style reading, rounded to whole kilometres.
pub fn format_km(value: Option<f64>) -> String {
    match value {
        Some(km) if km.is_finite() => format!("{} km", format_int(km.round() as i64)),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn format_timestamp(value: Option<DateTime<Utc>>) -> String {
    match value {
        Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Human age of a timestamp in whole days relative to `now`.
pub fn format_age_days(value: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(ts) = value else {
        return "never".to_string();
    };
    match now.signed_duration_since(ts).num_days() {
        d if d <= 0 => "today".to_string(),
        1 => "1 day ago".to_string(),
        d => format!("{d} days ago"),
    }
}

/// Parse the timestamp shapes the backend emits.
///
/// Accepts RFC 3339, naive `YYYY-MM-DD HH:MM:SS` (with `T` or space, optional
/// fractional seconds) interpreted as UTC, and bare dates at midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
