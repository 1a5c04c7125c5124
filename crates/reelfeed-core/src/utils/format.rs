use chrono::{DateTime, NaiveDate};

/// Long date format used on cards and the detail view, e.g. "17 October 2026"
const LONG_DATE_FORMAT: &str = "%-d %B %Y";

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an RFC 3339 or `YYYY-MM-DD` date for display.
/// Anything else is returned unchanged.
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return dt.format(LONG_DATE_FORMAT).to_string();
    }

    let day: String = date.chars().take(10).collect();
    match NaiveDate::parse_from_str(&day, "%Y-%m-%d") {
        Ok(d) => d.format(LONG_DATE_FORMAT).to_string(),
        Err(_) => date.to_string(),
    }
}
