use chrono::{DateTime, NaiveDate};

/// Formats a form date (`YYYY-MM-DD` or RFC 3339) as e.g. "January 5, 1990".
///
/// Returns `None` for an empty value so the caller omits the line entirely.
/// Values that do not parse are shown as typed.
pub fn format_long_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()));

    Some(match date {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => raw.to_string(),
    })
}
