//! Calendar dates as the backend sends them and as the UI shows them.

use chrono::NaiveDate;

/// Parses a backend date or datetime string into a calendar date.
///
/// Accepts `2024-09-01` as well as RFC 3339 datetimes such as
/// `2024-09-01T00:00:00+05:00`. The date is taken as written; the offset is
/// not applied, so a due date never shifts by a day across time zones.
#[must_use]
pub fn parse_api_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10)?;
    if raw.len() > 10 && !raw[10..].starts_with(['T', ' ']) {
        return None;
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Formats a date as `DD.MM.YYYY`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
