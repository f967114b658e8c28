//! Date/time display helpers.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Display format for post publication dates.
pub const PUB_DATE_FORMAT: &str = "%d %b %Y %H:%M";

/// Parse a stored timestamp as UTC.
///
/// Accepts RFC3339 and the SQLite `YYYY-MM-DD HH:MM:SS[.fff]` form.
pub fn parse_utc(datetime_str: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(datetime_str) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a stored UTC timestamp in the given timezone.
///
/// Returns the input unchanged when either the timestamp or the timezone
/// cannot be parsed.
pub fn format_datetime(datetime_str: &str, timezone: &str, format: &str) -> String {
    let tz: Tz = match timezone.parse() {
        Ok(tz) => tz,
        Err(_) => return datetime_str.to_string(),
    };

    match parse_utc(datetime_str) {
        Some(utc) => utc.with_timezone(&tz).format(format).to_string(),
        None => datetime_str.to_string(),
    }
}

/// Format a post publication date for display.
pub fn format_pub_date(datetime_str: &str, timezone: &str) -> String {
    format_datetime(datetime_str, timezone, PUB_DATE_FORMAT)
}
