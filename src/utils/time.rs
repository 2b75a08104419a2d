//! Clock helpers shared by the services and the import normalizer.

use chrono::{DateTime, Local, NaiveDate, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current calendar date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses `YYYY-MM-DD`, also accepting that prefix of a full timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Some(date);
    }
    let prefix = trimmed.get(..10)?;
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}

/// Parses an RFC 3339 timestamp, or a bare date taken as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    parse_date(trimmed)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
