//! Dates as they come out of spreadsheet-backed feeds.

use chrono::{DateTime, Days, NaiveDate};
use serde_json::Value;

/// Serial numbers above this are unix seconds rather than spreadsheet days.
const UNIX_SECONDS_THRESHOLD: f64 = 100_000.0;

const TEXT_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y"];

/// Parse a sheet cell into a calendar date.
///
/// Numbers are spreadsheet serial days (epoch 1899-12-30) or, when large,
/// unix seconds. Strings may hold either number form, an ISO or RFC 3339
/// date, `MM/DD/YYYY` or `Month D, YYYY`.
pub fn parse_sheet_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => from_serial(n.as_f64()?),
        Value::String(s) => parse_date_text(s),
        _ => None,
    }
}

/// Text flavour of [`parse_sheet_date`].
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(serial) = text.parse::<f64>() {
        return from_serial(serial);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    TEXT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    if serial > UNIX_SECONDS_THRESHOLD {
        #[allow(clippy::cast_possible_truncation)]
        let secs = serial as i64;
        return DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive());
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let days = serial.floor() as u64;
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(days))
}

/// `March 5, 2026`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Human date range, collapsing the parts both ends share.
pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    use chrono::Datelike;

    if end <= start {
        return format_date(start);
    }
    if start.year() == end.year() && start.month() == end.month() {
        return format!(
            "{} {}-{}, {}",
            start.format("%B"),
            start.day(),
            end.day(),
            start.year()
        );
    }
    if start.year() == end.year() {
        return format!(
            "{} - {}, {}",
            start.format("%B %-d"),
            end.format("%B %-d"),
            start.year()
        );
    }
    format!("{} - {}", format_date(start), format_date(end))
}
