//! Conversion between human date strings and the PDF date format.
//!
//! PDF dates look like `D:20240115093000+01'00'`. Folio always writes UTC
//! (`+00'00'`) so that the stored value depends only on the instant.
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Unrecognized date/time: '{0}'")]
    Unrecognized(String),
    #[error("Malformed PDF date: '{0}'")]
    MalformedPdfDate(String),
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parses a loosely formatted date/time string into a UTC instant.
///
/// Inputs without an explicit offset are read as UTC; a bare date means
/// midnight of that day.
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, DateError> {
    let s = input.trim();

    if let Some(secs) = s.strip_prefix('@') {
        return secs
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| DateError::Unrecognized(input.to_string()));
    }
    if s.starts_with("D:") {
        return parse_pdf_date(s).map(|dt| dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DateError::Unrecognized(input.to_string()))
}

/// Encodes an instant in the PDF date format.
pub fn pdf_date(instant: DateTime<Utc>) -> String {
    instant.format("D:%Y%m%d%H%M%S+00'00'").to_string()
}

/// Decodes a PDF date string. Every field after the year is optional.
pub fn parse_pdf_date(input: &str) -> Result<DateTime<FixedOffset>, DateError> {
    let malformed = || DateError::MalformedPdfDate(input.to_string());
    let body = input.trim().strip_prefix("D:").unwrap_or(input.trim());

    let digits_len = body.bytes().take_while(u8::is_ascii_digit).count();
    let (digits, tz) = body.split_at(digits_len);
    if digits.len() < 4 || digits.len() > 14 || digits.len() % 2 != 0 {
        return Err(malformed());
    }

    let field = |start: usize, default: u32| -> Result<u32, DateError> {
        match digits.get(start..start + 2) {
            Some(part) => part.parse().map_err(|_| malformed()),
            None => Ok(default),
        }
    };
    let year: i32 = digits[0..4].parse().map_err(|_| malformed())?;
    let month = field(4, 1)?;
    let day = field(6, 1)?;
    let hour = field(8, 0)?;
    let minute = field(10, 0)?;
    let second = field(12, 0)?;

    let offset_secs = parse_pdf_offset(tz).ok_or_else(malformed)?;
    let offset = FixedOffset::east_opt(offset_secs).ok_or_else(malformed)?;
    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .ok_or_else(malformed)?;

    offset.from_local_datetime(&naive).single().ok_or_else(malformed)
}

fn parse_pdf_offset(tz: &str) -> Option<i32> {
    let mut chars = tz.chars();
    let sign = match chars.next() {
        None | Some('Z') => return Some(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };
    let rest: String = chars.filter(|c| *c != '\'').collect();
    let hours: i32 = rest.get(0..2)?.parse().ok()?;
    let minutes: i32 = match rest.get(2..4) {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    Some(sign * (hours * 3600 + minutes * 60))
}
