//! Date/time parsing for the free-form date strings the sources publish.

use crate::error::{Result, ScraperError};
use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{Datelike, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};

/// Candidate formats, tried in order; the first one that consumes the whole
/// string wins.
const EVENT_DATE_FORMATS: [&str; 9] = [
    "%d %b %a %I:%M%p", // 27 Sep Sat 4:15pm
    "%b %d %a %I:%M%p", // Sep 27 Sat 4:15pm
    "%d %b %Y",         // 27 Sep 2025
    "%b %d %Y",         // Sep 27 2025
    "%d %b",            // 27 Sep
    "%b %d",            // Sep 27
    "%Y-%m-%d",         // 2025-09-27
    "%d/%m/%Y",         // 27/09/2025
    "%m/%d/%Y",         // 09/27/2025
];

/// Format of the `from`/`to` bounds accepted by the API and CLI
pub const RANGE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an event date/time string relative to today's local date.
pub fn parse_event_date(text: &str) -> Option<NaiveDateTime> {
    parse_event_date_on(text, Local::now().date_naive())
}

/// Parse an event date/time string. Formats without a year resolve to the
/// nearest occurrence on or after `today`.
pub fn parse_event_date_on(text: &str, today: NaiveDate) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    EVENT_DATE_FORMATS
        .iter()
        .find_map(|fmt| parse_with_format(text, fmt, today))
}

fn parse_with_format(text: &str, fmt: &str, today: NaiveDate) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::new();
    format::parse(&mut parsed, text, StrftimeItems::new(fmt)).ok()?;

    let month = parsed.month()?;
    let day = parsed.day()?;
    let date = match parsed.year() {
        Some(year) => NaiveDate::from_ymd_opt(year, month, day)?,
        None => infer_date(month, day, today)?,
    };

    // Weekday tokens are accepted but never checked against the date.
    let time = if parsed.hour_div_12().is_some() {
        parsed.to_naive_time().ok()?
    } else {
        NaiveTime::MIN
    };

    Some(date.and_time(time))
}

/// First occurrence of month/day on or after `today`. A yearless 29 Feb
/// moves forward to the next leap year.
fn infer_date(month: u32, day: u32, today: NaiveDate) -> Option<NaiveDate> {
    let first_year = if (month, day) < (today.month(), today.day()) {
        today.year() + 1
    } else {
        today.year()
    };
    // Leap years are at most eight years apart
    (first_year..=first_year + 8).find_map(|year| NaiveDate::from_ymd_opt(year, month, day))
}

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Parse optional `from`/`to` bounds. Returns `None` when neither is given.
/// A missing `from` means one year ago and a missing `to` two years ahead.
pub fn parse_date_range(
    from: Option<&str>,
    to: Option<&str>,
    today: NaiveDate,
) -> Result<Option<DateRange>> {
    let from = from.map(str::trim).filter(|s| !s.is_empty());
    let to = to.map(str::trim).filter(|s| !s.is_empty());
    if from.is_none() && to.is_none() {
        return Ok(None);
    }

    let start = match from {
        Some(value) => parse_bound("from", value)?,
        None => today.checked_sub_months(Months::new(12)).unwrap_or(NaiveDate::MIN),
    };
    let end = match to {
        Some(value) => parse_bound("to", value)?,
        None => today.checked_add_months(Months::new(24)).unwrap_or(NaiveDate::MAX),
    };

    Ok(Some(DateRange { start, end }))
}

fn parse_bound(field: &'static str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, RANGE_DATE_FORMAT).map_err(|_| ScraperError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
