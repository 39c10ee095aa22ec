use std::cmp::Ordering;

use chrono::{Days, Months, NaiveDate};

use crate::error::{ReproError, ReproResult};

/// A calendar day with no time of day and no zone.
pub type LocalDate = NaiveDate;

/// Wire format for every date crossing the engine boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string into a calendar day.
///
/// A trailing time component (`2024-01-01T00:00:00Z`) is ignored; only the
/// date part is read. Impossible days such as `2023-02-30` are rejected rather
/// than rolled into the next month.
pub fn parse_local_date(iso: &str) -> ReproResult<LocalDate> {
    let invalid = || ReproError::InvalidDate {
        input: iso.to_string(),
    };

    let trimmed = iso.trim();
    let date_part = trimmed.split('T').next().unwrap_or(trimmed);

    let mut parts = date_part.split('-');
    let (Some(y), Some(m), Some(d), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let year: i32 = parse_component(y).ok_or_else(invalid)?;
    let month: u32 = parse_component(m).ok_or_else(invalid)?;
    let day: u32 = parse_component(d).ok_or_else(invalid)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Parse an optional wire field; blank strings count as absent.
pub fn parse_optional(iso: Option<&str>) -> ReproResult<Option<LocalDate>> {
    match iso.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_local_date(s).map(Some),
    }
}

fn parse_component<T: std::str::FromStr>(raw: &str) -> Option<T> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

pub fn format_local_date(date: LocalDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Shift a date by `n` days, saturating at the calendar bounds.
pub fn add_days(date: LocalDate, n: i64) -> LocalDate {
    let days = Days::new(n.unsigned_abs());
    if n < 0 {
        date.checked_sub_days(days).unwrap_or(NaiveDate::MIN)
    } else {
        date.checked_add_days(days).unwrap_or(NaiveDate::MAX)
    }
}

/// Shift a date forward by whole months, clamping to the last day of short
/// months (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: LocalDate, months: u32) -> LocalDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Signed number of days from `a` to `b`.
pub fn days_between(a: LocalDate, b: LocalDate) -> i64 {
    (b - a).num_days()
}

pub fn compare(a: LocalDate, b: LocalDate) -> Ordering {
    a.cmp(&b)
}

pub fn min_date(a: LocalDate, b: LocalDate) -> LocalDate {
    a.min(b)
}

pub fn max_date(a: LocalDate, b: LocalDate) -> LocalDate {
    a.max(b)
}
