//! Local calendar-day date helpers.
//!
//! The model works in local calendar days: a quit date is a `YYYY-MM-DD`
//! string, and "now" is always passed explicitly so every computation is
//! reproducible. No function here reads the wall clock.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Average Gregorian year length in days, used to turn whole-day
/// differences into fractional years.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Parse a strict `YYYY-MM-DD` date. Rejects impossible calendar dates
/// (e.g. `2026-02-30`) and any trailing garbage.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Shift an ISO date string by a signed number of days.
///
/// Returns `None` when the input does not parse or the shift overflows
/// the calendar range.
pub fn add_days_to_iso(value: &str, days: i64) -> Option<String> {
    let date = parse_iso_date(value)?;
    date.checked_add_signed(Duration::days(days))
        .map(format_iso_date)
}

/// Whole local calendar days elapsed from `date` to `now`, clamped to zero
/// for future dates. Time of day is ignored on both sides.
pub fn days_since(date: NaiveDate, now: NaiveDateTime) -> i64 {
    (now.date() - date).num_days().max(0)
}

/// Like [`days_since`] but for a raw ISO string; an unparseable date
/// counts as zero elapsed days.
pub fn days_since_iso(value: &str, now: NaiveDateTime) -> i64 {
    parse_iso_date(value)
        .map(|date| days_since(date, now))
        .unwrap_or(0)
}

/// Fractional smoking years between a start and quit date, from the
/// whole-day difference divided by the average year length. Inverted
/// ranges count as zero.
pub fn years_between(start: NaiveDate, end: NaiveDate) -> f64 {
    (end - start).num_days().max(0) as f64 / DAYS_PER_YEAR
}

/// The date a given number of fractional years before `now`, counted
/// back in whole days.
pub fn date_years_before(years: f64, now: NaiveDateTime) -> NaiveDate {
    let days = (years * DAYS_PER_YEAR).round() as i64;
    now.date() - Duration::days(days)
}

/// Date of birth equivalent for a given age in years.
pub fn infer_dob_from_age_years(age_years: f64, now: NaiveDateTime) -> NaiveDate {
    date_years_before(age_years, now)
}

/// Fractional age in years at `now` for a given date of birth.
pub fn age_years_at(dob: NaiveDate, now: NaiveDateTime) -> f64 {
    (now.date() - dob).num_days() as f64 / DAYS_PER_YEAR
}
