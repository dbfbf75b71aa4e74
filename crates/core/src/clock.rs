//! Calendar arithmetic shared by every renderer.
//!
//! All instants are naive local wall-clock times. A render reads "now"
//! exactly once (through a [`Clock`]) and threads that value through every
//! derived quantity, so one wallpaper is internally consistent even if the
//! real clock ticks mid-render.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{RenderError, RenderResult};

pub const DAY_MS: i64 = 86_400_000;
pub const WEEK_MS: i64 = 7 * DAY_MS;
/// Average Gregorian year, used for age in whole years.
pub const AVERAGE_YEAR_MS: f64 = 365.25 * DAY_MS as f64;

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant. Used for previews of a chosen date and
/// for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// 1-based ordinal of `at` within its year (Jan 1 → 1).
pub fn day_of_year(at: NaiveDateTime) -> u32 {
    at.date().ordinal()
}

/// Whole days from `a` to `b`, rounded up. Negative when `b` precedes `a`.
pub fn day_span(a: NaiveDateTime, b: NaiveDateTime) -> i64 {
    let ms = (b - a).num_milliseconds();
    let days = ms.div_euclid(DAY_MS);
    if ms.rem_euclid(DAY_MS) == 0 {
        days
    } else {
        days + 1
    }
}

/// Completed weeks between `since` and `now`; a partial week does not count.
pub fn weeks_since(since: NaiveDateTime, now: NaiveDateTime) -> i64 {
    (now - since).num_milliseconds().div_euclid(WEEK_MS)
}

/// Age in whole average-length years.
pub fn age_years(birth: NaiveDateTime, now: NaiveDateTime) -> i64 {
    ((now - birth).num_milliseconds() as f64 / AVERAGE_YEAR_MS).floor() as i64
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Midnight on January 1 of the year containing `now`.
pub fn start_of_year(now: NaiveDateTime) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(now.year(), 1, 1)
        .map(midnight)
        .unwrap_or(now)
}

/// December 31 of the year containing `now`.
pub fn last_day_of_year(now: NaiveDateTime) -> NaiveDate {
    NaiveDate::from_ymd_opt(now.year(), 12, 31).unwrap_or(now.date())
}

/// Parse `YYYY-MM-DD` (midnight) or `YYYY-MM-DDTHH:MM[:SS]`.
pub fn parse_date(field: &'static str, value: &str) -> RenderResult<NaiveDateTime> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(midnight(date));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| RenderError::invalid_date(field, value))
}

/// How calendar dates are spelled in rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `March 1, 2025`
    #[default]
    LongEnUs,
    /// `2025-03-01`
    Iso,
}

pub fn format_date(date: NaiveDate, format: DateFormat) -> String {
    match format {
        DateFormat::LongEnUs => date.format("%B %-d, %Y").to_string(),
        DateFormat::Iso => date.format("%Y-%m-%d").to_string(),
    }
}
