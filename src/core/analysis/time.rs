// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Plugin Timestamps
//!
//! Plugins report time in three shapes:
//!
//! - `MM-DD HH:MM:SS` with no year (LogBlock). The year is the most recent one
//!   that does not put the instant after *now + 1 week*; the week absorbs
//!   clock skew between client and server.
//! - `M/D/YY h:mm:ssam` (Prism locations).
//! - Relative: `N.NN/h ago` (CoreProtect), `1d2h3m ago` and `just now` (Prism).
//!
//! Relative times are approximate. They are deliberately truncated (to 1/100
//! hour or to the minute) so that the same edit parsed from two separate
//! queries lands on the same timestamp and collapses when merged.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::util::clock::{from_millis, to_millis};

pub const SECOND_MILLIS: i64 = 1_000;
pub const MINUTE_MILLIS: i64 = 60 * SECOND_MILLIS;
pub const HOUR_MILLIS: i64 = 60 * MINUTE_MILLIS;
pub const DAY_MILLIS: i64 = 24 * HOUR_MILLIS;
pub const WEEK_MILLIS: i64 = 7 * DAY_MILLIS;
/// Precision of `N.NN/h ago` results.
pub const HUNDREDTH_HOUR_MILLIS: i64 = HOUR_MILLIS / 100;

/// How many years back to look for a valid month/day (Feb 29 needs up to 8).
const YEAR_SEARCH_SPAN: i32 = 8;

static AGO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+)d)?(?:(\d+)h)?(?:(\d+)m)?(?:(\d+)s)? ago$").expect("static pattern compiles")
});

/// Round `millis` down to a multiple of `precision`.
#[inline]
pub fn truncate(millis: i64, precision: i64) -> i64 {
    millis - millis.rem_euclid(precision)
}

/// Resolve a year-less timestamp against `now`.
pub fn month_day_time(
    now: i64,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Option<i64> {
    let reference = from_millis(now.saturating_add(WEEK_MILLIS));
    let year = reference.year();
    for candidate in ((year - YEAR_SEARCH_SPAN)..=year).rev() {
        let Some(date) = NaiveDate::from_ymd_opt(candidate, month, day) else {
            continue;
        };
        let when = date.and_hms_opt(hour, minute, second)?;
        if when <= reference {
            return Some(to_millis(&when));
        }
    }
    None
}

/// A full date with a two-digit year and a 12-hour clock.
pub fn twelve_hour_time(
    month: u32,
    day: u32,
    short_year: i32,
    hour: u32,
    minute: u32,
    second: u32,
    pm: bool,
) -> Option<i64> {
    if hour == 0 || hour > 12 {
        return None;
    }
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    let date = NaiveDate::from_ymd_opt(2000 + short_year, month, day)?;
    date.and_hms_opt(hour, minute, second).map(|when| to_millis(&when))
}

/// `hours` before `now`, truncated to 1/100 hour.
pub fn hours_ago(now: i64, hours: f64) -> Option<i64> {
    if !hours.is_finite() || hours < 0.0 {
        return None;
    }
    let offset = (hours * HOUR_MILLIS as f64).round() as i64;
    Some(truncate(now - offset, HUNDREDTH_HOUR_MILLIS))
}

/// `1d2h3m ago`, `5m ago`, `just now`: resolved against `now`, truncated to
/// the minute.
pub fn parse_ago(now: i64, text: &str) -> Option<i64> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("just now") {
        return Some(truncate(now, MINUTE_MILLIS));
    }
    let captures = AGO.captures(text)?;
    let units = [DAY_MILLIS, HOUR_MILLIS, MINUTE_MILLIS, SECOND_MILLIS];
    let mut offset: i64 = 0;
    let mut any = false;
    for (index, unit) in units.iter().enumerate() {
        if let Some(m) = captures.get(index + 1) {
            let amount: i64 = m.as_str().parse().ok()?;
            offset = offset.checked_add(amount.checked_mul(*unit)?)?;
            any = true;
        }
    }
    if !any {
        return None;
    }
    Some(truncate(now.checked_sub(offset)?, MINUTE_MILLIS))
}
