//! Calendar date utilities
//!
//! The backend filters reviews by Unix epoch seconds while the UI works with
//! `YYYY-MM-DD` calendar days interpreted in the viewer's local time zone.

use chrono::{Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone};

/// Parse a strict `YYYY-MM-DD` calendar date
///
/// Returns `None` for anything else, including impossible dates such as
/// `2024-02-30`. Surrounding whitespace is ignored.
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Epoch second of local midnight at the start of `date`
pub fn day_start_epoch<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<i64> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    resolve_local(tz, naive, true)
}

/// Epoch second of local 23:59:59.999 on `date`
///
/// Sub-second precision is floored, so this is always `23:59:59`.
pub fn day_end_epoch<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<i64> {
    let naive = date.and_hms_milli_opt(23, 59, 59, 999)?;
    resolve_local(tz, naive, false)
}

/// Parse `input` and convert it to the start-of-day epoch second
pub fn date_input_start_epoch<Tz: TimeZone>(input: &str, tz: &Tz) -> Option<i64> {
    parse_calendar_date(input).and_then(|date| day_start_epoch(date, tz))
}

/// Parse `input` and convert it to the end-of-day epoch second
pub fn date_input_end_epoch<Tz: TimeZone>(input: &str, tz: &Tz) -> Option<i64> {
    parse_calendar_date(input).and_then(|date| day_end_epoch(date, tz))
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime, earliest: bool) -> Option<i64> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.timestamp()),
        LocalResult::Ambiguous(first, second) => {
            Some(if earliest { first.timestamp() } else { second.timestamp() })
        }
        // Wall-clock time skipped by a DST jump: move past the gap
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.timestamp()),
    }
}
