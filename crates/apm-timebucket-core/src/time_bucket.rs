//! Helpers for mapping duration boundaries into numeric time buckets.
//!
//! A boundary is a human-entered string such as `2017-01-01 01` whose layout
//! is fixed by its [`Step`]. These helpers define a stable digit encoding
//! that downstream storage keys must match exactly:
//!
//! - Second buckets are 14-digit `yyyyMMddHHmmss` integers. Two-digit groups
//!   finer than the step are padded with `00` for a range start and `99` for
//!   a range end, so `[start, end]` is an inclusive interval covering every
//!   unit the user named.
//! - Month buckets are 6-digit `yyyyMM` integers taken from the `yyyy-MM`
//!   prefix every layout starts with.
//! - Step buckets carry only the digits present at the step's precision
//!   (`yyyyMMddHH` for `HOUR`, ...).
//!
//! Everything here is pure: no I/O, no logging, no shared state. Errors are
//! returned to the caller unchanged.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use snafu::prelude::*;

use crate::{
    duration::{Duration, DurationBuckets},
    error::{FormatError, OutOfRangeSnafu, PatternMismatchSnafu},
    step::{FULL_GROUPS, Padding, Step},
};

/// Smallest year that still encodes to a 14-digit second bucket.
const MIN_YEAR: i32 = 1000;

/// A boundary string that matched its step's layout and names a real
/// calendar time. Fields finer than `step` are at their minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Boundary {
    pub(crate) step: Step,
    pub(crate) datetime: NaiveDateTime,
}

impl Boundary {
    /// Parse `value` against the layout of `step`.
    pub(crate) fn parse(value: &str, step: Step) -> Result<Self, FormatError> {
        let pattern = step.pattern();
        ensure!(
            matches_pattern(value.as_bytes(), pattern.as_bytes()),
            PatternMismatchSnafu {
                value,
                step,
                pattern,
            }
        );

        let digits: Vec<u32> = value
            .bytes()
            .filter(u8::is_ascii_digit)
            .map(|b| u32::from(b - b'0'))
            .collect();

        let year = digits[..4].iter().fold(0i32, |acc, d| acc * 10 + *d as i32);

        // month, day, hour, minute, second; absent groups keep their minimum.
        let mut groups: [u32; FULL_GROUPS] = [1, 1, 0, 0, 0];
        for (i, pair) in digits[4..].chunks_exact(2).enumerate() {
            groups[i] = pair[0] * 10 + pair[1];
        }
        let [month, day, hour, minute, second] = groups;

        ensure!(
            year >= MIN_YEAR,
            OutOfRangeSnafu {
                value,
                step,
                field: "year",
            }
        );
        ensure!(
            (1..=12).contains(&month),
            OutOfRangeSnafu {
                value,
                step,
                field: "month",
            }
        );
        let date = NaiveDate::from_ymd_opt(year, month, day).context(OutOfRangeSnafu {
            value,
            step,
            field: "day",
        })?;
        ensure!(
            hour < 24,
            OutOfRangeSnafu {
                value,
                step,
                field: "hour",
            }
        );
        ensure!(
            minute < 60,
            OutOfRangeSnafu {
                value,
                step,
                field: "minute",
            }
        );
        let time = NaiveTime::from_hms_opt(hour, minute, second).context(OutOfRangeSnafu {
            value,
            step,
            field: "second",
        })?;

        Ok(Boundary {
            step,
            datetime: date.and_time(time),
        })
    }

    /// Digits present at this boundary's precision, without padding.
    pub(crate) fn step_bucket(&self) -> i64 {
        encode_step_bucket(&self.datetime, self.step)
    }

    /// Full 14-digit bucket with the omitted groups padded.
    pub(crate) fn second_bucket(&self, padding: Padding) -> i64 {
        self.step.format().pad(self.step_bucket(), padding)
    }

    pub(crate) fn month_bucket(&self) -> i64 {
        i64::from(self.datetime.year()) * 100 + i64::from(self.datetime.month())
    }
}

/// Pattern letters that stand for a single ASCII digit.
fn is_digit_slot(p: u8) -> bool {
    matches!(p, b'y' | b'M' | b'd' | b'H' | b'm' | b's')
}

fn matches_pattern(value: &[u8], pattern: &[u8]) -> bool {
    value.len() == pattern.len()
        && value.iter().zip(pattern).all(|(v, p)| {
            if is_digit_slot(*p) {
                v.is_ascii_digit()
            } else {
                v == p
            }
        })
}

/// Encode `datetime` with the digit groups `step` carries.
pub(crate) fn encode_step_bucket(datetime: &NaiveDateTime, step: Step) -> i64 {
    let groups = [
        datetime.month(),
        datetime.day(),
        datetime.hour(),
        datetime.minute(),
        datetime.second(),
    ];
    groups[..step.format().groups]
        .iter()
        .fold(i64::from(datetime.year()), |acc, g| acc * 100 + i64::from(*g))
}

/// Start of the unit following the one that begins at `datetime`.
///
/// Returns `None` only when the result leaves chrono's representable range.
pub(crate) fn next_unit(datetime: &NaiveDateTime, step: Step) -> Option<NaiveDateTime> {
    match step {
        Step::Month => datetime.checked_add_months(Months::new(1)),
        Step::Day => datetime.checked_add_signed(TimeDelta::days(1)),
        Step::Hour => datetime.checked_add_signed(TimeDelta::hours(1)),
        Step::Minute => datetime.checked_add_signed(TimeDelta::minutes(1)),
        Step::Second => datetime.checked_add_signed(TimeDelta::seconds(1)),
    }
}

/// Convert a boundary into a 14-digit `yyyyMMddHHmmss` second bucket.
///
/// Groups finer than `step` are filled with `00` when `is_start` is true and
/// with `99` otherwise:
///
/// - `("2017-01", MONTH, true)` -> `20170100000000`
/// - `("2017-01", MONTH, false)` -> `20170199999999`
/// - `("2017-01-01 01", HOUR, false)` -> `20170101019999`
/// - `("2017-01-01 010101", SECOND, _)` -> `20170101010101`
///
/// # Errors
/// Returns [`FormatError`] if `value` does not match the pattern of `step`
/// or names a date/time that does not exist.
pub fn to_second_time_bucket(value: &str, step: Step, is_start: bool) -> Result<i64, FormatError> {
    let boundary = Boundary::parse(value, step)?;
    Ok(boundary.second_bucket(Padding::from_is_start(is_start)))
}

/// Convert a boundary into a 6-digit `yyyyMM` month bucket.
///
/// The whole value must match the layout of `step`; only its `yyyy-MM`
/// prefix contributes to the result, so well-formed values give the same
/// bucket at every step.
///
/// # Errors
/// Returns [`FormatError`] if `value` does not match the pattern of `step`
/// or names a date/time that does not exist.
pub fn to_month_time_bucket(value: &str, step: Step) -> Result<i64, FormatError> {
    Ok(Boundary::parse(value, step)?.month_bucket())
}

/// Convert a boundary into a bucket holding only the digits its step carries
/// (`"2017-01-01 01"` at `HOUR` -> `2017010101`).
///
/// # Errors
/// Returns [`FormatError`] on malformed or out-of-range input.
pub fn to_step_time_bucket(value: &str, step: Step) -> Result<i64, FormatError> {
    Ok(Boundary::parse(value, step)?.step_bucket())
}

/// Milliseconds since the Unix epoch (UTC) at which the unit named by
/// `value` begins.
///
/// # Errors
/// Returns [`FormatError`] on malformed or out-of-range input.
pub fn start_time_to_timestamp(value: &str, step: Step) -> Result<i64, FormatError> {
    let boundary = Boundary::parse(value, step)?;
    Ok(boundary.datetime.and_utc().timestamp_millis())
}

/// Milliseconds since the Unix epoch (UTC) at which the unit named by
/// `value` ends, exclusive: `"2017-01"` at `MONTH` yields the first
/// millisecond of February.
///
/// # Errors
/// Returns [`FormatError`] on malformed or out-of-range input.
pub fn end_time_to_timestamp(value: &str, step: Step) -> Result<i64, FormatError> {
    let boundary = Boundary::parse(value, step)?;
    let end = next_unit(&boundary.datetime, step).context(OutOfRangeSnafu {
        value,
        step,
        field: "year",
    })?;
    Ok(end.and_utc().timestamp_millis())
}

/// Convert a whole duration into the month and second bucket pairs used by
/// range queries.
///
/// The start boundary is zero-padded and the end boundary nine-padded, so
/// `start == end` at any step coarser than `SECOND` still spans the whole
/// unit. Ordering of `start` and `end` is not checked here; see
/// [`Duration::validate`].
///
/// # Errors
/// Returns the first [`FormatError`] raised by either boundary.
pub fn exchange_to_time_bucket(duration: &Duration) -> Result<DurationBuckets, FormatError> {
    let step = duration.step();
    let start = Boundary::parse(duration.start(), step)?;
    let end = Boundary::parse(duration.end(), step)?;

    Ok(DurationBuckets {
        start_month_bucket: start.month_bucket(),
        end_month_bucket: end.month_bucket(),
        start_second_bucket: start.second_bucket(Padding::Start),
        end_second_bucket: end.second_bucket(Padding::End),
    })
}
