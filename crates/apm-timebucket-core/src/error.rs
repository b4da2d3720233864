//! Error types for duration parsing and bucket arithmetic.
//!
//! Context selectors are exposed crate-wide (via
//! `#[snafu(visibility(pub(crate)))]`) so the converter, the duration model
//! and the point walker attach context the same way.

use snafu::prelude::*;

use crate::step::Step;

/// A duration boundary did not match the layout mandated by its [`Step`], or
/// named a date/time that does not exist on the calendar.
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum FormatError {
    /// Input layout differs from the step's pattern (length, separators or
    /// non-digit characters).
    #[snafu(display("'{value}' does not match {step} pattern '{pattern}'"))]
    PatternMismatch {
        /// The rejected input.
        value: String,
        /// Step the input was parsed at.
        step: Step,
        /// Pattern expected for `step`.
        pattern: &'static str,
    },

    /// Input has the right layout but a field is outside its calendar range
    /// (for example month `13`, `02-30`, hour `24`).
    #[snafu(display("'{value}' is not a valid {step} time: {field} out of range"))]
    OutOfRange {
        /// The rejected input.
        value: String,
        /// Step the input was parsed at.
        step: Step,
        /// First field found out of range.
        field: &'static str,
    },
}

/// Errors from validating a whole [`Duration`](crate::duration::Duration).
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum DurationError {
    /// One of the boundaries failed to parse.
    #[snafu(display("Invalid duration boundary: {source}"))]
    Format {
        /// Underlying format error.
        source: FormatError,
    },

    /// The end boundary precedes the start boundary.
    #[snafu(display("Invalid duration: start bucket {start} is after end bucket {end}"))]
    InvertedRange {
        /// Start second bucket.
        start: i64,
        /// End second bucket.
        end: i64,
    },
}

/// Errors from enumerating the points of a bucket range.
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum PointsError {
    /// A bucket does not decode to a calendar time at the given step.
    #[snafu(display("{bucket} is not a valid {step} time bucket"))]
    InvalidBucket {
        /// The rejected bucket.
        bucket: i64,
        /// Step the bucket was decoded at.
        step: Step,
    },

    /// `start` is after `end`.
    #[snafu(display("Invalid point range: start={start}, end={end} (expect start <= end)"))]
    InvertedPoints {
        /// Start step bucket.
        start: i64,
        /// End step bucket.
        end: i64,
    },

    /// The range holds more units than a single listing may return.
    #[snafu(display(
        "Point range covers {count} units, more than the limit of {limit}; use a coarser step"
    ))]
    TooManyPoints {
        /// Units in the requested range.
        count: u64,
        /// Largest number of points returned at once.
        limit: u64,
    },
}
