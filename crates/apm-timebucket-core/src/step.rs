//! Query granularity and the textual layout expected for each granularity.
//!
//! Every supported layout starts with `yyyy-MM` and then carries zero or more
//! two-digit groups (`dd`, `HH`, `mm`, `ss`). A [`Step`] therefore fully
//! determines:
//!
//! - the exact pattern a duration boundary must match, and
//! - how many two-digit groups are missing below the step and must be padded
//!   to reach the 14-digit second-level bucket layout.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

/// Number of two-digit groups after the year in a full `yyyyMMddHHmmss` bucket.
pub(crate) const FULL_GROUPS: usize = 5;

/// Precision at which a user-entered duration is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    /// `yyyy-MM`
    Month,
    /// `yyyy-MM-dd`
    Day,
    /// `yyyy-MM-dd HH`
    Hour,
    /// `yyyy-MM-dd HHmm`
    Minute,
    /// `yyyy-MM-dd HHmmss`
    Second,
}

/// Layout entry for a single [`Step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepFormat {
    /// Step this entry describes.
    pub step: Step,
    /// Textual pattern; `y`, `M`, `d`, `H`, `m`, `s` mark digit positions and
    /// every other byte must match literally.
    pub pattern: &'static str,
    /// Two-digit groups present after the year (month is always present).
    pub groups: usize,
}

/// Which end of an inclusive range a padded bucket stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// Lower bound: omitted groups become `00`.
    Start,
    /// Upper bound: omitted groups become `99`.
    End,
}

impl Padding {
    /// `Start` when `is_start`, `End` otherwise.
    pub const fn from_is_start(is_start: bool) -> Self {
        if is_start { Padding::Start } else { Padding::End }
    }

    const fn filler(self) -> i64 {
        match self {
            Padding::Start => 0,
            Padding::End => 99,
        }
    }
}

impl StepFormat {
    /// Two-digit groups below this step that are padded in a second bucket.
    pub const fn padding_groups(&self) -> usize {
        FULL_GROUPS - self.groups
    }

    /// Extend a bucket holding this step's digits to the full
    /// `yyyyMMddHHmmss` layout.
    ///
    /// Every omitted group is appended as a whole `00` or `99` pair, so a
    /// `DAY` bucket `20170101` becomes `20170101000000` or `20170101999999`.
    pub fn pad(&self, step_bucket: i64, padding: Padding) -> i64 {
        (0..self.padding_groups()).fold(step_bucket, |acc, _| acc * 100 + padding.filler())
    }
}

/// Indexed by `Step as usize`.
static FORMATS: [StepFormat; 5] = [
    StepFormat {
        step: Step::Month,
        pattern: "yyyy-MM",
        groups: 1,
    },
    StepFormat {
        step: Step::Day,
        pattern: "yyyy-MM-dd",
        groups: 2,
    },
    StepFormat {
        step: Step::Hour,
        pattern: "yyyy-MM-dd HH",
        groups: 3,
    },
    StepFormat {
        step: Step::Minute,
        pattern: "yyyy-MM-dd HHmm",
        groups: 4,
    },
    StepFormat {
        step: Step::Second,
        pattern: "yyyy-MM-dd HHmmss",
        groups: 5,
    },
];

impl Step {
    /// All steps, coarsest first.
    pub const ALL: [Step; 5] = [
        Step::Month,
        Step::Day,
        Step::Hour,
        Step::Minute,
        Step::Second,
    ];

    /// Layout table entry for this step.
    pub fn format(self) -> &'static StepFormat {
        &FORMATS[self as usize]
    }

    /// Pattern a duration boundary must match at this step.
    pub fn pattern(self) -> &'static str {
        self.format().pattern
    }

    /// Upper-case name as used on the wire (`MONTH`, `DAY`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            Step::Month => "MONTH",
            Step::Day => "DAY",
            Step::Hour => "HOUR",
            Step::Minute => "MINUTE",
            Step::Second => "SECOND",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced when parsing a step name.
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum ParseStepError {
    /// The input was empty or only whitespace.
    #[snafu(display("step is empty (expected month|day|hour|minute|second)"))]
    EmptyStep,

    /// The input did not name a known step.
    #[snafu(display("unknown step '{input}' (expected month|day|hour|minute|second)"))]
    UnknownStep {
        /// The unrecognized input.
        input: String,
    },
}

impl FromStr for Step {
    type Err = ParseStepError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let name = input.trim();
        ensure!(!name.is_empty(), EmptyStepSnafu);

        match name.to_ascii_lowercase().as_str() {
            "month" => Ok(Step::Month),
            "day" => Ok(Step::Day),
            "hour" => Ok(Step::Hour),
            "minute" => Ok(Step::Minute),
            "second" => Ok(Step::Second),
            _ => UnknownStepSnafu { input: name }.fail(),
        }
    }
}
