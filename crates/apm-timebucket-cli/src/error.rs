use std::path::PathBuf;

use apm_timebucket_core::{DurationError, FormatError, PointsError};
use snafu::Snafu;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CliError {
    #[snafu(display("No step given. Pass --step or set APMTB_STEP."))]
    MissingStep,

    #[snafu(display("Pass either --duration <file> or both --start and --end."))]
    MissingBoundaries,

    #[snafu(display("Duration file not found or not readable: {}", path.display()))]
    ReadDuration {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display(
        "Duration file {} is not a valid duration. \
         Expected {{\"start\": ..., \"end\": ..., \"step\": \"MONTH|DAY|HOUR|MINUTE|SECOND\"}}: {source}",
        path.display()
    ))]
    ParseDuration {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("{source}"))]
    InvalidDuration { source: DurationError },

    #[snafu(display("Invalid boundary: {source}"))]
    Boundary { source: FormatError },

    #[snafu(display("Cannot list points: {source}"))]
    Points { source: PointsError },

    #[snafu(display("Failed to render JSON output: {source}"))]
    RenderJson { source: serde_json::Error },
}
