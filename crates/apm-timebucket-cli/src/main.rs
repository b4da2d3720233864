//! CLI tool for converting query durations into time buckets.

mod error;
mod output;

use std::path::{Path, PathBuf};

use apm_timebucket_core::{Duration, Step, duration_points, to_step_time_bucket};
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use snafu::{OptionExt, ResultExt};

use crate::{
    error::{
        BoundarySnafu, CliResult, InvalidDurationSnafu, MissingBoundariesSnafu, MissingStepSnafu,
        ParseDurationSnafu, PointsSnafu, ReadDurationSnafu,
    },
    output::{ConvertReport, OutputFormat, PointsReport, render_convert, render_points},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    Text,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(v: OutputFormatArg) -> Self {
        match v {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StepArg {
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl From<StepArg> for Step {
    fn from(v: StepArg) -> Self {
        match v {
            StepArg::Month => Step::Month,
            StepArg::Day => Step::Day,
            StepArg::Hour => Step::Hour,
            StepArg::Minute => Step::Minute,
            StepArg::Second => Step::Second,
        }
    }
}

/// Where a duration comes from: inline flags or a JSON file.
#[derive(Debug, clap::Args)]
struct DurationArgs {
    /// Range start, written at --step (e.g. 2017-01, 2017-01-01 01)
    #[arg(long, requires = "end")]
    start: Option<String>,

    /// Range end, written at --step
    #[arg(long, requires = "start")]
    end: Option<String>,

    /// Granularity of --start/--end
    #[arg(long, value_enum, ignore_case = true, env = "APMTB_STEP")]
    step: Option<StepArg>,

    /// JSON file holding {"start", "end", "step"}; replaces the flags above
    #[arg(long, conflicts_with_all = ["start", "end"])]
    duration: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print month and second buckets plus epoch-ms bounds for a duration
    Convert {
        #[command(flatten)]
        duration: DurationArgs,

        /// Output format (text or json)
        #[arg(long, value_enum, default_value_t = OutputFormatArg::Text)]
        format: OutputFormatArg,
    },

    /// List every step-sized unit in a duration with its length
    Points {
        #[command(flatten)]
        duration: DurationArgs,

        /// Output format (text or json)
        #[arg(long, value_enum, default_value_t = OutputFormatArg::Text)]
        format: OutputFormatArg,
    },
}

#[derive(Debug, Parser)]
#[command(name = "apmtb", version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

fn read_duration_file(path: &Path) -> CliResult<Duration> {
    let contents = std::fs::read_to_string(path).context(ReadDurationSnafu { path })?;
    serde_json::from_str(&contents).context(ParseDurationSnafu { path })
}

fn resolve_duration(args: DurationArgs) -> CliResult<Duration> {
    if let Some(path) = args.duration {
        debug!("reading duration from {}", path.display());
        return read_duration_file(&path);
    }

    let (Some(start), Some(end)) = (args.start, args.end) else {
        return MissingBoundariesSnafu.fail();
    };
    let step = args.step.context(MissingStepSnafu)?;
    Ok(Duration::new(start, end, step.into()))
}

fn cmd_convert(duration: Duration, format: OutputFormat) -> CliResult<()> {
    debug!("converting {duration:?}");
    let buckets = duration.validate().context(InvalidDurationSnafu)?;
    let (start_timestamp_ms, end_timestamp_ms) =
        duration.to_timestamps().context(BoundarySnafu)?;

    let report = ConvertReport {
        duration,
        buckets,
        start_timestamp_ms,
        end_timestamp_ms,
    };
    println!("{}", render_convert(&report, format)?);
    Ok(())
}

fn cmd_points(duration: Duration, format: OutputFormat) -> CliResult<()> {
    let step = duration.step();
    let start = to_step_time_bucket(duration.start(), step).context(BoundarySnafu)?;
    let end = to_step_time_bucket(duration.end(), step).context(BoundarySnafu)?;
    debug!("listing {step} points from {start} to {end}");

    let points = duration_points(step, start, end).context(PointsSnafu)?;
    let report = PointsReport { duration, points };
    println!("{}", render_points(&report, format)?);
    Ok(())
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Convert { duration, format } => {
            cmd_convert(resolve_duration(duration)?, format.into())
        }
        Command::Points { duration, format } => {
            cmd_points(resolve_duration(duration)?, format.into())
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
