//! Command-line arguments

#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::app::config::CwlrConfig;
use crate::app::time_input::parse_instant;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "cwlr")]
#[command(about = "CLI tool for interacting with AWS CloudWatch Logs")]
#[command(version, long_version = LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// AWS profile to use (from ~/.aws/credentials)
    #[arg(long, global = true, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// AWS region
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Pick a service first, then a log group within it
    #[arg(short, long, global = true)]
    pub group: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Show timestamps in UTC instead of local time
    #[arg(long, global = true)]
    pub utc: bool,

    /// More detail in the log file (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Retrieve and display the content in the Log Stream
    Read(ReadArgs),

    /// Search and display logs that match the filter pattern or string
    #[command(after_help = "Examples:
  cwlr search
  cwlr search -l /aws/lambda/orders -p ERROR --start 2024-01-01 --end \"2024-01-02 12:00:00\"
  cwlr search -l /ecs/web -p '{ $.status = 500 }' --json")]
    Search(SearchArgs),

    /// List log groups grouped by service
    Groups {
        /// Print the grouping as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ReadArgs {
    /// Log group to read (prompted when omitted)
    #[arg(short = 'l', long)]
    pub log_group: Option<String>,

    /// Log stream to read (prompted when omitted)
    #[arg(short, long)]
    pub stream: Option<String>,

    /// One JSON object per event
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Log group to search (prompted when omitted)
    #[arg(short = 'l', long)]
    pub log_group: Option<String>,

    /// Filter pattern; when omitted the pattern and time range are prompted
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Start time, UTC (YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS")
    #[arg(long, value_parser = parse_instant_arg)]
    pub start: Option<i64>,

    /// End time, UTC (YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS")
    #[arg(long, value_parser = parse_instant_arg)]
    pub end: Option<i64>,

    /// One JSON object per event
    #[arg(long)]
    pub json: bool,
}

fn parse_instant_arg(input: &str) -> Result<i64, String> {
    parse_instant(input).map_err(|e| e.to_string())
}

impl Cli {
    /// Command-line flags take precedence over the config file
    pub fn apply_to(&self, config: &mut CwlrConfig) {
        if let Some(profile) = &self.profile {
            config.aws.profile = Some(profile.clone());
        }
        if let Some(region) = &self.region {
            config.aws.region = Some(region.clone());
        }
        if self.group {
            config.display.group_by_service = true;
        }
        if self.no_color {
            config.display.color = false;
        }
    }
}
