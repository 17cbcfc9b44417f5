use crate::io::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "outbreakmap")]
#[command(about = "Outbreak risk classification and alert prioritization", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a dashboard report from one feed batch
    Report(ReportArgs),

    /// Re-read a feed batch on an interval and re-render the dashboard
    Watch {
        #[command(flatten)]
        report: ReportArgs,

        /// Seconds between refreshes (defaults to the configured interval)
        #[arg(long = "interval-secs")]
        interval_secs: Option<u64>,

        /// Stop after this many refreshes
        #[arg(long)]
        ticks: Option<u64>,
    },

    /// Classify a single case/death count
    Classify {
        /// Reported cases (negative values count as zero)
        #[arg(long, allow_negative_numbers = true)]
        cases: i64,

        /// Reported deaths (negative values count as zero)
        #[arg(long, allow_negative_numbers = true)]
        deaths: i64,

        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Feed batch (JSON with outbreaks, alerts, predictions)
    pub batch: PathBuf,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (defaults to the nearest .outbreakmap.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Lookback window for recent activity, in hours
    #[arg(long = "lookback-hours")]
    pub lookback_hours: Option<f64>,

    /// Evaluate as of this instant (RFC 3339) instead of the wall clock
    #[arg(long)]
    pub now: Option<String>,

    /// Only list outbreaks of this disease ("all" for every disease)
    #[arg(long)]
    pub disease: Option<String>,

    /// Alert identifiers to dismiss before rendering
    #[arg(long, value_delimiter = ',')]
    pub dismiss: Vec<String>,

    /// Raise alerts for high and critical outbreaks
    #[arg(long = "outbreak-alerts")]
    pub outbreak_alerts: bool,

    /// Recompute tiers even when the feed supplied one
    #[arg(long)]
    pub reclassify: bool,

    /// Plain output (no colors, no emoji)
    #[arg(long)]
    pub plain: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_report_args() {
        let cli = Cli::try_parse_from([
            "outbreakmap",
            "report",
            "feed.json",
            "--format",
            "json",
            "--dismiss",
            "a1,a2",
            "--lookback-hours",
            "6",
        ])
        .unwrap();
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.batch, PathBuf::from("feed.json"));
                assert_eq!(args.format, Some(OutputFormat::Json));
                assert_eq!(args.dismiss, vec!["a1", "a2"]);
                assert_eq!(args.lookback_hours, Some(6.0));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_classify_accepts_negative_counts() {
        let cli =
            Cli::try_parse_from(["outbreakmap", "classify", "--cases", "-5", "--deaths", "3"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Classify {
                cases: -5,
                deaths: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_global_verbosity() {
        let cli = Cli::try_parse_from(["outbreakmap", "init", "-vv"]).unwrap();
        assert_eq!(cli.verbosity, 2);
    }
}
