use anyhow::Result;
use clap::Parser;
use outbreakmap::cli::{Cli, Commands};
use outbreakmap::commands::{self, ClassifyConfig, WatchConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    match cli.command {
        Commands::Report(args) => commands::run_report(args),
        Commands::Watch {
            report,
            interval_secs,
            ticks,
        } => commands::run_watch(WatchConfig {
            report,
            interval_secs,
            ticks,
        }),
        Commands::Classify {
            cases,
            deaths,
            config,
        } => commands::run_classify(ClassifyConfig {
            cases,
            deaths,
            config,
        }),
        Commands::Init { force } => commands::init_config(force),
    }
}

// RUST_LOG wins over -v flags. Logs go to stderr so reports can be piped.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
