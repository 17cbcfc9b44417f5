use super::report::ReportSession;
use crate::batch::FeedBatch;
use crate::cli::ReportArgs;
use crate::dashboard::RefreshLoop;
use crate::io;
use anyhow::Result;
use std::ops::ControlFlow;
use std::time::Duration;
use tracing::{info, warn};

pub struct WatchConfig {
    pub report: ReportArgs,
    pub interval_secs: Option<u64>,
    pub ticks: Option<u64>,
}

/// Re-read the feed batch on every tick and re-render the dashboard.
///
/// A batch that fails to load or validate is skipped and the previous
/// alert state is kept. Stops on Ctrl-C, after `ticks` refreshes, or on
/// the first output error.
pub fn run_watch(config: WatchConfig) -> Result<()> {
    let WatchConfig {
        report,
        interval_secs,
        ticks,
    } = config;

    let mut session = ReportSession::from_args(&report)?;
    let interval_secs = interval_secs
        .unwrap_or(session.dashboard.config().refresh.interval_secs)
        .max(1);

    let mut refresh = RefreshLoop::new(Duration::from_secs(interval_secs));
    if let Some(ticks) = ticks {
        refresh = refresh.with_max_ticks(ticks);
    }
    info!(interval_secs, "Watching {}", report.batch.display());

    let mut failure: Option<anyhow::Error> = None;
    let mut pending_dismissals = report.dismiss.clone();

    let ticks_run = refresh.run_blocking(ctrl_c(), |tick| {
        match render_once(&mut session, &report, &pending_dismissals) {
            Ok(()) => {
                pending_dismissals.clear();
                ControlFlow::Continue(())
            }
            Err(TickError::Feed(e)) => {
                warn!(tick, "Skipping refresh: {:#}", e);
                ControlFlow::Continue(())
            }
            Err(TickError::Output(e)) => {
                failure = Some(e);
                ControlFlow::Break(())
            }
        }
    })?;

    info!(ticks = ticks_run, "Watch finished");
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

enum TickError {
    Feed(anyhow::Error),
    Output(anyhow::Error),
}

fn render_once(
    session: &mut ReportSession,
    report: &ReportArgs,
    dismiss: &[String],
) -> std::result::Result<(), TickError> {
    let batch = FeedBatch::load(&report.batch).map_err(|e| TickError::Feed(e.into()))?;
    let snapshot = session
        .refresh(&batch, dismiss)
        .map_err(TickError::Feed)?;

    let destination =
        io::open_destination(report.output.as_deref()).map_err(TickError::Output)?;
    let mut writer = io::create_writer(session.format, session.formatting, destination);
    writer.write_snapshot(&snapshot).map_err(TickError::Output)
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Ctrl-C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}
