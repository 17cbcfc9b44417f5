//! Periodic re-evaluation.
//!
//! A single cooperative tick on one thread: the tick callback runs to
//! completion before the next tick is awaited, so at most one refresh is in
//! flight. Ticks that fall behind are skipped, not queued. Shutdown simply
//! stops scheduling.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct RefreshLoop {
    interval: Duration,
    max_ticks: Option<u64>,
}

impl RefreshLoop {
    /// Zero intervals are bumped to one millisecond.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            max_ticks: None,
        }
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Tick until `shutdown` resolves, the tick limit is hit, or the
    /// callback breaks. The first tick fires immediately. Returns the
    /// number of ticks run.
    pub async fn run<S, F>(&self, shutdown: S, mut on_tick: F) -> u64
    where
        S: Future<Output = ()>,
        F: FnMut(u64) -> ControlFlow<()>,
    {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut ticks = 0u64;
        loop {
            if self.max_ticks.is_some_and(|max| ticks >= max) {
                debug!(ticks, "Tick limit reached");
                break;
            }
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!(ticks, "Refresh loop shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    ticks += 1;
                    if on_tick(ticks).is_break() {
                        debug!(ticks, "Refresh callback requested stop");
                        break;
                    }
                }
            }
        }
        ticks
    }

    /// Drive [`RefreshLoop::run`] on a fresh single-threaded runtime.
    pub fn run_blocking<S, F>(&self, shutdown: S, on_tick: F) -> std::io::Result<u64>
    where
        S: Future<Output = ()>,
        F: FnMut(u64) -> ControlFlow<()>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(self.run(shutdown, on_tick)))
    }
}
