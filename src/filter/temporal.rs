use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::clock::Clock;
use crate::core::HasRecency;
use crate::errors::{Error, Result};

/// A positive lookback duration measured back from "now".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookbackWindow {
    hours: f64,
}

impl LookbackWindow {
    /// Fractional hours are allowed; zero, negative and non-finite are not.
    pub fn hours(hours: f64) -> Result<Self> {
        if hours.is_finite() && hours > 0.0 {
            Ok(Self { hours })
        } else {
            Err(Error::InvalidWindow(hours))
        }
    }

    pub fn as_hours(&self) -> f64 {
        self.hours
    }

    /// Earliest instant still inside the window. Windows reaching past the
    /// representable range start at the minimum instant.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let millis = (self.hours * 3_600_000.0).round();
        Duration::try_milliseconds(millis as i64)
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Records whose recency is at or after `now - window`.
///
/// Records without an absolute timestamp are treated as stale and dropped.
/// Output keeps input order.
pub fn within_window<R, C>(records: &[R], window: LookbackWindow, clock: &C) -> Vec<R>
where
    R: HasRecency + Clone,
    C: Clock + ?Sized,
{
    let cutoff = window.cutoff(clock.now());
    let mut stale = 0usize;

    let recent: Vec<R> = records
        .iter()
        .filter(|record| match record.recency().timestamp() {
            Some(ts) => ts >= cutoff,
            None => {
                stale += 1;
                false
            }
        })
        .cloned()
        .collect();

    if stale > 0 {
        debug!(
            stale,
            "Records without an absolute timestamp excluded from window"
        );
    }
    recent
}
