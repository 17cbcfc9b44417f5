//! One refresh cycle, end to end.
//!
//! `Dashboard::refresh` takes a feed batch and a clock and produces a
//! [`DashboardSnapshot`]: classified outbreaks, totals, the prioritized
//! alert queue, and the recent-activity view. The dashboard keeps only the
//! active alert set between cycles.

mod refresh;
mod snapshot;

pub use refresh::RefreshLoop;
pub use snapshot::{AlertView, DashboardSnapshot, OutbreakView, PredictionView};

use tracing::{debug, debug_span};

use crate::alerts::{derive_outbreak_alerts, AlertSet};
use crate::batch::FeedBatch;
use crate::clock::Clock;
use crate::config::OutbreakmapConfig;
use crate::errors::Result;
use crate::filter::{by_disease, within_window, DiseaseSelection};
use crate::formatting::format_timestamp;
use crate::metrics::aggregate_with_thresholds;
use crate::priority::{prioritize, prioritize_predictions};
use crate::risk::classify_batch;

#[derive(Debug, Clone)]
pub struct Dashboard {
    config: OutbreakmapConfig,
    alerts: AlertSet,
    selection: DiseaseSelection,
    outbreak_alerts: bool,
}

impl Dashboard {
    pub fn new(config: OutbreakmapConfig) -> Self {
        Self {
            config,
            alerts: AlertSet::new(),
            selection: DiseaseSelection::All,
            outbreak_alerts: false,
        }
    }

    /// Narrow the outbreak list (not the totals) to one disease.
    pub fn with_selection(mut self, selection: DiseaseSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Raise an alert for every high or critical outbreak on each refresh.
    pub fn with_outbreak_alerts(mut self, enabled: bool) -> Self {
        self.outbreak_alerts = enabled;
        self
    }

    pub fn config(&self) -> &OutbreakmapConfig {
        &self.config
    }

    pub fn alerts(&self) -> &AlertSet {
        &self.alerts
    }

    pub fn dismiss_alert(&mut self, id: &str) -> bool {
        self.alerts.dismiss(id)
    }

    pub fn acknowledge_alert(&mut self, id: &str) -> bool {
        self.alerts.acknowledge(id)
    }

    /// Run one refresh cycle against `batch` at the clock's current instant.
    pub fn refresh<C: Clock + ?Sized>(
        &mut self,
        batch: &FeedBatch,
        clock: &C,
    ) -> Result<DashboardSnapshot> {
        let _span = debug_span!("refresh").entered();

        batch.validate()?;
        let window = self.config.window.lookback()?;
        let thresholds = &self.config.classification.thresholds;
        let now = clock.now();

        let classified = classify_batch(
            batch.outbreaks.clone(),
            thresholds,
            self.config.classification.policy(),
        );

        // The derived subset is rebuilt every cycle so cooled outbreaks drop out.
        let derived = if self.outbreak_alerts {
            derive_outbreak_alerts(&classified, thresholds)
        } else {
            Vec::new()
        };
        self.alerts.sync(batch.alerts.clone(), derived)?;

        let metrics = aggregate_with_thresholds(&classified, thresholds);

        let selected = prioritize(&by_disease(&classified, &self.selection));
        let recent = within_window(&selected, window, &now);

        let to_view = |record: crate::core::OutbreakRecord| {
            let tier = record.risk_tier_with(thresholds);
            OutbreakView::new(record, tier, now)
        };

        let snapshot = DashboardSnapshot {
            generated_at: now,
            last_updated: format_timestamp(now),
            lookback_hours: window.as_hours(),
            selection: self.selection.to_string(),
            metrics,
            outbreaks: selected.into_iter().map(to_view).collect(),
            recent_outbreaks: recent.into_iter().map(to_view).collect(),
            alerts: self
                .alerts
                .prioritized()
                .into_iter()
                .map(|alert| AlertView::new(alert, now))
                .collect(),
            new_alert_count: self.alerts.new_count(),
            predictions: prioritize_predictions(&batch.predictions)
                .into_iter()
                .map(PredictionView::new)
                .collect(),
        };

        debug!(
            outbreaks = snapshot.outbreaks.len(),
            recent = snapshot.recent_outbreaks.len(),
            alerts = snapshot.alerts.len(),
            "Snapshot built"
        );
        Ok(snapshot)
    }
}
