use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::{AlertRecord, OutbreakRecord, PredictionRecord, RiskTier};
use crate::formatting::{compact, percent, recency_label};
use crate::metrics::DashboardMetrics;
use crate::priority::ProbabilityBand;

/// One refresh cycle's worth of display-ready output.
///
/// A new snapshot fully replaces the previous one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub last_updated: String,
    pub lookback_hours: f64,
    pub selection: String,
    pub metrics: DashboardMetrics,
    /// Selected outbreaks, most severe first
    pub outbreaks: Vec<OutbreakView>,
    /// Subset of `outbreaks` updated inside the lookback window
    pub recent_outbreaks: Vec<OutbreakView>,
    /// Active alerts, most severe first
    pub alerts: Vec<AlertView>,
    pub new_alert_count: usize,
    pub predictions: Vec<PredictionView>,
}

impl DashboardSnapshot {
    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutbreakView {
    #[serde(flatten)]
    pub record: OutbreakRecord,
    pub tier: RiskTier,
    pub mortality_rate: f64,
    pub cases_compact: String,
    pub age: String,
}

impl OutbreakView {
    /// `record` must already be classified.
    pub(crate) fn new(record: OutbreakRecord, tier: RiskTier, now: DateTime<Utc>) -> Self {
        Self {
            tier,
            mortality_rate: record.mortality_rate(),
            cases_compact: compact(record.cases),
            age: recency_label(&record.last_updated, now),
            record,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertView {
    #[serde(flatten)]
    pub record: AlertRecord,
    pub age: String,
}

impl AlertView {
    pub(crate) fn new(record: AlertRecord, now: DateTime<Utc>) -> Self {
        Self {
            age: recency_label(&record.timestamp, now),
            record,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionView {
    #[serde(flatten)]
    pub record: PredictionRecord,
    pub band: ProbabilityBand,
    pub probability_label: String,
    pub confidence_label: String,
}

impl PredictionView {
    pub(crate) fn new(record: PredictionRecord) -> Self {
        Self {
            band: ProbabilityBand::from_probability(record.probability),
            probability_label: percent(record.probability),
            confidence_label: percent(record.confidence),
            record,
        }
    }
}
