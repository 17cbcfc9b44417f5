//! Dashboard totals derived from a full outbreak batch.

use crate::core::{OutbreakRecord, RiskTier};
use crate::risk::ClassificationThresholds;
use serde::{Deserialize, Serialize};

/// Headline numbers shown above the outbreak list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub active_outbreaks: usize,
    /// Saturates at `u64::MAX` rather than wrapping
    pub total_cases: u64,
    pub total_deaths: u64,
    /// Outbreaks in the high or critical tier
    pub high_risk_count: usize,
    pub distribution: TierDistribution,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierDistribution {
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
}

impl TierDistribution {
    fn record(&mut self, tier: RiskTier) {
        match tier {
            RiskTier::Critical => self.critical_count += 1,
            RiskTier::High => self.high_count += 1,
            RiskTier::Medium => self.medium_count += 1,
            RiskTier::Low => self.low_count += 1,
        }
    }

    pub fn count(&self, tier: RiskTier) -> usize {
        match tier {
            RiskTier::Critical => self.critical_count,
            RiskTier::High => self.high_count,
            RiskTier::Medium => self.medium_count,
            RiskTier::Low => self.low_count,
        }
    }

    pub fn total(&self) -> usize {
        self.critical_count + self.high_count + self.medium_count + self.low_count
    }
}

/// Aggregate with the default thresholds for any untagged record.
pub fn aggregate(records: &[OutbreakRecord]) -> DashboardMetrics {
    aggregate_with_thresholds(records, &ClassificationThresholds::default())
}

/// Aggregate a batch. Tagged records count under their tag; untagged ones
/// are classified with `thresholds` on the fly.
pub fn aggregate_with_thresholds(
    records: &[OutbreakRecord],
    thresholds: &ClassificationThresholds,
) -> DashboardMetrics {
    records
        .iter()
        .fold(DashboardMetrics::default(), |mut metrics, record| {
            let tier = record.risk_tier_with(thresholds);
            metrics.active_outbreaks += 1;
            metrics.total_cases = metrics.total_cases.saturating_add(record.cases);
            metrics.total_deaths = metrics.total_deaths.saturating_add(record.deaths);
            if tier.is_high_risk() {
                metrics.high_risk_count += 1;
            }
            metrics.distribution.record(tier);
            metrics
        })
}
