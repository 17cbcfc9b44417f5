//! The active alert set.
//!
//! This is the only state the engine keeps between refresh cycles. Feed
//! alerts enter through [`AlertSet::ingest`] or [`AlertSet::sync`] and
//! leave only through [`AlertSet::dismiss`]. Alerts derived from outbreak
//! tiers are rebuilt by every [`AlertSet::sync`] and retired once their
//! outbreak cools.
//!
//! A dismissed identifier is remembered for the life of the set so a later
//! batch carrying the same alert does not bring it back. Tombstones are
//! never pruned; their number is bounded by operator dismissals.

use std::collections::HashSet;

use crate::core::{AlertRecord, AlertSeverity, OutbreakRecord, RiskTier};
use crate::errors::{Error, RecordKind, Result};
use crate::formatting::group_thousands;
use crate::priority;
use crate::risk::ClassificationThresholds;
use serde::Serialize;
use tracing::{debug, info};

/// What one ingest call did to the set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub added: usize,
    pub updated: usize,
    /// Previously dismissed alerts that were skipped
    pub suppressed: usize,
    /// Derived alerts dropped because their outbreak is no longer high risk
    pub retired: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AlertSet {
    active: Vec<AlertRecord>,
    /// Ids of active alerts raised by [`derive_outbreak_alerts`]
    derived: HashSet<String>,
    dismissed: HashSet<String>,
}

impl AlertSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a single feed batch.
    pub fn from_batch(batch: Vec<AlertRecord>) -> Result<Self> {
        let mut set = Self::new();
        set.ingest(batch)?;
        Ok(set)
    }

    /// Merge a feed batch into the active set, leaving derived alerts alone.
    ///
    /// A batch with two alerts sharing an identifier, or reusing the id of
    /// an active derived alert, is rejected as a whole and the set is left
    /// untouched. Alerts already active are refreshed in place and keep
    /// their acknowledgement; dismissed identifiers are skipped.
    pub fn ingest(&mut self, batch: Vec<AlertRecord>) -> Result<IngestSummary> {
        ensure_unique(batch.iter())?;
        if let Some(clash) = batch.iter().find(|a| self.derived.contains(&a.id)) {
            return Err(Error::duplicate(RecordKind::Alert, clash.id.clone()));
        }

        let mut summary = IngestSummary::default();
        self.merge(batch, false, &mut summary);
        log_summary(&summary);
        Ok(summary)
    }

    /// Merge a feed batch and replace the derived subset in one step.
    ///
    /// Derived alerts missing from `derived` are retired. Feed and derived
    /// ids must be unique together, and a derived id may not take over an
    /// active feed alert. Any collision rejects the whole call without
    /// touching the set.
    pub fn sync(
        &mut self,
        feed: Vec<AlertRecord>,
        derived: Vec<AlertRecord>,
    ) -> Result<IngestSummary> {
        ensure_unique(feed.iter().chain(derived.iter()))?;
        if let Some(clash) = derived
            .iter()
            .find(|a| self.contains(&a.id) && !self.derived.contains(&a.id))
        {
            return Err(Error::duplicate(RecordKind::Alert, clash.id.clone()));
        }

        let mut summary = IngestSummary::default();
        let fresh: HashSet<&str> = derived.iter().map(|a| a.id.as_str()).collect();
        let stale: HashSet<String> = self
            .derived
            .iter()
            .filter(|id| !fresh.contains(id.as_str()))
            .cloned()
            .collect();
        if !stale.is_empty() {
            let before = self.active.len();
            self.active.retain(|alert| !stale.contains(&alert.id));
            summary.retired = before - self.active.len();
            self.derived.retain(|id| !stale.contains(id));
        }

        self.merge(feed, false, &mut summary);
        self.merge(derived, true, &mut summary);
        log_summary(&summary);
        Ok(summary)
    }

    fn merge(&mut self, batch: Vec<AlertRecord>, derived: bool, summary: &mut IngestSummary) {
        for incoming in batch {
            if self.dismissed.contains(&incoming.id) {
                summary.suppressed += 1;
                continue;
            }
            if derived {
                self.derived.insert(incoming.id.clone());
            }
            match self.active.iter_mut().find(|a| a.id == incoming.id) {
                Some(existing) => {
                    let acknowledged = !existing.is_new;
                    *existing = incoming;
                    if acknowledged {
                        existing.is_new = false;
                    }
                    summary.updated += 1;
                }
                None => {
                    self.active.push(incoming);
                    summary.added += 1;
                }
            }
        }
    }

    /// Remove an alert for good. Unknown identifiers are a no-op.
    ///
    /// Returns whether an active alert was removed.
    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.active.len();
        self.active.retain(|alert| alert.id != id);
        let removed = self.active.len() != before;
        if removed {
            self.derived.remove(id);
            self.dismissed.insert(id.to_string());
            info!(id, "Alert dismissed");
        }
        removed
    }

    /// Clear the "new" marker on an alert without removing it.
    pub fn acknowledge(&mut self, id: &str) -> bool {
        match self.active.iter_mut().find(|alert| alert.id == id) {
            Some(alert) => {
                alert.is_new = false;
                true
            }
            None => false,
        }
    }

    pub fn acknowledge_all(&mut self) {
        for alert in &mut self.active {
            alert.is_new = false;
        }
    }

    pub fn get(&self, id: &str) -> Option<&AlertRecord> {
        self.active.iter().find(|alert| alert.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn is_dismissed(&self, id: &str) -> bool {
        self.dismissed.contains(id)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Alerts not yet acknowledged.
    pub fn new_count(&self) -> usize {
        self.active.iter().filter(|alert| alert.is_new).count()
    }

    /// Active alerts in arrival order.
    pub fn as_slice(&self) -> &[AlertRecord] {
        &self.active
    }

    /// Active alerts, most severe first.
    pub fn prioritized(&self) -> Vec<AlertRecord> {
        priority::prioritize(&self.active)
    }
}

fn log_summary(summary: &IngestSummary) {
    debug!(
        added = summary.added,
        updated = summary.updated,
        suppressed = summary.suppressed,
        retired = summary.retired,
        "Alert batch ingested"
    );
}

fn ensure_unique<'a>(alerts: impl Iterator<Item = &'a AlertRecord>) -> Result<()> {
    let mut seen = HashSet::new();
    for alert in alerts {
        if !seen.insert(alert.id.as_str()) {
            return Err(Error::duplicate(RecordKind::Alert, alert.id.clone()));
        }
    }
    Ok(())
}

/// Alert severity raised for an outbreak tier, if any.
pub fn severity_for_tier(tier: RiskTier) -> Option<AlertSeverity> {
    match tier {
        RiskTier::Critical => Some(AlertSeverity::Critical),
        RiskTier::High => Some(AlertSeverity::High),
        RiskTier::Medium | RiskTier::Low => None,
    }
}

/// One alert per high or critical outbreak, in batch order.
pub fn derive_outbreak_alerts(
    records: &[OutbreakRecord],
    thresholds: &ClassificationThresholds,
) -> Vec<AlertRecord> {
    records
        .iter()
        .filter_map(|record| {
            let tier = record.risk_tier_with(thresholds);
            severity_for_tier(tier).map(|severity| outbreak_alert(record, tier, severity))
        })
        .collect()
}

fn outbreak_alert(record: &OutbreakRecord, tier: RiskTier, severity: AlertSeverity) -> AlertRecord {
    AlertRecord {
        id: format!("outbreak-{}", record.id),
        severity,
        title: format!("{} {}", record.disease, tier.label()),
        message: format!(
            "{} cases and {} deaths reported in {} ({:.2}% mortality).",
            group_thousands(record.cases),
            group_thousands(record.deaths),
            record.location,
            record.mortality_rate()
        ),
        timestamp: record.last_updated.clone(),
        location: Some(record.location.clone()),
        is_new: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Coordinates, Recency, Trend};
    use pretty_assertions::assert_eq;

    fn alert(id: &str, severity: AlertSeverity) -> AlertRecord {
        AlertRecord {
            id: id.into(),
            severity,
            title: format!("Alert {id}"),
            message: "message".into(),
            timestamp: Recency::Relative("2 minutes ago".into()),
            location: Some("West Africa".into()),
            is_new: true,
        }
    }

    fn ids(alerts: &[AlertRecord]) -> Vec<&str> {
        alerts.iter().map(|a| a.id.as_str()).collect()
    }

    fn sample_set() -> AlertSet {
        AlertSet::from_batch(vec![
            alert("1", AlertSeverity::Critical),
            alert("2", AlertSeverity::High),
            alert("3", AlertSeverity::Medium),
            alert("4", AlertSeverity::Info),
        ])
        .unwrap()
    }

    #[test]
    fn test_dismiss_removes_alert() {
        let mut set = sample_set();
        assert!(set.dismiss("2"));
        assert_eq!(ids(set.as_slice()), vec!["1", "3", "4"]);
        assert!(!set.contains("2"));
    }

    #[test]
    fn test_dismiss_unknown_is_noop_twice() {
        let mut set = sample_set();
        let before = set.as_slice().to_vec();

        assert!(!set.dismiss("missing"));
        assert_eq!(set.as_slice(), before.as_slice());

        assert!(!set.dismiss("missing"));
        assert_eq!(set.as_slice(), before.as_slice());
        assert!(!set.is_dismissed("missing"));
    }

    #[test]
    fn test_dismiss_is_idempotent() {
        let mut set = sample_set();
        assert!(set.dismiss("1"));
        assert!(!set.dismiss("1"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_dismissed_alert_not_resurrected_by_feed() {
        let mut set = sample_set();
        set.dismiss("1");
        let summary = set
            .ingest(vec![alert("1", AlertSeverity::Critical), alert("5", AlertSeverity::High)])
            .unwrap();
        assert_eq!(
            summary,
            IngestSummary {
                added: 1,
                updated: 0,
                suppressed: 1,
                retired: 0,
            }
        );
        assert!(!set.contains("1"));
        assert!(set.contains("5"));
        assert!(set.is_dismissed("1"));
    }

    #[test]
    fn test_duplicate_ids_in_batch_rejected_without_mutation() {
        let mut set = sample_set();
        let err = set
            .ingest(vec![alert("9", AlertSeverity::High), alert("9", AlertSeverity::Info)])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateId { kind: RecordKind::Alert, .. }));
        assert_eq!(set.len(), 4);
        assert!(!set.contains("9"));
    }

    #[test]
    fn test_refresh_keeps_acknowledgement() {
        let mut set = sample_set();
        assert!(set.acknowledge("3"));
        let mut updated = alert("3", AlertSeverity::High);
        updated.message = "escalated".into();
        let summary = set.ingest(vec![updated]).unwrap();

        assert_eq!(summary.updated, 1);
        let current = set.get("3").unwrap();
        assert_eq!(current.severity, AlertSeverity::High);
        assert_eq!(current.message, "escalated");
        assert!(!current.is_new);
    }

    #[test]
    fn test_new_count_and_acknowledge() {
        let mut set = sample_set();
        assert_eq!(set.new_count(), 4);
        set.acknowledge("1");
        assert_eq!(set.new_count(), 3);
        assert!(!set.acknowledge("missing"));
        set.acknowledge_all();
        assert_eq!(set.new_count(), 0);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_prioritized_view() {
        let set = AlertSet::from_batch(vec![
            alert("a", AlertSeverity::Info),
            alert("b", AlertSeverity::Critical),
            alert("c", AlertSeverity::Medium),
            alert("d", AlertSeverity::Critical),
        ])
        .unwrap();
        assert_eq!(ids(&set.prioritized()), vec!["b", "d", "c", "a"]);
        assert_eq!(ids(set.as_slice()), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_empty_set() {
        let set = AlertSet::new();
        assert!(set.is_empty());
        assert_eq!(set.new_count(), 0);
        assert!(set.prioritized().is_empty());
    }

    fn outbreak(id: &str, cases: u64, deaths: u64) -> OutbreakRecord {
        OutbreakRecord {
            id: id.into(),
            disease: "Ebola".into(),
            location: "West Africa".into(),
            cases,
            deaths,
            risk_level: None,
            last_updated: Recency::Relative("15 minutes ago".into()),
            coordinates: Coordinates::default(),
            trend: Trend::Down,
        }
    }

    #[test]
    fn test_derived_alerts_only_for_high_risk() {
        let records = vec![
            outbreak("4", 1_240, 678),
            outbreak("2", 8_750, 89),
            outbreak("3", 23_100, 445),
        ];
        let alerts = derive_outbreak_alerts(&records, &ClassificationThresholds::default());
        assert_eq!(ids(&alerts), vec!["outbreak-4", "outbreak-3"]);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert_eq!(alerts[1].severity, AlertSeverity::High);
        assert_eq!(alerts[0].title, "Ebola Critical Risk");
        assert_eq!(
            alerts[0].message,
            "1,240 cases and 678 deaths reported in West Africa (54.68% mortality)."
        );
        assert_eq!(alerts[0].location.as_deref(), Some("West Africa"));
        assert!(alerts[0].is_new);
    }

    fn derived(id: &str, severity: AlertSeverity) -> AlertRecord {
        let mut alert = alert(id, severity);
        alert.title = format!("Derived {id}");
        alert
    }

    #[test]
    fn test_sync_retires_cooled_derived_alerts() {
        let mut set = AlertSet::new();
        set.sync(
            vec![alert("feed", AlertSeverity::Info)],
            vec![derived("outbreak-e", AlertSeverity::Critical)],
        )
        .unwrap();
        assert!(set.contains("outbreak-e"));

        let summary = set.sync(vec![alert("feed", AlertSeverity::Info)], vec![]).unwrap();
        assert_eq!(summary.retired, 1);
        assert_eq!(ids(set.as_slice()), vec!["feed"]);
    }

    #[test]
    fn test_sync_downgrades_and_keeps_acknowledgement() {
        let mut set = AlertSet::new();
        set.sync(vec![], vec![derived("outbreak-e", AlertSeverity::Critical)])
            .unwrap();
        set.acknowledge("outbreak-e");

        set.sync(vec![], vec![derived("outbreak-e", AlertSeverity::High)])
            .unwrap();
        let current = set.get("outbreak-e").unwrap();
        assert_eq!(current.severity, AlertSeverity::High);
        assert!(!current.is_new);
    }

    #[test]
    fn test_sync_keeps_dismissed_derived_alert_hidden() {
        let mut set = AlertSet::new();
        set.sync(vec![], vec![derived("outbreak-e", AlertSeverity::Critical)])
            .unwrap();
        assert!(set.dismiss("outbreak-e"));

        let summary = set
            .sync(vec![], vec![derived("outbreak-e", AlertSeverity::Critical)])
            .unwrap();
        assert_eq!(summary.suppressed, 1);
        assert!(set.is_empty());
    }

    #[test]
    fn test_feed_and_derived_ids_must_not_collide() {
        let mut set = sample_set();
        let err = set
            .sync(
                vec![alert("outbreak-e", AlertSeverity::Info)],
                vec![derived("outbreak-e", AlertSeverity::Critical)],
            )
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateId { kind: RecordKind::Alert, ref id } if id == "outbreak-e"));
        assert_eq!(set.len(), 4);
        assert!(!set.contains("outbreak-e"));
    }

    #[test]
    fn test_derived_alert_cannot_replace_active_feed_alert() {
        let mut set = AlertSet::from_batch(vec![alert("outbreak-e", AlertSeverity::Info)]).unwrap();
        let err = set
            .sync(vec![], vec![derived("outbreak-e", AlertSeverity::Critical)])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateId { .. }));
        assert_eq!(set.get("outbreak-e").unwrap().title, "Alert outbreak-e");
    }

    #[test]
    fn test_feed_ingest_cannot_replace_active_derived_alert() {
        let mut set = AlertSet::new();
        set.sync(vec![], vec![derived("outbreak-e", AlertSeverity::Critical)])
            .unwrap();
        assert!(set.ingest(vec![alert("outbreak-e", AlertSeverity::Info)]).is_err());
        assert_eq!(set.get("outbreak-e").unwrap().title, "Derived outbreak-e");
    }

    #[test]
    fn test_tombstones_outlive_absent_refreshes() {
        let mut set = sample_set();
        set.dismiss("1");
        for _ in 0..50 {
            set.ingest(vec![alert("2", AlertSeverity::High)]).unwrap();
        }
        set.ingest(vec![alert("1", AlertSeverity::Critical)]).unwrap();
        assert!(!set.contains("1"));
        assert!(set.is_dismissed("1"));
    }

    #[test]
    fn test_severity_for_tier_table() {
        assert_eq!(severity_for_tier(RiskTier::Critical), Some(AlertSeverity::Critical));
        assert_eq!(severity_for_tier(RiskTier::High), Some(AlertSeverity::High));
        assert_eq!(severity_for_tier(RiskTier::Medium), None);
        assert_eq!(severity_for_tier(RiskTier::Low), None);
    }
}
