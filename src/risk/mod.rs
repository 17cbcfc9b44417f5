//! Risk classification for outbreak records.
//!
//! Turns a (cases, deaths) observation into a [`RiskTier`]. Rules are tried
//! from the most severe tier down and the first match wins. Every tier is
//! satisfied by its mortality clause OR its case-count clause, so a large
//! outbreak with no deaths still lands in the critical tier.

mod thresholds;

pub use thresholds::ClassificationThresholds;

use crate::core::counts::clamp_count;
use crate::core::{OutbreakRecord, RiskTier};
use tracing::debug;

/// Deaths as a percentage of cases, rounded to two decimal places.
///
/// Zero cases yields zero. Deaths above cases are not rejected and produce
/// a rate above 100.
pub fn mortality_rate(deaths: u64, cases: u64) -> f64 {
    if cases == 0 {
        return 0.0;
    }
    let rate = deaths as f64 / cases as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// Classify with the default thresholds.
pub fn classify(cases: u64, deaths: u64) -> RiskTier {
    classify_with_thresholds(cases, deaths, &ClassificationThresholds::default())
}

/// Classify signed observations.
///
/// Negative counts are a caller contract violation; they are clamped to
/// zero before classification rather than rejected.
pub fn classify_signed(cases: i64, deaths: i64) -> RiskTier {
    classify(clamp_count(cases), clamp_count(deaths))
}

/// Classification with custom thresholds
pub fn classify_with_thresholds(
    cases: u64,
    deaths: u64,
    thresholds: &ClassificationThresholds,
) -> RiskTier {
    let rate = mortality_rate(deaths, cases);

    if rate > thresholds.critical_mortality || cases > thresholds.critical_cases {
        RiskTier::Critical
    } else if rate > thresholds.high_mortality || cases > thresholds.high_cases {
        RiskTier::High
    } else if rate > thresholds.medium_mortality || cases > thresholds.medium_cases {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// How to treat tiers that arrive already set by the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TierPolicy {
    /// Keep a feed-supplied tier, classify only untagged records
    #[default]
    KeepTagged,
    /// Recompute every tier from the counts
    Reclassify,
}

/// Tag every record in a batch with its tier.
pub fn classify_batch(
    records: Vec<OutbreakRecord>,
    thresholds: &ClassificationThresholds,
    policy: TierPolicy,
) -> Vec<OutbreakRecord> {
    records
        .into_iter()
        .map(|record| tag_record(record, thresholds, policy))
        .collect()
}

fn tag_record(
    mut record: OutbreakRecord,
    thresholds: &ClassificationThresholds,
    policy: TierPolicy,
) -> OutbreakRecord {
    let computed = classify_with_thresholds(record.cases, record.deaths, thresholds);
    match (record.risk_level, policy) {
        (Some(tagged), TierPolicy::KeepTagged) => {
            if tagged != computed {
                debug!(
                    id = %record.id,
                    %tagged,
                    %computed,
                    "Feed-supplied tier differs from computed tier; keeping feed value"
                );
            }
        }
        _ => record.risk_level = Some(computed),
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Coordinates, Recency, Trend};
    use proptest::prelude::*;

    fn outbreak(id: &str, cases: u64, deaths: u64, tier: Option<RiskTier>) -> OutbreakRecord {
        OutbreakRecord {
            id: id.into(),
            disease: "Influenza A".into(),
            location: "Southeast Asia".into(),
            cases,
            deaths,
            risk_level: tier,
            last_updated: Recency::Relative("2 hours ago".into()),
            coordinates: Coordinates::default(),
            trend: Trend::Up,
        }
    }

    #[test]
    fn test_mortality_rate_rounds_to_two_places() {
        assert_eq!(mortality_rate(234, 15420), 1.52);
        assert_eq!(mortality_rate(1, 3), 33.33);
        assert_eq!(mortality_rate(2, 3), 66.67);
    }

    #[test]
    fn test_mortality_rate_zero_cases() {
        assert_eq!(mortality_rate(0, 0), 0.0);
        assert_eq!(mortality_rate(10, 0), 0.0);
    }

    #[test]
    fn test_mortality_rate_allows_deaths_above_cases() {
        assert_eq!(mortality_rate(20, 10), 200.0);
    }

    #[test]
    fn test_classify_empty_outbreak_is_low() {
        assert_eq!(classify(0, 0), RiskTier::Low);
    }

    #[test]
    fn test_case_clause_fires_without_deaths() {
        assert_eq!(classify(60_000, 0), RiskTier::Critical);
        assert_eq!(classify(50_001, 0), RiskTier::Critical);
        assert_eq!(classify(50_000, 0), RiskTier::High);
        assert_eq!(classify(20_001, 0), RiskTier::High);
        assert_eq!(classify(20_000, 0), RiskTier::Medium);
        assert_eq!(classify(5_001, 0), RiskTier::Medium);
        assert_eq!(classify(5_000, 0), RiskTier::Low);
    }

    #[test]
    fn test_mortality_clause_fires_for_small_outbreaks() {
        assert_eq!(classify(100, 11), RiskTier::Critical);
        assert_eq!(classify(100, 10), RiskTier::High);
        assert_eq!(classify(100, 6), RiskTier::High);
        assert_eq!(classify(100, 5), RiskTier::Medium);
        assert_eq!(classify(100, 3), RiskTier::Medium);
        assert_eq!(classify(100, 2), RiskTier::Low);
    }

    #[test]
    fn test_feed_fixture_counts() {
        assert_eq!(classify(15_420, 234), RiskTier::Medium);
        assert_eq!(classify(8_750, 89), RiskTier::Medium);
        assert_eq!(classify(23_100, 445), RiskTier::High);
        assert_eq!(classify(1_240, 678), RiskTier::Critical);
        assert_eq!(classify(45_600, 1_230), RiskTier::High);
    }

    #[test]
    fn test_rounding_applies_before_comparison() {
        let rate_only = ClassificationThresholds {
            critical_cases: u64::MAX,
            high_cases: u64::MAX,
            medium_cases: u64::MAX,
            ..Default::default()
        };
        // 10.004% rounds to 10.00, which is not above the critical cut-off
        assert_eq!(mortality_rate(10_004, 100_000), 10.0);
        assert_eq!(
            classify_with_thresholds(100_000, 10_004, &rate_only),
            RiskTier::High
        );
        // 10.006% rounds to 10.01
        assert_eq!(
            classify_with_thresholds(100_000, 10_006, &rate_only),
            RiskTier::Critical
        );
    }

    #[test]
    fn test_classify_signed_clamps_negatives() {
        assert_eq!(classify_signed(-5, -1), RiskTier::Low);
        assert_eq!(classify_signed(60_000, -3), RiskTier::Critical);
        assert_eq!(classify_signed(-100, 11), RiskTier::Low);
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = ClassificationThresholds {
            critical_cases: 1_000,
            high_cases: 500,
            medium_cases: 100,
            ..Default::default()
        };
        assert_eq!(classify_with_thresholds(1_001, 0, &strict), RiskTier::Critical);
        assert_eq!(classify_with_thresholds(101, 0, &strict), RiskTier::Medium);
    }

    #[test]
    fn test_classify_batch_keeps_tagged_records() {
        let batch = vec![
            outbreak("1", 8_750, 89, Some(RiskTier::Low)),
            outbreak("2", 60_000, 0, None),
        ];
        let tagged = classify_batch(
            batch,
            &ClassificationThresholds::default(),
            TierPolicy::KeepTagged,
        );
        assert_eq!(tagged[0].risk_level, Some(RiskTier::Low));
        assert_eq!(tagged[1].risk_level, Some(RiskTier::Critical));
    }

    #[test]
    fn test_classify_batch_reclassify_overrides_feed() {
        let batch = vec![outbreak("1", 8_750, 89, Some(RiskTier::Low))];
        let tagged = classify_batch(
            batch,
            &ClassificationThresholds::default(),
            TierPolicy::Reclassify,
        );
        assert_eq!(tagged[0].risk_level, Some(RiskTier::Medium));
    }

    #[test]
    fn test_classify_batch_preserves_order_and_len() {
        let batch: Vec<_> = (0..5)
            .map(|i| outbreak(&i.to_string(), i * 10_000, 0, None))
            .collect();
        let tagged = classify_batch(
            batch,
            &ClassificationThresholds::default(),
            TierPolicy::KeepTagged,
        );
        let ids: Vec<_> = tagged.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3", "4"]);
    }

    proptest! {
        #[test]
        fn prop_more_deaths_never_lowers_tier(
            cases in 0u64..200_000,
            deaths in 0u64..50_000,
            extra in 0u64..50_000,
        ) {
            prop_assert!(classify(cases, deaths + extra) >= classify(cases, deaths));
        }

        #[test]
        fn prop_more_cases_never_lowers_tier_without_deaths(
            cases in 0u64..200_000,
            extra in 0u64..200_000,
        ) {
            prop_assert!(classify(cases + extra, 0) >= classify(cases, 0));
        }

        #[test]
        fn prop_scaling_an_outbreak_never_lowers_tier(
            cases in 1u64..100_000,
            deaths_pct in 0u64..=100,
            factor in 1u64..20,
        ) {
            let deaths = cases * deaths_pct / 100;
            prop_assert!(
                classify(cases * factor, deaths * factor) >= classify(cases, deaths)
            );
        }

        #[test]
        fn prop_tier_covers_every_input(cases in any::<u64>(), deaths in any::<u64>()) {
            let tier = classify(cases, deaths);
            prop_assert!(RiskTier::ALL.contains(&tier));
        }
    }
}
