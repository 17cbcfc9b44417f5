use super::report::load_config;
use crate::core::counts::clamp_count;
use crate::core::RiskTier;
use crate::risk::{classify_with_thresholds, mortality_rate, ClassificationThresholds};
use anyhow::Result;
use std::path::PathBuf;

pub struct ClassifyConfig {
    pub cases: i64,
    pub deaths: i64,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub tier: RiskTier,
    pub mortality_rate: f64,
}

pub fn classify_counts(
    cases: i64,
    deaths: i64,
    thresholds: &ClassificationThresholds,
) -> Classification {
    let (cases, deaths) = (clamp_count(cases), clamp_count(deaths));
    Classification {
        tier: classify_with_thresholds(cases, deaths, thresholds),
        mortality_rate: mortality_rate(deaths, cases),
    }
}

pub fn run_classify(config: ClassifyConfig) -> Result<()> {
    let loaded = load_config(config.config.as_deref())?;
    let result = classify_counts(
        config.cases,
        config.deaths,
        &loaded.classification.thresholds,
    );
    println!("{} ({})", result.tier.label(), result.tier);
    println!("Mortality rate: {:.2}%", result.mortality_rate);
    Ok(())
}
