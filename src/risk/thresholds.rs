use serde::{Deserialize, Serialize};

/// Cut-offs for the risk tiers.
///
/// Each tier fires when *either* its mortality clause or its case-count
/// clause holds. Both comparisons are strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationThresholds {
    /// Mortality rate (percent) above which an outbreak is critical
    #[serde(default = "default_critical_mortality")]
    pub critical_mortality: f64,

    /// Case count above which an outbreak is critical
    #[serde(default = "default_critical_cases")]
    pub critical_cases: u64,

    #[serde(default = "default_high_mortality")]
    pub high_mortality: f64,

    #[serde(default = "default_high_cases")]
    pub high_cases: u64,

    #[serde(default = "default_medium_mortality")]
    pub medium_mortality: f64,

    #[serde(default = "default_medium_cases")]
    pub medium_cases: u64,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            critical_mortality: default_critical_mortality(),
            critical_cases: default_critical_cases(),
            high_mortality: default_high_mortality(),
            high_cases: default_high_cases(),
            medium_mortality: default_medium_mortality(),
            medium_cases: default_medium_cases(),
        }
    }
}

impl ClassificationThresholds {
    /// Check that tiers are strictly ordered on both clauses.
    pub fn validate(&self) -> Result<(), String> {
        let rates = [
            self.medium_mortality,
            self.high_mortality,
            self.critical_mortality,
        ];
        if rates.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err("mortality thresholds must be finite and non-negative".to_string());
        }
        if !(self.medium_mortality < self.high_mortality
            && self.high_mortality < self.critical_mortality)
        {
            return Err(format!(
                "mortality thresholds must increase medium < high < critical (got {} / {} / {})",
                self.medium_mortality, self.high_mortality, self.critical_mortality
            ));
        }
        if !(self.medium_cases < self.high_cases && self.high_cases < self.critical_cases) {
            return Err(format!(
                "case thresholds must increase medium < high < critical (got {} / {} / {})",
                self.medium_cases, self.high_cases, self.critical_cases
            ));
        }
        Ok(())
    }
}

fn default_critical_mortality() -> f64 {
    10.0
}
fn default_critical_cases() -> u64 {
    50_000
}
fn default_high_mortality() -> f64 {
    5.0
}
fn default_high_cases() -> u64 {
    20_000
}
fn default_medium_mortality() -> f64 {
    2.0
}
fn default_medium_cases() -> u64 {
    5_000
}
