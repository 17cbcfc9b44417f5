//! `.outbreakmap.toml` configuration.
//!
//! Every table and field is optional; anything missing falls back to the
//! built-in defaults.

mod loader;

pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_and_validate_config,
    CONFIG_FILE_NAME,
};

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::filter::LookbackWindow;
use crate::risk::{ClassificationThresholds, TierPolicy};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutbreakmapConfig {
    #[serde(default)]
    pub classification: ClassificationConfig,

    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    #[serde(flatten)]
    pub thresholds: ClassificationThresholds,

    /// Recompute tiers even when the feed already supplied one
    #[serde(default)]
    pub reclassify: bool,
}

impl ClassificationConfig {
    pub fn policy(&self) -> TierPolicy {
        if self.reclassify {
            TierPolicy::Reclassify
        } else {
            TierPolicy::KeepTagged
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            lookback_hours: default_lookback_hours(),
        }
    }
}

impl WindowConfig {
    pub fn lookback(&self) -> Result<LookbackWindow> {
        LookbackWindow::hours(self.lookback_hours)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub default_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
        }
    }
}

fn default_lookback_hours() -> f64 {
    24.0
}

fn default_interval_secs() -> u64 {
    60
}

fn default_format() -> String {
    "terminal".to_string()
}

/// Contents written by `outbreakmap init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# Outbreakmap Configuration

[classification]
# A tier fires when EITHER its mortality (%) OR its case clause is exceeded.
critical_mortality = 10.0
critical_cases = 50000
high_mortality = 5.0
high_cases = 20000
medium_mortality = 2.0
medium_cases = 5000
# Recompute tiers even when the feed supplied one
reclassify = false

[window]
lookback_hours = 24.0

[refresh]
interval_secs = 60

[output]
default_format = "terminal"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_file_matches_default_struct() {
        let parsed = parse_and_validate_config(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(parsed, OutbreakmapConfig::default());
    }

    #[test]
    fn test_policy_from_flag() {
        let mut config = ClassificationConfig::default();
        assert_eq!(config.policy(), TierPolicy::KeepTagged);
        config.reclassify = true;
        assert_eq!(config.policy(), TierPolicy::Reclassify);
    }

    #[test]
    fn test_window_lookback() {
        let window = WindowConfig::default().lookback().unwrap();
        assert_eq!(window.as_hours(), 24.0);

        let bad = WindowConfig {
            lookback_hours: 0.0,
        };
        assert!(bad.lookback().is_err());
    }
}
