use std::fs;
use std::path::{Path, PathBuf};

use super::OutbreakmapConfig;
use crate::errors::{Error, Result};
use crate::risk::ClassificationThresholds;

pub const CONFIG_FILE_NAME: &str = ".outbreakmap.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse config from a TOML string and repair what can be repaired.
///
/// Unordered classification thresholds are replaced with the defaults
/// (with a warning) instead of failing the whole load.
pub fn parse_and_validate_config(contents: &str) -> Result<OutbreakmapConfig> {
    let mut config = toml::from_str::<OutbreakmapConfig>(contents)
        .map_err(|e| Error::config(format!("Failed to parse {CONFIG_FILE_NAME}: {e}")))?;

    if let Err(e) = config.classification.thresholds.validate() {
        log::warn!("Invalid classification thresholds: {}. Using defaults.", e);
        config.classification.thresholds = ClassificationThresholds::default();
    }

    if !(config.window.lookback_hours.is_finite() && config.window.lookback_hours > 0.0) {
        log::warn!(
            "Invalid lookback_hours {}. Using default.",
            config.window.lookback_hours
        );
        config.window = Default::default();
    }

    if config.refresh.interval_secs == 0 {
        log::warn!("refresh.interval_secs must be at least 1. Using default.");
        config.refresh = Default::default();
    }

    Ok(config)
}

/// Load an explicit config file. Errors are returned, not swallowed.
pub fn load_config_from(path: &Path) -> Result<OutbreakmapConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::file_system("Failed to read config file", path, e))?;
    let config = parse_and_validate_config(&contents)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn try_load_config_from_path(config_path: &Path) -> Option<OutbreakmapConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// `start` and its parents, nearest first, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search the working directory and its ancestors for a config file.
pub fn load_config() -> OutbreakmapConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return OutbreakmapConfig::default();
        }
    };

    load_config_near(current)
}

pub(crate) fn load_config_near(start: PathBuf) -> OutbreakmapConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            OutbreakmapConfig::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(
            parse_and_validate_config("").unwrap(),
            OutbreakmapConfig::default()
        );
    }

    #[test]
    fn test_partial_config() {
        let config = parse_and_validate_config(indoc! {r#"
            [classification]
            critical_cases = 75000
            reclassify = true

            [window]
            lookback_hours = 6
        "#})
        .unwrap();
        assert_eq!(config.classification.thresholds.critical_cases, 75_000);
        assert_eq!(config.classification.thresholds.high_cases, 20_000);
        assert!(config.classification.reclassify);
        assert_eq!(config.window.lookback_hours, 6.0);
        assert_eq!(config.refresh.interval_secs, 60);
    }

    #[test]
    fn test_unordered_thresholds_fall_back() {
        let config = parse_and_validate_config(indoc! {r#"
            [classification]
            medium_cases = 90000
        "#})
        .unwrap();
        assert_eq!(
            config.classification.thresholds,
            ClassificationThresholds::default()
        );
    }

    #[test]
    fn test_bad_window_and_interval_fall_back() {
        let config = parse_and_validate_config(indoc! {r#"
            [window]
            lookback_hours = -2.0

            [refresh]
            interval_secs = 0
        "#})
        .unwrap();
        assert_eq!(config.window.lookback_hours, 24.0);
        assert_eq!(config.refresh.interval_secs, 60);
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let err = parse_and_validate_config("[classification\n").unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_directory_ancestors_depth() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c"), PathBuf::from("/a/b")]);
    }

    #[test]
    fn test_config_found_in_parent_directory() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("feeds").join("daily");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[refresh]\ninterval_secs = 15\n",
        )
        .unwrap();

        let config = load_config_near(nested);
        assert_eq!(config.refresh.interval_secs, 15);
    }

    #[test]
    fn test_load_config_from_missing_path() {
        let err = load_config_from(Path::new("/nonexistent/.outbreakmap.toml")).unwrap_err();
        assert!(matches!(err, Error::FileSystem { .. }));
    }
}
