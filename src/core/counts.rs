//! Input-boundary policy for numeric fields supplied by the feed.
//!
//! Counts are clamped, never rejected:
//!
//! - missing or `null` counts become zero
//! - negative counts are clamped to zero
//! - fractional counts are truncated toward zero
//! - percentages are clamped into `0..=100`
//!
//! Every clamp is reported through `tracing::warn!`.

use serde::{Deserialize, Deserializer};
use tracing::warn;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

/// Clamp a signed count to the non-negative range.
pub fn clamp_count(value: i64) -> u64 {
    if value < 0 {
        warn!(value, "Negative count clamped to zero");
        0
    } else {
        value as u64
    }
}

fn clamp_float(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        if value != 0.0 {
            warn!(value, "Non-positive or non-finite count clamped to zero");
        }
        0
    } else if value >= u64::MAX as f64 {
        u64::MAX
    } else {
        value.trunc() as u64
    }
}

fn raw_to_count(raw: Option<RawNumber>) -> u64 {
    match raw {
        None => 0,
        Some(RawNumber::Unsigned(n)) => n,
        Some(RawNumber::Signed(n)) => clamp_count(n),
        Some(RawNumber::Float(f)) => clamp_float(f),
    }
}

/// Serde adapter for case/death counts.
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw_to_count(raw))
}

/// Clamp an arbitrary count into a percentage.
pub fn clamp_percent(value: u64) -> u8 {
    if value > 100 {
        warn!(value, "Percentage above 100 clamped");
        100
    } else {
        value as u8
    }
}

/// Serde adapter for probability/confidence percentages.
pub fn deserialize_percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(clamp_percent(raw_to_count(raw)))
}
