//! Core record types shared by every stage of the engine.
//!
//! Records arrive from an external feed, are classified and ordered on each
//! refresh cycle, and are dropped when the next batch supersedes them.

pub mod counts;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::risk::{self, ClassificationThresholds};

/// Anything that can be placed on a single severity scale.
///
/// Higher ranks sort first. Outbreak risk tiers and alert severities use
/// distinct enums but share this scale so one prioritizer serves both.
pub trait Ranked {
    fn rank(&self) -> u8;
}

impl<T: Ranked + ?Sized> Ranked for &T {
    fn rank(&self) -> u8 {
        (**self).rank()
    }
}

/// Anything carrying a recency marker that may resolve to an instant.
pub trait HasRecency {
    fn recency(&self) -> &Recency;
}

/// Discrete severity classification of an outbreak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    /// Every tier, lowest first.
    pub const ALL: [RiskTier; 4] = [
        RiskTier::Low,
        RiskTier::Medium,
        RiskTier::High,
        RiskTier::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
            RiskTier::Critical => "critical",
        }
    }

    /// Label used on outbreak cards and in reports.
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::High => "High Risk",
            RiskTier::Critical => "Critical Risk",
        }
    }

    /// High and critical outbreaks count toward the dashboard's high-risk total.
    pub fn is_high_risk(&self) -> bool {
        matches!(self, RiskTier::High | RiskTier::Critical)
    }
}

impl Ranked for RiskTier {
    fn rank(&self) -> u8 {
        match self {
            RiskTier::Low => 1,
            RiskTier::Medium => 2,
            RiskTier::High => 3,
            RiskTier::Critical => 4,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskTier::Low),
            "medium" => Ok(RiskTier::Medium),
            "high" => Ok(RiskTier::High),
            "critical" => Ok(RiskTier::Critical),
            other => Err(format!("unknown risk tier '{other}'")),
        }
    }
}

/// Urgency of an operator-facing alert.
///
/// Shares labels with [`RiskTier`] but is a separate scale: `Info` ranks
/// below everything, including a risk tier's `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub const ALL: [AlertSeverity; 4] = [
        AlertSeverity::Info,
        AlertSeverity::Medium,
        AlertSeverity::High,
        AlertSeverity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }
}

impl Ranked for AlertSeverity {
    fn rank(&self) -> u8 {
        match self {
            AlertSeverity::Info => 0,
            AlertSeverity::Medium => 2,
            AlertSeverity::High => 3,
            AlertSeverity::Critical => 4,
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "info" => Ok(AlertSeverity::Info),
            "medium" => Ok(AlertSeverity::Medium),
            "high" => Ok(AlertSeverity::High),
            "critical" => Ok(AlertSeverity::Critical),
            other => Err(format!("unknown alert severity '{other}'")),
        }
    }
}

/// Direction reported by the feed; passed through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }
}

/// Geographic position. Opaque to the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A record's notion of "when".
///
/// Feeds send either an absolute timestamp or an already rendered age such
/// as `"2 hours ago"`. Only the former can take part in time-window queries.
/// A record without any marker gets an empty label and is treated as stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Recency {
    Timestamp(DateTime<Utc>),
    Relative(String),
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

impl Default for Recency {
    fn default() -> Self {
        Recency::Relative(String::new())
    }
}

impl Recency {
    /// Interpret a raw feed string. Never fails; anything that is not a
    /// recognizable timestamp is kept as a relative label.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
            return Recency::Timestamp(ts.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
            .or_else(|| {
                // date-only values mean midnight UTC
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .map(|naive| Recency::Timestamp(naive.and_utc()))
            .unwrap_or_else(|| Recency::Relative(raw.to_string()))
    }

    pub fn at(ts: DateTime<Utc>) -> Self {
        Recency::Timestamp(ts)
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Recency::Timestamp(ts) => Some(*ts),
            Recency::Relative(_) => None,
        }
    }
}

impl From<String> for Recency {
    fn from(raw: String) -> Self {
        Recency::parse(&raw)
    }
}

impl From<Recency> for String {
    fn from(recency: Recency) -> Self {
        match recency {
            Recency::Timestamp(ts) => ts.to_rfc3339(),
            Recency::Relative(label) => label,
        }
    }
}

impl fmt::Display for Recency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recency::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            Recency::Relative(label) => f.write_str(label),
        }
    }
}

/// One outbreak as reported by the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutbreakRecord {
    pub id: String,
    pub disease: String,
    pub location: String,
    #[serde(default, deserialize_with = "counts::deserialize_count")]
    pub cases: u64,
    #[serde(default, deserialize_with = "counts::deserialize_count")]
    pub deaths: u64,
    /// Derived. `None` until classified unless the feed supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskTier>,
    #[serde(default)]
    pub last_updated: Recency,
    #[serde(default)]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub trend: Trend,
}

impl OutbreakRecord {
    /// The tagged tier, or the default-threshold classification when untagged.
    pub fn risk_tier(&self) -> RiskTier {
        self.risk_tier_with(&ClassificationThresholds::default())
    }

    pub fn risk_tier_with(&self, thresholds: &ClassificationThresholds) -> RiskTier {
        self.risk_level.unwrap_or_else(|| {
            risk::classify_with_thresholds(self.cases, self.deaths, thresholds)
        })
    }

    pub fn mortality_rate(&self) -> f64 {
        risk::mortality_rate(self.deaths, self.cases)
    }
}

impl Ranked for OutbreakRecord {
    fn rank(&self) -> u8 {
        self.risk_tier().rank()
    }
}

impl HasRecency for OutbreakRecord {
    fn recency(&self) -> &Recency {
        &self.last_updated
    }
}

/// An operator-facing alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub id: String,
    #[serde(alias = "type")]
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub timestamp: Recency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Cleared once an operator acknowledges the alert.
    #[serde(default)]
    pub is_new: bool,
}

impl Ranked for AlertRecord {
    fn rank(&self) -> u8 {
        self.severity.rank()
    }
}

impl HasRecency for AlertRecord {
    fn recency(&self) -> &Recency {
        &self.timestamp
    }
}

/// A pre-scored forecast from an external model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub disease: String,
    pub region: String,
    #[serde(default, deserialize_with = "counts::deserialize_percent")]
    pub probability: u8,
    #[serde(default, deserialize_with = "counts::deserialize_percent")]
    pub confidence: u8,
    pub timeframe: String,
    #[serde(default)]
    pub factors: Vec<String>,
}
