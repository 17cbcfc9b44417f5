// Export modules for library usage
pub mod alerts;
pub mod batch;
pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod core;
pub mod dashboard;
pub mod errors;
pub mod filter;
pub mod formatting;
pub mod io;
pub mod metrics;
pub mod priority;
pub mod risk;

// Re-export commonly used types
pub use crate::core::{
    AlertRecord, AlertSeverity, Coordinates, HasRecency, OutbreakRecord, PredictionRecord,
    Ranked, Recency, RiskTier, Trend,
};

pub use crate::alerts::{derive_outbreak_alerts, AlertSet, IngestSummary};
pub use crate::batch::FeedBatch;
pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::config::OutbreakmapConfig;
pub use crate::dashboard::{Dashboard, DashboardSnapshot, RefreshLoop};
pub use crate::errors::{Error, Result};
pub use crate::filter::{by_disease, within_window, DiseaseSelection, LookbackWindow};
pub use crate::formatting::{age_label, compact, format_timestamp, group_thousands};
pub use crate::metrics::{aggregate, aggregate_with_thresholds, DashboardMetrics};
pub use crate::priority::{prioritize, prioritize_by_label, prioritize_predictions};
pub use crate::risk::{
    classify, classify_batch, classify_signed, classify_with_thresholds, mortality_rate,
    ClassificationThresholds, TierPolicy,
};
