//! Display ordering for model forecasts.
//!
//! Probability and confidence come pre-computed; this module only decides
//! where a forecast sits on the board and how loudly it is shown.

use crate::core::PredictionRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Visual emphasis bucket for an outbreak probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbabilityBand {
    Unlikely,
    Possible,
    Elevated,
    Likely,
}

impl ProbabilityBand {
    pub fn from_probability(probability: u8) -> Self {
        match probability {
            70.. => ProbabilityBand::Likely,
            50..=69 => ProbabilityBand::Elevated,
            30..=49 => ProbabilityBand::Possible,
            _ => ProbabilityBand::Unlikely,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProbabilityBand::Unlikely => "unlikely",
            ProbabilityBand::Possible => "possible",
            ProbabilityBand::Elevated => "elevated",
            ProbabilityBand::Likely => "likely",
        }
    }
}

/// Highest probability first; equal probabilities keep feed order.
pub fn prioritize_predictions(predictions: &[PredictionRecord]) -> Vec<PredictionRecord> {
    let mut sorted = predictions.to_vec();
    sorted.sort_by_key(|p| Reverse(p.probability));
    sorted
}
