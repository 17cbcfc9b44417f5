//! Feed batches: the unit of input for one refresh cycle.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{AlertRecord, OutbreakRecord, PredictionRecord};
use crate::errors::{Error, RecordKind, Result};

/// Everything the external feed delivers in one go. Missing sections are
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedBatch {
    #[serde(default)]
    pub outbreaks: Vec<OutbreakRecord>,
    #[serde(default)]
    pub alerts: Vec<AlertRecord>,
    #[serde(default)]
    pub predictions: Vec<PredictionRecord>,
}

impl FeedBatch {
    /// Parse and check a JSON batch.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let batch: FeedBatch = serde_json::from_str(json)?;
        batch.validate()?;
        Ok(batch)
    }

    /// Read a JSON batch from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::file_system("Failed to read feed batch", path, e))?;
        let batch = Self::from_json_str(&contents)?;
        info!(
            path = %path.display(),
            outbreaks = batch.outbreaks.len(),
            alerts = batch.alerts.len(),
            predictions = batch.predictions.len(),
            "Loaded feed batch"
        );
        Ok(batch)
    }

    /// Identifiers must be unique per record kind. Colliding records are
    /// never merged.
    pub fn validate(&self) -> Result<()> {
        first_duplicate(self.outbreaks.iter().map(|o| o.id.as_str()))
            .map_or(Ok(()), |id| Err(Error::duplicate(RecordKind::Outbreak, id)))?;
        first_duplicate(self.alerts.iter().map(|a| a.id.as_str()))
            .map_or(Ok(()), |id| Err(Error::duplicate(RecordKind::Alert, id)))
    }

    pub fn is_empty(&self) -> bool {
        self.outbreaks.is_empty() && self.alerts.is_empty() && self.predictions.is_empty()
    }
}

fn first_duplicate<'a>(ids: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}
