//! Static joke dataset, read once at startup.
//!
//! A bad dataset never stops the service: [`Dataset::load_or_empty`] logs the
//! failure and serves an empty feed instead.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{error, info};

use crate::error::DatasetError;
use crate::error_utils::ErrorExt;
use crate::pagination::page_slice;
use crate::types::JokeRecord;

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<JokeRecord>,
}

impl Dataset {
    pub fn new(records: Vec<JokeRecord>) -> Self {
        Self { records }
    }

    /// Parses the JSON array at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DatasetError::NotFound {
                path: display.clone(),
            },
            _ => DatasetError::Unreadable {
                path: display.clone(),
                reason: e.to_string(),
            },
        })?;

        Self::from_json(&raw).map_err(|e| match e {
            DatasetError::Malformed { reason, .. } => DatasetError::Malformed {
                path: display,
                reason,
            },
            other => other,
        })
    }

    /// Loads `path`, falling back to an empty dataset on any failure.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(dataset) => {
                info!(
                    path = %path.display(),
                    records = dataset.len(),
                    "Loaded joke dataset"
                );
                dataset
            }
            Err(e) => {
                e.log_error();
                error!(
                    path = %path.display(),
                    "{} Continuing with an empty joke dataset",
                    e.user_friendly_message()
                );
                Self::default()
            }
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, DatasetError> {
        let records: Vec<JokeRecord> =
            serde_json::from_str(raw).map_err(|e| DatasetError::Malformed {
                path: "<inline>".to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[JokeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records on 1-based page `page_num`, in dataset order.
    pub fn page(&self, page_num: i64, page_size: usize) -> &[JokeRecord] {
        page_slice(&self.records, page_num, page_size)
    }
}
