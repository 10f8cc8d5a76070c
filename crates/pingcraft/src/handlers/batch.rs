//! Concurrent batch probing.
//!
//! All entries run at once; each entry's outcome lands in its own slot and
//! the output keeps input order.

use futures::future::join_all;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use super::dispatch::Dispatcher;
use super::response::{WrappedResult, timestamp};
use super::service::query_with_metadata;
use crate::config::ProbeConfig;
use crate::error::ValidationError;
use crate::protocol::RawTarget;

/// Outcome of one batch entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BatchOutcome {
    /// Entry was valid and probed; the server itself may be offline
    Probed { data: WrappedResult },
    /// Entry was rejected before probing
    Rejected { error: String, server: Value },
}

/// One slot of a batch result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchItem {
    pub index: usize,
    pub success: bool,

    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

impl BatchItem {
    fn probed(index: usize, data: WrappedResult) -> Self {
        Self { index, success: true, outcome: BatchOutcome::Probed { data } }
    }

    fn rejected(index: usize, error: ValidationError, raw: &RawTarget) -> Self {
        let server = json!({ "host": raw.host, "port": raw.port, "type": raw.kind });
        Self { index, success: false, outcome: BatchOutcome::Rejected { error: error.to_string(), server } }
    }
}

/// Result of a whole batch, ordered by input index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub total: usize,
    pub results: Vec<BatchItem>,
    pub timestamp: String,
}

/// Fans a bounded list of targets out concurrently
#[derive(Clone)]
pub struct BatchOrchestrator {
    dispatcher: Dispatcher,
    config: ProbeConfig,
}

impl BatchOrchestrator {
    pub fn new(dispatcher: Dispatcher, config: ProbeConfig) -> Self {
        Self { dispatcher, config }
    }

    /// Probe every entry of `targets`.
    ///
    /// Fails only when `targets` is not a non-empty array within the batch
    /// cap; per-entry problems are reported in the entry's slot.
    pub async fn run_batch(&self, targets: Option<&Value>) -> Result<BatchResult, ValidationError> {
        let entries = match targets {
            Some(Value::Array(entries)) => entries,
            _ => return Err(ValidationError::BatchNotArray),
        };
        if entries.is_empty() {
            return Err(ValidationError::BatchEmpty);
        }
        if entries.len() > self.config.max_batch_size {
            return Err(ValidationError::BatchTooLarge { max: self.config.max_batch_size });
        }

        info!("Running batch of {} servers", entries.len());

        let probes = entries.iter().enumerate().map(|(index, entry)| self.run_entry(index, entry));
        let results = join_all(probes).await;

        Ok(BatchResult { total: entries.len(), results, timestamp: timestamp() })
    }

    async fn run_entry(&self, index: usize, entry: &Value) -> BatchItem {
        let raw = match entry {
            Value::Object(_) => serde_json::from_value::<RawTarget>(entry.clone()).ok(),
            _ => None,
        };
        let Some(raw) = raw else {
            return BatchItem::rejected(index, ValidationError::InvalidTarget, &RawTarget::default());
        };

        match query_with_metadata(&self.dispatcher, &self.config, &raw).await {
            Ok(data) => BatchItem::probed(index, data),
            Err(error) => BatchItem::rejected(index, error, &raw),
        }
    }
}
