use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use super::batch::{BatchOrchestrator, BatchResult};
use super::dispatch::Dispatcher;
use super::response::{PingSummary, WrappedResult, with_metadata};
use super::validation::validate;
use crate::config::ProbeConfig;
use crate::error::ValidationError;
use crate::probe::Prober;
use crate::protocol::{RawTarget, StatusClient};

/// Entry point for the three query styles: full status, ping and batch
#[derive(Clone)]
pub struct ProbeService {
    config: ProbeConfig,
    dispatcher: Dispatcher,
    batch: BatchOrchestrator,
}

impl ProbeService {
    pub fn new(client: Arc<dyn StatusClient>, config: ProbeConfig) -> Self {
        let dispatcher = Dispatcher::new(Prober::new(client));
        let batch = BatchOrchestrator::new(dispatcher.clone(), config);
        Self { config, dispatcher, batch }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Full status of one server, wrapped with metadata
    pub async fn status(&self, raw: &RawTarget) -> Result<WrappedResult, ValidationError> {
        query_with_metadata(&self.dispatcher, &self.config, raw).await
    }

    /// Reachability and latency of one server
    pub async fn ping(&self, raw: &RawTarget) -> Result<PingSummary, ValidationError> {
        let request = validate(raw, &self.config)?;
        Ok(self.dispatcher.dispatch(&request).await.into())
    }

    /// Probe up to `max_batch_size` servers concurrently
    pub async fn batch(&self, targets: Option<&Value>) -> Result<BatchResult, ValidationError> {
        self.batch.run_batch(targets).await
    }
}

/// Validate, dispatch and wrap one target; the query time covers all three
pub(crate) async fn query_with_metadata(
    dispatcher: &Dispatcher,
    config: &ProbeConfig,
    raw: &RawTarget,
) -> Result<WrappedResult, ValidationError> {
    let start = Instant::now();
    let request = validate(raw, config)?;
    let result = dispatcher.dispatch(&request).await;
    Ok(with_metadata(result, start, Instant::now()))
}
