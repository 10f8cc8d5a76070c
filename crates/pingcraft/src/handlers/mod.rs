//! Probe handlers for pingcraft.
//!
//! Validation, dispatch, batch fan-out and response shaping.

pub mod batch;
pub mod dispatch;
pub mod response;
pub mod service;
pub mod validation;

pub use batch::{BatchItem, BatchOrchestrator, BatchOutcome, BatchResult};
pub use dispatch::Dispatcher;
pub use response::{Metadata, PingSummary, WrappedResult, timestamp, with_metadata};
pub use service::ProbeService;
pub use validation::validate;
