//! pingcraft - Minecraft server status probing
//!
//! This library validates probe parameters, dispatches probes to the Java or
//! Bedrock status protocol, fans batches out concurrently and shapes the
//! results into uniform, serializable records.

pub mod config;
pub mod error;
pub mod handlers;
pub mod probe;
pub mod protocol;

// Re-export main types
pub use config::ProbeConfig;
pub use error::{ProtocolError, ValidationError};
pub use handlers::{
    BatchOrchestrator, BatchResult, Dispatcher, PingSummary, ProbeService, WrappedResult,
    validate, with_metadata,
};
pub use probe::{ProbeResult, Prober};
pub use protocol::{NetStatusClient, ProbeRequest, RawTarget, StatusClient, Variant};

/// Service name reported in result metadata
pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

/// Service version reported in result metadata
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
