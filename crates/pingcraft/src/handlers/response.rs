//! Response utilities for pingcraft handlers.
//!
//! This module attaches service metadata to probe results.

use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::probe::ProbeResult;
use crate::protocol::Variant;
use crate::{SERVICE_NAME, SERVICE_VERSION};

/// Timing and identity metadata for a top-level response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Time spent handling the query, in milliseconds
    pub query_time_ms: u64,

    /// RFC 3339 time the metadata was attached
    pub timestamp: String,

    pub service_name: String,
    pub service_version: String,
}

/// A probe result together with its metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrappedResult {
    #[serde(flatten)]
    pub result: ProbeResult,

    pub metadata: Metadata,
}

/// Reduced result of the ping endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PingSummary {
    pub host: String,
    pub port: u16,

    #[serde(rename = "type")]
    pub variant: Variant,

    pub online: bool,
    pub ping_ms: Option<u64>,
    pub timestamp: String,
}

impl From<ProbeResult> for PingSummary {
    fn from(result: ProbeResult) -> Self {
        Self {
            host: result.host,
            port: result.port,
            variant: result.variant,
            online: result.online,
            ping_ms: result.ping_ms,
            timestamp: timestamp(),
        }
    }
}

/// Attach query time and service identity to a result
pub fn with_metadata(result: ProbeResult, start: Instant, end: Instant) -> WrappedResult {
    let query_time_ms = end.saturating_duration_since(start).as_millis() as u64;

    WrappedResult {
        result,
        metadata: Metadata {
            query_time_ms,
            timestamp: timestamp(),
            service_name: SERVICE_NAME.to_string(),
            service_version: SERVICE_VERSION.to_string(),
        },
    }
}

/// Current UTC time as RFC 3339 with millisecond precision
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
