//! Error types for probing.
//!
//! `ValidationError` is the only error that leaves the crate through the
//! public entry points. `ProtocolError` is produced by status clients and is
//! always converted into an offline result by the prober.

use std::io;

use thiserror::Error;

/// Malformed, missing or out-of-range probe input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Parameter \"{0}\" is required")]
    MissingField(&'static str),
    #[error("Host must be a non-empty string")]
    InvalidHost,
    #[error("Port must be a valid number between 1 and 65535")]
    InvalidPort,
    #[error("Server type must be either \"java\" or \"bedrock\"")]
    InvalidVariant,
    #[error("Server entry must be an object with host, port and type")]
    InvalidTarget,
    #[error("Parameter \"servers\" must be an array of server objects")]
    BatchNotArray,
    #[error("Parameter \"servers\" must contain at least one server")]
    BatchEmpty,
    #[error("At most {max} servers can be queried at once")]
    BatchTooLarge { max: usize },
}

/// Network or protocol failure while talking to a server
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Failed to resolve {host}: {reason}")]
    Resolve { host: String, reason: String },
    #[error("Connection failed: {0}")]
    Io(#[from] io::Error),
    #[error("Server did not respond within {0} ms")]
    Timeout(u64),
    #[error("Invalid packet: {0}")]
    InvalidPacket(String),
    #[error("Invalid status payload: {0}")]
    Json(#[from] serde_json::Error),
}
