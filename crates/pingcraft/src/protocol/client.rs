use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::srv::SrvResolver;
use super::{bedrock, java};
use crate::error::ProtocolError;

/// Status payload returned by a Java Edition server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JavaStatus {
    /// Version name, e.g. "1.21.1" or a proxy brand
    pub version_name: Option<String>,

    /// Protocol number advertised by the server
    pub protocol: Option<i64>,

    pub players_online: i64,
    pub players_max: i64,

    /// Names from the player sample, if the server sent one
    pub sample: Vec<String>,

    /// Description flattened to legacy text, formatting codes still present
    pub motd: String,

    /// Server icon as a `data:image/png;base64,` URI
    pub favicon: Option<String>,
}

/// Advertisement returned by a Bedrock Edition server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BedrockStatus {
    /// "MCPE" or "MCEE"
    pub edition: String,

    pub motd_line1: String,
    pub motd_line2: Option<String>,

    pub protocol: Option<i64>,
    pub version: String,

    pub players_online: i64,
    pub players_max: i64,

    pub server_id: Option<String>,
    pub game_mode: Option<String>,
}

/// Client capability for the two status protocols.
///
/// Implementations must honor `timeout` for the whole exchange and release
/// their socket before returning.
#[async_trait::async_trait]
pub trait StatusClient: Send + Sync {
    /// Query a Java Edition server
    async fn java_status(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<JavaStatus, ProtocolError>;

    /// Query a Bedrock Edition server
    async fn bedrock_status(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<BedrockStatus, ProtocolError>;
}

/// Status client speaking both protocols over the network
#[derive(Debug, Clone, Default)]
pub struct NetStatusClient {
    srv: SrvResolver,
}

impl NetStatusClient {
    pub fn new() -> Self {
        Self { srv: SrvResolver::new() }
    }
}

#[async_trait::async_trait]
impl StatusClient for NetStatusClient {
    async fn java_status(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<JavaStatus, ProtocolError> {
        tokio::time::timeout(timeout, java::query(&self.srv, host, port))
            .await
            .map_err(|_| ProtocolError::Timeout(timeout.as_millis() as u64))?
    }

    async fn bedrock_status(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<BedrockStatus, ProtocolError> {
        tokio::time::timeout(timeout, bedrock::query(host, port))
            .await
            .map_err(|_| ProtocolError::Timeout(timeout.as_millis() as u64))?
    }
}
