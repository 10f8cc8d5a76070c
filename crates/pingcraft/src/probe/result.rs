use serde::Serialize;

use crate::protocol::motd::strip_formatting;
use crate::protocol::{BedrockStatus, JavaStatus, ProbeRequest, Variant};

/// Version reported when a server does not name one
pub const UNKNOWN_VERSION: &str = "Unknown";

/// Player counts of an online server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Players {
    pub online: i64,
    pub max: i64,

    /// Sampled player names; Java only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<Vec<String>>,
}

/// Fields that only one variant carries.
///
/// Serialized flat next to the common fields; absent values are `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VariantDetails {
    Java {
        favicon: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Bedrock {
        gamemode: Option<String>,
        server_id: Option<String>,
    },
}

impl VariantDetails {
    /// Details with every field unset
    pub fn empty(variant: Variant) -> Self {
        match variant {
            Variant::Java => VariantDetails::Java { favicon: None },
            Variant::Bedrock => VariantDetails::Bedrock { gamemode: None, server_id: None },
        }
    }
}

/// Outcome of probing one server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub online: bool,

    /// Caller-side round trip in milliseconds
    pub ping_ms: Option<u64>,

    pub players: Option<Players>,
    pub version: Option<String>,
    pub motd: Option<String>,

    #[serde(flatten)]
    pub details: VariantDetails,

    pub host: String,
    pub port: u16,

    #[serde(rename = "type")]
    pub variant: Variant,

    pub error: Option<String>,
}

impl ProbeResult {
    /// Offline result carrying `error`
    pub fn offline(request: &ProbeRequest, error: impl Into<String>) -> Self {
        Self {
            online: false,
            ping_ms: None,
            players: None,
            version: None,
            motd: None,
            details: VariantDetails::empty(request.variant),
            host: request.host.clone(),
            port: request.port,
            variant: request.variant,
            error: Some(error.into()),
        }
    }

    /// Online result from a Java status payload
    pub fn java(request: &ProbeRequest, ping_ms: u64, status: JavaStatus) -> Self {
        Self {
            online: true,
            ping_ms: Some(ping_ms),
            players: Some(Players {
                online: status.players_online,
                max: status.players_max,
                sample: Some(status.sample),
            }),
            version: Some(known_version(status.version_name)),
            motd: Some(strip_formatting(&status.motd)),
            details: VariantDetails::Java { favicon: status.favicon },
            host: request.host.clone(),
            port: request.port,
            variant: Variant::Java,
            error: None,
        }
    }

    /// Online result from a Bedrock advertisement
    pub fn bedrock(request: &ProbeRequest, ping_ms: u64, status: BedrockStatus) -> Self {
        let motd = match status.motd_line2 {
            Some(line2) => format!("{}\n{}", status.motd_line1, line2),
            None => status.motd_line1,
        };

        Self {
            online: true,
            ping_ms: Some(ping_ms),
            players: Some(Players {
                online: status.players_online,
                max: status.players_max,
                sample: None,
            }),
            version: Some(known_version(Some(status.version))),
            motd: Some(strip_formatting(&motd)),
            details: VariantDetails::Bedrock {
                gamemode: status.game_mode,
                server_id: status.server_id,
            },
            host: request.host.clone(),
            port: request.port,
            variant: Variant::Bedrock,
            error: None,
        }
    }
}

fn known_version(name: Option<String>) -> String {
    name.filter(|name| !name.trim().is_empty()).unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}
