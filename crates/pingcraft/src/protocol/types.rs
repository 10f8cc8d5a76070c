//! Protocol type definitions for pingcraft.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Server family to probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Java Edition, Server List Ping over TCP
    Java,
    /// Bedrock Edition, RakNet unconnected ping over UDP
    Bedrock,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Java => write!(f, "java"),
            Variant::Bedrock => write!(f, "bedrock"),
        }
    }
}

impl FromStr for Variant {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "java" => Ok(Variant::Java),
            "bedrock" => Ok(Variant::Bedrock),
            _ => Err(ValidationError::InvalidVariant),
        }
    }
}

/// Untyped probe parameters as received from a caller.
///
/// Every field is kept as a raw JSON value so type mismatches can be reported
/// by the validator instead of failing deserialization. Query-string input is
/// carried as JSON strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTarget {
    #[serde(default)]
    pub host: Option<Value>,

    #[serde(default)]
    pub port: Option<Value>,

    #[serde(default, rename = "type")]
    pub kind: Option<Value>,

    #[serde(default)]
    pub timeout: Option<Value>,
}

impl RawTarget {
    /// Build a raw target from string parameters, e.g. a query string
    pub fn from_strings(
        host: Option<String>,
        port: Option<String>,
        kind: Option<String>,
        timeout: Option<String>,
    ) -> Self {
        Self {
            host: host.map(Value::String),
            port: port.map(Value::String),
            kind: kind.map(Value::String),
            timeout: timeout.map(Value::String),
        }
    }
}

/// A validated, canonical probe request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRequest {
    /// Hostname or IP address, trimmed
    pub host: String,

    /// Port in `1..=65535`
    pub port: u16,

    /// Protocol variant to use
    pub variant: Variant,

    /// Timeout in milliseconds, already clamped
    pub timeout_ms: u64,
}

impl ProbeRequest {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_variant_parsing_is_case_insensitive() {
        assert_eq!("JAVA".parse::<Variant>(), Ok(Variant::Java));
        assert_eq!(" Bedrock ".parse::<Variant>(), Ok(Variant::Bedrock));
        assert_eq!("pocket".parse::<Variant>(), Err(ValidationError::InvalidVariant));
    }

    #[test]
    fn test_raw_target_reads_type_field() {
        let raw: RawTarget =
            serde_json::from_value(json!({ "host": "a", "port": 1, "type": "java" })).unwrap();
        assert_eq!(raw.kind, Some(json!("java")));
        assert_eq!(raw.timeout, None);
    }

    #[test]
    fn test_raw_target_null_is_absent() {
        let raw: RawTarget = serde_json::from_value(json!({ "host": null })).unwrap();
        assert_eq!(raw.host, None);
    }
}
