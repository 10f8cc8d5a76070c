//! Probe parameter validation.
//!
//! Turns untyped caller input into a canonical `ProbeRequest`. Nothing here
//! touches the network.

use serde_json::Value;

use crate::config::ProbeConfig;
use crate::error::ValidationError;
use crate::protocol::{ProbeRequest, RawTarget, Variant};

/// Validate and normalize raw probe parameters
pub fn validate(raw: &RawTarget, config: &ProbeConfig) -> Result<ProbeRequest, ValidationError> {
    let host = validate_host(raw.host.as_ref())?;
    let port = validate_port(raw.port.as_ref())?;
    let variant = validate_variant(raw.kind.as_ref())?;
    let timeout_ms = normalize_timeout(raw.timeout.as_ref(), config);

    Ok(ProbeRequest { host, port, variant, timeout_ms })
}

fn validate_host(value: Option<&Value>) -> Result<String, ValidationError> {
    match value {
        None => Err(ValidationError::MissingField("host")),
        Some(Value::String(host)) if host.is_empty() => Err(ValidationError::MissingField("host")),
        Some(Value::String(host)) => {
            let host = host.trim();
            if host.is_empty() { Err(ValidationError::InvalidHost) } else { Ok(host.to_string()) }
        }
        Some(_) => Err(ValidationError::InvalidHost),
    }
}

fn validate_port(value: Option<&Value>) -> Result<u16, ValidationError> {
    let port = match value {
        None => return Err(ValidationError::MissingField("port")),
        Some(Value::String(port)) if port.trim().is_empty() => {
            return Err(ValidationError::MissingField("port"));
        }
        Some(value) => integer_value(value).ok_or(ValidationError::InvalidPort)?,
    };

    u16::try_from(port).ok().filter(|port| *port >= 1).ok_or(ValidationError::InvalidPort)
}

fn validate_variant(value: Option<&Value>) -> Result<Variant, ValidationError> {
    match value {
        None => Err(ValidationError::MissingField("type")),
        Some(Value::String(kind)) if kind.trim().is_empty() => {
            Err(ValidationError::MissingField("type"))
        }
        Some(Value::String(kind)) => kind.parse(),
        Some(_) => Err(ValidationError::InvalidVariant),
    }
}

/// Clamp a requested timeout; anything unusable yields the default
fn normalize_timeout(value: Option<&Value>, config: &ProbeConfig) -> u64 {
    value
        .and_then(timeout_value)
        .map(|timeout_ms| config.clamp_timeout(timeout_ms))
        .unwrap_or(config.default_timeout_ms)
}

/// Integer from a JSON number or a numeric string
fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite() && float.fract() == 0.0)
                .map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Timeout read leniently: floats truncate, strings keep their leading integer
fn timeout_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number.as_f64().filter(|float| float.is_finite()).map(|float| float.trunc() as i64)
        }),
        Value::String(text) => leading_integer(text),
        _ => None,
    }
}

/// Optional sign and digits at the start of `text`, saturating on overflow
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let sign_len = usize::from(text.starts_with(['+', '-']));
    let digits = text[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let saturated = if text.starts_with('-') { i64::MIN } else { i64::MAX };
    Some(text[..sign_len + digits].parse().unwrap_or(saturated))
}
