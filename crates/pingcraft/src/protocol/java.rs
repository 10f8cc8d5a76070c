//! Java Edition Server List Ping.
//!
//! One exchange: handshake (next state = status), status request, one status
//! response frame carrying a JSON document.

use std::net::SocketAddr;

use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, lookup_host};
use tracing::debug;

use super::client::JavaStatus;
use super::motd::flatten_chat;
use super::srv::SrvResolver;
use crate::error::ProtocolError;

/// Protocol version sent in the handshake; -1 asks for the server's own
pub const PROTOCOL_VERSION: i32 = -1;

/// Handshake `next state` value selecting the status protocol
pub const NEXT_STATE_STATUS: i32 = 1;

/// Largest status frame accepted, favicons included
pub const MAX_FRAME_LEN: usize = 2 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct RawStatus {
    version: Option<RawVersion>,
    players: Option<RawPlayers>,
    description: Option<Value>,
    favicon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawVersion {
    name: Option<String>,
    protocol: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawPlayers {
    #[serde(default)]
    online: i64,
    #[serde(default)]
    max: i64,
    sample: Option<Vec<RawPlayer>>,
}

#[derive(Debug, Deserialize)]
struct RawPlayer {
    #[serde(default)]
    name: String,
}

impl From<RawStatus> for JavaStatus {
    fn from(raw: RawStatus) -> Self {
        let (version_name, protocol) = match raw.version {
            Some(version) => (version.name, version.protocol),
            None => (None, None),
        };
        let (players_online, players_max, sample) = match raw.players {
            Some(players) => (
                players.online,
                players.max,
                players
                    .sample
                    .unwrap_or_default()
                    .into_iter()
                    .map(|player| player.name)
                    .collect(),
            ),
            None => (0, 0, Vec::new()),
        };

        JavaStatus {
            version_name,
            protocol,
            players_online,
            players_max,
            sample,
            motd: raw.description.as_ref().map(flatten_chat).unwrap_or_default(),
            favicon: raw.favicon,
        }
    }
}

/// Resolve `host:port` to every socket address it has
pub(crate) async fn resolve(host: &str, port: u16) -> Result<Vec<SocketAddr>, ProtocolError> {
    let addrs: Vec<SocketAddr> = lookup_host((host, port))
        .await
        .map_err(|e| ProtocolError::Resolve { host: host.to_string(), reason: e.to_string() })?
        .collect();

    if addrs.is_empty() {
        return Err(ProtocolError::Resolve {
            host: host.to_string(),
            reason: "no addresses found".to_string(),
        });
    }
    Ok(addrs)
}

/// Connect to the first address of `host:port` that accepts
pub(crate) async fn connect(host: &str, port: u16) -> Result<TcpStream, ProtocolError> {
    let mut last_error = None;
    for addr in resolve(host, port).await? {
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                debug!("Java status query to {} ({})", host, addr);
                return Ok(stream);
            }
            Err(error) => {
                debug!("Connecting to {} ({}) failed: {}", host, addr, error);
                last_error = Some(error);
            }
        }
    }

    Err(last_error.map_or_else(
        || ProtocolError::Resolve { host: host.to_string(), reason: "no addresses found".to_string() },
        ProtocolError::Io,
    ))
}

/// Perform one status exchange with a Java server, following its SRV record
pub(crate) async fn query(
    srv: &SrvResolver,
    host: &str,
    port: u16,
) -> Result<JavaStatus, ProtocolError> {
    let (target, target_port) = srv.endpoint(host, port).await;
    if target != host || target_port != port {
        debug!("SRV record maps {}:{} to {}:{}", host, port, target, target_port);
    }

    let mut stream = connect(&target, target_port).await?;
    stream.write_all(&handshake_packet(host, port)).await?;
    stream.write_all(&status_request_packet()).await?;
    stream.flush().await?;

    let frame = read_frame(&mut stream).await?;
    parse_status_frame(&frame)
}

/// Append `value` as a protocol VarInt
pub fn write_varint(buf: &mut Vec<u8>, value: i32) {
    let mut value = value as u32;
    loop {
        if value & !0x7F == 0 {
            buf.push(value as u8);
            return;
        }
        buf.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
}

/// Decode a VarInt from the start of `bytes`, returning it and its length
pub fn decode_varint(bytes: &[u8]) -> Result<(i32, usize), ProtocolError> {
    let mut value: u32 = 0;
    for (position, byte) in bytes.iter().take(5).enumerate() {
        value |= u32::from(byte & 0x7F) << (7 * position);
        if byte & 0x80 == 0 {
            return Ok((value as i32, position + 1));
        }
    }

    if bytes.len() < 5 {
        Err(ProtocolError::InvalidPacket("truncated VarInt".to_string()))
    } else {
        Err(ProtocolError::InvalidPacket("VarInt is too long".to_string()))
    }
}

async fn read_varint<R: AsyncRead + Unpin>(reader: &mut R) -> Result<i32, ProtocolError> {
    let mut value: u32 = 0;
    for position in 0..5 {
        let byte = reader.read_u8().await?;
        value |= u32::from(byte & 0x7F) << (7 * position);
        if byte & 0x80 == 0 {
            return Ok(value as i32);
        }
    }
    Err(ProtocolError::InvalidPacket("VarInt is too long".to_string()))
}

/// Prefix a packet body with its VarInt length
pub fn frame(body: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(body.len() + 5);
    write_varint(&mut packet, body.len() as i32);
    packet.extend_from_slice(body);
    packet
}

/// Handshake packet selecting the status state
pub fn handshake_packet(host: &str, port: u16) -> Vec<u8> {
    let mut body = Vec::with_capacity(host.len() + 16);
    write_varint(&mut body, 0x00);
    write_varint(&mut body, PROTOCOL_VERSION);
    write_varint(&mut body, host.len() as i32);
    body.extend_from_slice(host.as_bytes());
    body.extend_from_slice(&port.to_be_bytes());
    write_varint(&mut body, NEXT_STATE_STATUS);
    frame(&body)
}

pub fn status_request_packet() -> Vec<u8> {
    frame(&[0x00])
}

/// Read one length-prefixed frame
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let length = read_varint(reader).await?;
    if length <= 0 || length as usize > MAX_FRAME_LEN {
        return Err(ProtocolError::InvalidPacket(format!("frame length {length} out of range")));
    }

    let mut frame = vec![0u8; length as usize];
    reader.read_exact(&mut frame).await?;
    Ok(frame)
}

/// Parse the body of a status response frame (packet id + JSON string)
pub fn parse_status_frame(frame: &[u8]) -> Result<JavaStatus, ProtocolError> {
    let (packet_id, id_len) = decode_varint(frame)?;
    if packet_id != 0x00 {
        return Err(ProtocolError::InvalidPacket(format!(
            "unexpected packet id {packet_id:#04x}"
        )));
    }

    let rest = &frame[id_len..];
    let (json_len, len_len) = decode_varint(rest)?;
    let json = usize::try_from(json_len)
        .ok()
        .and_then(|len| rest.get(len_len..len_len + len))
        .ok_or_else(|| ProtocolError::InvalidPacket("status string exceeds frame".to_string()))?;

    let raw: RawStatus = serde_json::from_slice(json)?;
    Ok(raw.into())
}
