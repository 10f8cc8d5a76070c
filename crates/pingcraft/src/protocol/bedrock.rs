//! Bedrock Edition status via RakNet unconnected ping.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::net::UdpSocket;
use tracing::debug;

use super::client::BedrockStatus;
use super::java::resolve;
use crate::error::ProtocolError;

/// RakNet offline message magic
pub const MAGIC: [u8; 16] = [
    0x00, 0xff, 0xff, 0x00, 0xfe, 0xfe, 0xfe, 0xfe, 0xfd, 0xfd, 0xfd, 0xfd, 0x12, 0x34, 0x56, 0x78,
];

pub const UNCONNECTED_PING: u8 = 0x01;
pub const UNCONNECTED_PONG: u8 = 0x1c;

/// id + time + server guid + magic
const PONG_HEADER_LEN: usize = 1 + 8 + 8 + 16;

const MAX_DATAGRAM_LEN: usize = 4096;

/// Perform one unconnected ping exchange with a Bedrock server
pub(crate) async fn query(host: &str, port: u16) -> Result<BedrockStatus, ProtocolError> {
    let addrs = resolve(host, port).await?;
    let Some(addr) = addrs.iter().copied().find(SocketAddr::is_ipv4).or(addrs.first().copied())
    else {
        return Err(ProtocolError::Resolve {
            host: host.to_string(),
            reason: "no addresses found".to_string(),
        });
    };
    debug!("Bedrock status query to {} ({})", host, addr);

    let local: SocketAddr = match addr {
        SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
    };
    let socket = UdpSocket::bind(local).await?;
    socket.connect(addr).await?;

    let timestamp =
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as i64;
    socket.send(&ping_packet(timestamp, rand::random())).await?;

    let mut buf = vec![0u8; MAX_DATAGRAM_LEN];
    loop {
        let len = socket.recv(&mut buf).await?;
        match buf.first() {
            Some(&UNCONNECTED_PONG) => return parse_pong(&buf[..len]),
            _ => debug!("Ignoring {} byte datagram from {}", len, addr),
        }
    }
}

/// Build an unconnected ping packet
pub fn ping_packet(timestamp: i64, client_guid: i64) -> Vec<u8> {
    let mut packet = Vec::with_capacity(33);
    packet.push(UNCONNECTED_PING);
    packet.extend_from_slice(&timestamp.to_be_bytes());
    packet.extend_from_slice(&MAGIC);
    packet.extend_from_slice(&client_guid.to_be_bytes());
    packet
}

/// Parse an unconnected pong datagram
pub fn parse_pong(datagram: &[u8]) -> Result<BedrockStatus, ProtocolError> {
    if datagram.first() != Some(&UNCONNECTED_PONG) {
        return Err(ProtocolError::InvalidPacket("expected unconnected pong".to_string()));
    }
    if datagram.len() < PONG_HEADER_LEN + 2 {
        return Err(ProtocolError::InvalidPacket("pong is too short".to_string()));
    }
    if datagram[17..PONG_HEADER_LEN] != MAGIC {
        return Err(ProtocolError::InvalidPacket("pong magic mismatch".to_string()));
    }

    let len =
        u16::from_be_bytes([datagram[PONG_HEADER_LEN], datagram[PONG_HEADER_LEN + 1]]) as usize;
    let start = PONG_HEADER_LEN + 2;
    let advertisement = datagram
        .get(start..start + len)
        .ok_or_else(|| ProtocolError::InvalidPacket("advertisement exceeds pong".to_string()))?;

    parse_advertisement(&String::from_utf8_lossy(advertisement))
}

/// Parse `edition;motd1;protocol;version;online;max;serverId;motd2;gameMode;...`
pub fn parse_advertisement(advertisement: &str) -> Result<BedrockStatus, ProtocolError> {
    let fields: Vec<&str> = advertisement.split(';').collect();
    if fields.len() < 6 {
        return Err(ProtocolError::InvalidPacket(format!(
            "advertisement has {} fields, expected at least 6",
            fields.len()
        )));
    }

    let non_empty = |index: usize| {
        fields.get(index).map(|field| field.trim()).filter(|field| !field.is_empty())
    };
    let number = |index: usize| non_empty(index).and_then(|field| field.parse::<i64>().ok());

    Ok(BedrockStatus {
        edition: fields[0].to_string(),
        motd_line1: fields[1].to_string(),
        motd_line2: non_empty(7).map(str::to_string),
        protocol: number(2),
        version: fields[3].to_string(),
        players_online: number(4).unwrap_or_default(),
        players_max: number(5).unwrap_or_default(),
        server_id: non_empty(6).map(str::to_string),
        game_mode: non_empty(8).map(str::to_string),
    })
}
