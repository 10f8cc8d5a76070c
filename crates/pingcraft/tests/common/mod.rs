//! Shared helpers for pingcraft integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pingcraft::error::ProtocolError;
use pingcraft::protocol::{BedrockStatus, JavaStatus, StatusClient};
use pingcraft::{ProbeConfig, ProbeService};

/// How a scripted host behaves
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// Answers after the delay
    Online,
    /// Refuses the connection after the delay
    Refused,
    /// Never answers
    Hang,
}

/// Status client answering from a per-host script
#[derive(Default)]
pub struct MockClient {
    scripts: HashMap<String, (Duration, Behavior)>,
    calls: AtomicUsize,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: &str, delay: Duration, behavior: Behavior) -> Self {
        self.scripts.insert(host.to_string(), (delay, behavior));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn play(&self, host: &str) -> Result<(), ProtocolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let Some(&(delay, behavior)) = self.scripts.get(host) else {
            return Err(ProtocolError::Resolve {
                host: host.to_string(),
                reason: "unknown host".to_string(),
            });
        };

        tokio::time::sleep(delay).await;
        match behavior {
            Behavior::Online => Ok(()),
            Behavior::Refused => Err(ProtocolError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Connection refused",
            ))),
            Behavior::Hang => std::future::pending().await,
        }
    }
}

#[async_trait::async_trait]
impl StatusClient for MockClient {
    async fn java_status(
        &self,
        host: &str,
        _port: u16,
        _timeout: Duration,
    ) -> Result<JavaStatus, ProtocolError> {
        self.play(host).await?;
        Ok(java_status())
    }

    async fn bedrock_status(
        &self,
        host: &str,
        _port: u16,
        _timeout: Duration,
    ) -> Result<BedrockStatus, ProtocolError> {
        self.play(host).await?;
        Ok(bedrock_status())
    }
}

pub fn java_status() -> JavaStatus {
    JavaStatus {
        version_name: Some("Paper 1.21.1".to_string()),
        protocol: Some(767),
        players_online: 12,
        players_max: 100,
        sample: vec!["Steve".to_string(), "Alex".to_string()],
        motd: "§aHello §lWorld".to_string(),
        favicon: None,
    }
}

pub fn bedrock_status() -> BedrockStatus {
    BedrockStatus {
        edition: "MCPE".to_string(),
        motd_line1: "§bBedrock §fServer".to_string(),
        motd_line2: None,
        protocol: Some(712),
        version: "1.21.20".to_string(),
        players_online: 7,
        players_max: 40,
        server_id: Some("1234567890".to_string()),
        game_mode: Some("Survival".to_string()),
    }
}

/// A service over `client` with default configuration
pub fn service(client: Arc<MockClient>) -> ProbeService {
    ProbeService::new(client, ProbeConfig::default())
}
