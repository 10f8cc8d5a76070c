use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;
use tracing::debug;

use super::result::ProbeResult;
use crate::error::ProtocolError;
use crate::handlers::Dispatcher;
use crate::protocol::{ProbeRequest, StatusClient, Variant};

/// Executes individual probes through a status client
#[derive(Clone)]
pub struct Prober {
    client: Arc<dyn StatusClient>,
}

impl Prober {
    pub fn new(client: Arc<dyn StatusClient>) -> Self {
        Self { client }
    }

    /// Probe one server. Always yields a result; unreachable servers are
    /// reported as offline.
    pub async fn probe(&self, host: &str, port: u16, variant: Variant, timeout_ms: u64) -> ProbeResult {
        let request = ProbeRequest { host: host.to_string(), port, variant, timeout_ms };
        Dispatcher::new(self.clone()).dispatch(&request).await
    }

    /// Probe a Java Edition server
    pub async fn probe_java(&self, request: &ProbeRequest) -> ProbeResult {
        let call = self.client.java_status(&request.host, request.port, request.timeout());
        match timed(request, call).await {
            Ok((ping_ms, status)) => ProbeResult::java(request, ping_ms, status),
            Err(error) => ProbeResult::offline(request, error),
        }
    }

    /// Probe a Bedrock Edition server
    pub async fn probe_bedrock(&self, request: &ProbeRequest) -> ProbeResult {
        let call = self.client.bedrock_status(&request.host, request.port, request.timeout());
        match timed(request, call).await {
            Ok((ping_ms, status)) => ProbeResult::bedrock(request, ping_ms, status),
            Err(error) => ProbeResult::offline(request, error),
        }
    }
}

/// Run `call` under the request timeout, measuring the round trip
async fn timed<T>(
    request: &ProbeRequest,
    call: impl Future<Output = Result<T, ProtocolError>>,
) -> Result<(u64, T), String> {
    let start = Instant::now();
    let outcome = timeout(request.timeout(), call).await;
    let ping_ms = round_ms(start.elapsed());

    match outcome {
        Ok(Ok(payload)) => {
            debug!("{} {}:{} online in {} ms", request.variant, request.host, request.port, ping_ms);
            Ok((ping_ms, payload))
        }
        Ok(Err(error)) => {
            debug!("{} {}:{} offline: {}", request.variant, request.host, request.port, error);
            Err(error.to_string())
        }
        Err(_) => {
            debug!("{} {}:{} timed out", request.variant, request.host, request.port);
            Err(ProtocolError::Timeout(request.timeout_ms).to_string())
        }
    }
}

/// Milliseconds rounded to the nearest whole millisecond
pub fn round_ms(elapsed: Duration) -> u64 {
    (elapsed.as_secs_f64() * 1000.0).round() as u64
}
