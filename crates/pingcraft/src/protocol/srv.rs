//! `_minecraft._tcp` SRV lookup for Java Edition hosts.
//!
//! A host without a usable record is contacted at the address and port the
//! caller gave.

use std::cmp::Reverse;
use std::fmt;
use std::net::IpAddr;

use hickory_resolver::TokioResolver;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use tracing::{debug, warn};

pub const SRV_PREFIX: &str = "_minecraft._tcp.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvRecord {
    pub priority: u16,
    pub weight: u16,
    /// Target host without the trailing dot; empty for "service not offered"
    pub target: String,
    pub port: u16,
}

/// Pick the endpoint to connect to: the best record, else `host:port`
pub fn srv_endpoint(host: &str, port: u16, records: &[SrvRecord]) -> (String, u16) {
    records
        .iter()
        .filter(|record| !record.target.is_empty())
        .min_by_key(|record| (record.priority, Reverse(record.weight)))
        .map_or_else(|| (host.to_string(), port), |record| (record.target.clone(), record.port))
}

#[derive(Clone)]
pub struct SrvResolver {
    resolver: TokioResolver,
}

impl SrvResolver {
    /// Resolver over the system DNS configuration, or public defaults when
    /// it cannot be read
    pub fn new() -> Self {
        let builder = TokioResolver::builder_tokio().unwrap_or_else(|error| {
            warn!("System DNS configuration unavailable, using defaults: {error}");
            TokioResolver::builder_with_config(
                ResolverConfig::default(),
                TokioConnectionProvider::default(),
            )
        });
        Self { resolver: builder.build() }
    }

    /// SRV records published for `host`; empty for IP literals and failed lookups
    pub async fn lookup(&self, host: &str) -> Vec<SrvRecord> {
        if host.parse::<IpAddr>().is_ok() {
            return Vec::new();
        }

        match self.resolver.srv_lookup(format!("{SRV_PREFIX}{host}")).await {
            Ok(lookup) => lookup
                .iter()
                .map(|srv| SrvRecord {
                    priority: srv.priority(),
                    weight: srv.weight(),
                    target: srv.target().to_utf8().trim_end_matches('.').to_string(),
                    port: srv.port(),
                })
                .collect(),
            Err(error) => {
                debug!("No SRV record for {}: {}", host, error);
                Vec::new()
            }
        }
    }

    /// Endpoint for a Java query to `host:port`
    pub async fn endpoint(&self, host: &str, port: u16) -> (String, u16) {
        srv_endpoint(host, port, &self.lookup(host).await)
    }
}

impl Default for SrvResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SrvResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SrvResolver").finish_non_exhaustive()
    }
}
