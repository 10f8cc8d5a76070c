//! Per-client fixed-window rate limiting.
//!
//! Four tiers share the same limiter type: `global` wraps the whole app,
//! `general` wraps the `/api/server` scope and `batch` / `ping` wrap their
//! own resources. A request passing through several tiers is counted by each.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::time::{Duration, Instant};

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use actix_web::middleware::Next;
use actix_web::{Error, HttpResponse, web};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::warn;

use crate::config::{RATE_LIMIT_WINDOW, RateLimitConfig};

/// Stale windows are swept once the table grows past this many clients
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePolicy {
    pub max_requests: u32,
    pub window: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Global,
    General,
    Batch,
    Ping,
}

impl Tier {
    fn message(self) -> &'static str {
        match self {
            Tier::Global => "Too many requests from this client, please slow down",
            Tier::General => "Too many requests, please try again later",
            Tier::Batch => "Too many batch requests, please try again later",
            Tier::Ping => "Too many ping requests, please try again later",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of counting one request against a limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
}

impl Decision {
    /// Whole seconds until the window resets, rounded up
    pub fn reset_secs(&self) -> u64 {
        self.reset_after.as_millis().div_ceil(1000) as u64
    }

    fn write_headers(&self, headers: &mut HeaderMap) {
        headers.insert(
            HeaderName::from_static("ratelimit-limit"),
            HeaderValue::from(self.limit),
        );
        headers.insert(
            HeaderName::from_static("ratelimit-remaining"),
            HeaderValue::from(self.remaining),
        );
        headers.insert(
            HeaderName::from_static("ratelimit-reset"),
            HeaderValue::from(self.reset_secs()),
        );
    }
}

pub struct RateLimiter {
    policy: RatePolicy,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(policy: RatePolicy) -> Self {
        Self { policy, windows: Mutex::new(HashMap::new()) }
    }

    pub async fn check(&self, client: IpAddr) -> Decision {
        self.check_at(client, Instant::now()).await
    }

    /// Count one request from `client` at `now`
    pub async fn check_at(&self, client: IpAddr, now: Instant) -> Decision {
        let RatePolicy { max_requests, window: length } = self.policy;
        let mut windows = self.windows.lock().await;

        if windows.len() >= SWEEP_THRESHOLD {
            windows.retain(|_, window| now.duration_since(window.started) < length);
        }

        let window = windows.entry(client).or_insert(Window { started: now, count: 0 });
        if now.duration_since(window.started) >= length {
            *window = Window { started: now, count: 0 };
        }

        let reset_after = length.saturating_sub(now.duration_since(window.started));
        if window.count >= max_requests {
            return Decision { allowed: false, limit: max_requests, remaining: 0, reset_after };
        }

        window.count += 1;
        Decision {
            allowed: true,
            limit: max_requests,
            remaining: max_requests - window.count,
            reset_after,
        }
    }
}

/// The four limiter tiers, shared by every worker
pub struct RateLimits {
    global: RateLimiter,
    general: RateLimiter,
    batch: RateLimiter,
    ping: RateLimiter,
}

impl RateLimits {
    pub fn new(config: &RateLimitConfig) -> Self {
        let fixed =
            |max_requests| RateLimiter::new(RatePolicy { max_requests, window: RATE_LIMIT_WINDOW });

        Self {
            global: fixed(config.global_max),
            general: RateLimiter::new(RatePolicy {
                max_requests: config.general_max,
                window: config.general_window,
            }),
            batch: fixed(config.batch_max),
            ping: fixed(config.ping_max),
        }
    }

    fn limiter(&self, tier: Tier) -> &RateLimiter {
        match tier {
            Tier::Global => &self.global,
            Tier::General => &self.general,
            Tier::Batch => &self.batch,
            Tier::Ping => &self.ping,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitBody {
    success: bool,
    error: &'static str,
    message: &'static str,
    retry_after: u64,
    limit: u32,
    remaining: u32,
    reset_time: String,
}

fn too_many_requests(tier: Tier, decision: &Decision) -> HttpResponse {
    let reset_time = Utc::now()
        + chrono::Duration::from_std(decision.reset_after)
            .unwrap_or_else(|_| chrono::Duration::zero());

    let mut response = HttpResponse::TooManyRequests()
        .insert_header((header::RETRY_AFTER, decision.reset_secs()))
        .json(RateLimitBody {
            success: false,
            error: "Too many requests",
            message: tier.message(),
            retry_after: decision.reset_secs(),
            limit: decision.limit,
            remaining: decision.remaining,
            reset_time: reset_time.to_rfc3339_opts(SecondsFormat::Millis, true),
        });
    decision.write_headers(response.headers_mut());
    response
}

async fn enforce<B: MessageBody + 'static>(
    tier: Tier,
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    let Some(limits) = req.app_data::<web::Data<RateLimits>>().cloned() else {
        return next.call(req).await.map(ServiceResponse::map_into_left_body);
    };

    let client = req.peer_addr().map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |addr| addr.ip());
    let decision = limits.limiter(tier).check(client).await;

    if !decision.allowed {
        warn!(?tier, %client, path = req.path(), "Rate limit exceeded");
        let response = too_many_requests(tier, &decision);
        return Ok(req.into_response(response).map_into_right_body());
    }

    let mut response = next.call(req).await?;
    // innermost tier reports its own budget
    if !response.headers().contains_key("ratelimit-limit") {
        decision.write_headers(response.headers_mut());
    }
    Ok(response.map_into_left_body())
}

pub async fn global(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody + 'static>, Error> {
    enforce(Tier::Global, req, next).await
}

pub async fn general(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody + 'static>, Error> {
    enforce(Tier::General, req, next).await
}

pub async fn batch(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody + 'static>, Error> {
    enforce(Tier::Batch, req, next).await
}

pub async fn ping(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody + 'static>, Error> {
    enforce(Tier::Ping, req, next).await
}
