use actix_web::middleware::from_fn;
use actix_web::{HttpResponse, get, post, web};
use pingcraft::RawTarget;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::ApiResponse;
use crate::error::ApiError;
use crate::middleware::rate_limit;
use crate::state::AppState;

macros_utils::routes! {
    route status_query_route,
    route status_body_route,
    route batch_route,
    route ping_route,
}

/// Probe parameters as they arrive in a query string
#[derive(Debug, Deserialize)]
pub struct ProbeQuery {
    host: Option<String>,
    port: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    timeout: Option<String>,
}

impl From<ProbeQuery> for RawTarget {
    fn from(query: ProbeQuery) -> Self {
        RawTarget::from_strings(query.host, query.port, query.kind, query.timeout)
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchBody {
    #[serde(default)]
    servers: Option<Value>,
}

/// Full status of one server, parameters in the query string
#[get("/status")]
pub async fn status_query_route(
    state: web::Data<AppState>,
    query: web::Query<ProbeQuery>,
) -> Result<HttpResponse, ApiError> {
    status(&state, query.into_inner().into()).await
}

/// Full status of one server, parameters in a JSON body
#[post("/status")]
pub async fn status_body_route(
    state: web::Data<AppState>,
    body: web::Json<RawTarget>,
) -> Result<HttpResponse, ApiError> {
    status(&state, body.into_inner()).await
}

async fn status(state: &AppState, target: RawTarget) -> Result<HttpResponse, ApiError> {
    let wrapped = state.service.status(&target).await?;
    info!(
        host = %wrapped.result.host,
        port = wrapped.result.port,
        online = wrapped.result.online,
        "Status query"
    );
    Ok(HttpResponse::Ok().json(ApiResponse::new(wrapped)))
}

/// Status of up to ten servers at once
#[post("/batch", wrap = "from_fn(rate_limit::batch)")]
pub async fn batch_route(
    state: web::Data<AppState>,
    body: web::Json<BatchBody>,
) -> Result<HttpResponse, ApiError> {
    let batch = state.service.batch(body.servers.as_ref()).await?;
    info!(total = batch.total, "Batch query");
    Ok(HttpResponse::Ok().json(ApiResponse::new(batch)))
}

/// Reachability and latency only
#[get("/ping", wrap = "from_fn(rate_limit::ping)")]
pub async fn ping_route(
    state: web::Data<AppState>,
    query: web::Query<ProbeQuery>,
) -> Result<HttpResponse, ApiError> {
    let summary = state.service.ping(&query.into_inner().into()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(summary)))
}
