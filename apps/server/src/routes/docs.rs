use actix_web::{HttpResponse, Responder, get};
use pingcraft::config::{DEFAULT_TIMEOUT_MS, MAX_BATCH_SIZE, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};
use pingcraft::{SERVICE_NAME, SERVICE_VERSION};
use serde_json::json;

macros_utils::routes! {
    route docs_route,
}

/// Static description of the API surface
#[get("/docs")]
pub async fn docs_route() -> impl Responder {
    let target = json!({
        "host": "Server hostname or IP address (required)",
        "port": "Server port, 1-65535 (required)",
        "type": "Server edition, \"java\" or \"bedrock\" (required)",
        "timeout": format!(
            "Probe timeout in ms (optional, default {DEFAULT_TIMEOUT_MS}, clamped to {MIN_TIMEOUT_MS}-{MAX_TIMEOUT_MS})"
        ),
    });

    HttpResponse::Ok().json(json!({
        "name": SERVICE_NAME,
        "version": SERVICE_VERSION,
        "description": "Minecraft Java and Bedrock server status API",
        "endpoints": {
            "GET /api/server/status": {
                "description": "Full status of one server",
                "query": target,
                "example": "/api/server/status?host=play.example.net&port=25565&type=java",
            },
            "POST /api/server/status": {
                "description": "Full status of one server",
                "body": target,
            },
            "POST /api/server/batch": {
                "description": format!("Status of up to {MAX_BATCH_SIZE} servers, probed concurrently"),
                "body": { "servers": [target] },
            },
            "GET /api/server/ping": {
                "description": "Reachability and latency of one server",
                "query": target,
            },
            "GET /api/health": { "description": "Service health" },
            "GET /api/docs": { "description": "This document" },
        },
        "rateLimits": {
            "global": "500 requests per minute per client",
            "general": "100 requests per minute per client on /api/server",
            "batch": "10 requests per minute per client",
            "ping": "200 requests per minute per client",
        },
    }))
}
