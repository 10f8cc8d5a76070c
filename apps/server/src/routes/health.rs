use std::time::Duration;

use actix_web::{HttpResponse, get, web};
use pingcraft::handlers::timestamp;
use pingcraft::{SERVICE_NAME, SERVICE_VERSION};
use serde::Serialize;
use sysinfo::{ProcessExt, System, SystemExt, get_current_pid};

use crate::error::ApiError;
use crate::state::AppState;

macros_utils::routes! {
    route health_route,
}

#[derive(Debug, Serialize)]
struct Health {
    success: bool,
    status: &'static str,
    timestamp: String,
    uptime: Uptime,
    memory: Memory,
    environment: String,
    api: ApiInfo,
}

#[derive(Debug, Serialize)]
struct Uptime {
    seconds: u64,
    human: String,
}

/// Process memory in bytes
#[derive(Debug, Serialize)]
struct Memory {
    resident: u64,
    #[serde(rename = "virtual")]
    virtual_: u64,
}

#[derive(Debug, Serialize)]
struct ApiInfo {
    name: &'static str,
    version: &'static str,
}

/// Health check route
/// Reports uptime and memory of the running process.
#[get("/health")]
pub async fn health_route(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let uptime = state.started_at.elapsed();

    Ok(HttpResponse::Ok().json(Health {
        success: true,
        status: "healthy",
        timestamp: timestamp(),
        uptime: Uptime { seconds: uptime.as_secs(), human: human_duration(uptime) },
        memory: process_memory()?,
        environment: state.environment.clone(),
        api: ApiInfo { name: SERVICE_NAME, version: SERVICE_VERSION },
    }))
}

fn process_memory() -> Result<Memory, ApiError> {
    let pid = get_current_pid().map_err(|err| ApiError::Internal(err.to_string()))?;

    let mut system = System::new();
    system.refresh_process(pid);
    let process = system
        .process(pid)
        .ok_or_else(|| ApiError::Internal(format!("process {pid} not found")))?;

    Ok(Memory { resident: process.memory(), virtual_: process.virtual_memory() })
}

/// Render as `1h 2m 3s`, leading zero units omitted
fn human_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, secs % 3600 / 60, secs % 60);

    match (hours, minutes) {
        (0, 0) => format!("{seconds}s"),
        (0, _) => format!("{minutes}m {seconds}s"),
        _ => format!("{hours}h {minutes}m {seconds}s"),
    }
}
