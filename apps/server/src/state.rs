use std::time::Instant;

use pingcraft::ProbeService;

/// Shared application state handed to every route
#[derive(Clone)]
pub struct AppState {
    pub service: ProbeService,
    pub started_at: Instant,
    pub environment: String,
}

impl AppState {
    pub fn new(service: ProbeService, environment: impl Into<String>) -> Self {
        Self { service, started_at: Instant::now(), environment: environment.into() }
    }
}
