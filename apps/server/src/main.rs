#![warn(clippy::all, clippy::pedantic)]

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::middleware::{Logger, from_fn};
use actix_web::{App, HttpServer, web};
use pingcraft::{NetStatusClient, ProbeService};
use tracing::info;

mod config;
mod error;
mod middleware;
mod routes;
mod state;

use config::Config;
use error::AppError;
use logger::init_tracing;
use middleware::rate_limit::{self, RateLimits};
use middleware::security;
use state::AppState;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env();
    info!("{config}");

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port).parse()?;
    run_server(addr, config).await
}

async fn run_server(addr: SocketAddr, config: Config) -> Result<(), AppError> {
    let service = ProbeService::new(Arc::new(NetStatusClient::new()), config.probe);
    let state = web::Data::new(AppState::new(service, config.environment.clone()));
    let limits = web::Data::new(RateLimits::new(&config.rate_limit));

    info!(%addr, "Starting status API");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(limits.clone())
            .app_data(error::json_config())
            .app_data(error::query_config())
            .wrap(from_fn(rate_limit::global))
            .wrap(security::security_headers())
            .wrap(security::cors())
            .wrap(Logger::default())
            .configure(routes::routes)
            .default_service(web::to(routes::not_found))
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
