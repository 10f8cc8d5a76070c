use actix_web::middleware::from_fn;
use actix_web::{HttpRequest, HttpResponse, web};
use pingcraft::handlers::timestamp;
use serde::Serialize;
use serde_json::json;

use crate::middleware::rate_limit;

mod docs;
mod health;
mod server;

/// Success envelope shared by the API routes
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { success: true, data }
    }
}

const AVAILABLE_ENDPOINTS: [&str; 6] = [
    "GET /api/server/status",
    "POST /api/server/status",
    "POST /api/server/batch",
    "GET /api/server/ping",
    "GET /api/health",
    "GET /api/docs",
];

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(health::routes)
            .configure(docs::routes)
            .service(
                web::scope("/server")
                    .wrap(from_fn(rate_limit::general))
                    .configure(server::routes),
            ),
    );
}

/// Fallback for every unmatched method and path
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "error": "Endpoint not found",
        "message": format!("{} {} does not exist", req.method(), req.path()),
        "availableEndpoints": AVAILABLE_ENDPOINTS,
        "timestamp": timestamp(),
    }))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;
    use std::time::Duration;

    use pingcraft::error::ProtocolError;
    use pingcraft::protocol::{BedrockStatus, JavaStatus, StatusClient};
    use pingcraft::{ProbeConfig, ProbeService};

    use crate::state::AppState;

    /// Answers for `java.test` and `bedrock.test`, refuses everything else
    pub struct StubClient;

    fn refuse(host: &str) -> ProtocolError {
        ProtocolError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            format!("{host} refused the connection"),
        ))
    }

    #[async_trait::async_trait]
    impl StatusClient for StubClient {
        async fn java_status(
            &self,
            host: &str,
            _port: u16,
            _timeout: Duration,
        ) -> Result<JavaStatus, ProtocolError> {
            if host != "java.test" {
                return Err(refuse(host));
            }
            Ok(JavaStatus {
                version_name: Some("1.21.1".to_string()),
                protocol: Some(767),
                players_online: 1,
                players_max: 20,
                sample: vec!["Steve".to_string()],
                motd: "§aA Minecraft Server".to_string(),
                favicon: None,
            })
        }

        async fn bedrock_status(
            &self,
            host: &str,
            _port: u16,
            _timeout: Duration,
        ) -> Result<BedrockStatus, ProtocolError> {
            if host != "bedrock.test" {
                return Err(refuse(host));
            }
            Ok(BedrockStatus {
                edition: "MCPE".to_string(),
                motd_line1: "Bedrock".to_string(),
                version: "1.21.20".to_string(),
                players_max: 10,
                ..Default::default()
            })
        }
    }

    pub fn state() -> AppState {
        AppState::new(ProbeService::new(Arc::new(StubClient), ProbeConfig::default()), "test")
    }

    /// Initialise the full app, middleware included, over the stub client
    macro_rules! test_app {
        () => {
            test_app!(crate::config::RateLimitConfig::default())
        };
        ($limits:expr) => {
            actix_web::test::init_service(
                actix_web::App::new()
                    .app_data(actix_web::web::Data::new(crate::routes::testing::state()))
                    .app_data(actix_web::web::Data::new(
                        crate::middleware::rate_limit::RateLimits::new(&$limits),
                    ))
                    .app_data(crate::error::json_config())
                    .app_data(crate::error::query_config())
                    .wrap(actix_web::middleware::from_fn(crate::middleware::rate_limit::global))
                    .wrap(crate::middleware::security::security_headers())
                    .wrap(crate::middleware::security::cors())
                    .configure(crate::routes::routes)
                    .default_service(actix_web::web::to(crate::routes::not_found)),
            )
            .await
        };
    }

    pub(crate) use test_app;
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;

    use super::testing::test_app;
    use crate::config::RateLimitConfig;

    #[actix_web::test]
    async fn test_unknown_path_is_json_404() {
        let app = test_app!();
        let req = test::TestRequest::get().uri("/api/nowhere").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Endpoint not found");
        assert_eq!(body["availableEndpoints"].as_array().unwrap().len(), 6);
    }

    #[actix_web::test]
    async fn test_wrong_method_is_404() {
        let app = test_app!();
        let req = test::TestRequest::delete().uri("/api/server/status").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_general_tier_covers_server_scope_only() {
        let app = test_app!(RateLimitConfig { general_max: 2, ..RateLimitConfig::default() });
        let status = || {
            test::TestRequest::get()
                .uri("/api/server/status?host=java.test&port=25565&type=java")
                .peer_addr("10.2.2.2:5000".parse().unwrap())
                .to_request()
        };

        assert_eq!(test::call_service(&app, status()).await.status(), StatusCode::OK);
        assert_eq!(test::call_service(&app, status()).await.status(), StatusCode::OK);
        let resp = test::call_service(&app, status()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(resp.headers().get("ratelimit-remaining").unwrap(), "0");

        let health = test::TestRequest::get()
            .uri("/api/health")
            .peer_addr("10.2.2.2:5000".parse().unwrap())
            .to_request();
        assert_eq!(test::call_service(&app, health).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_global_tier_covers_everything() {
        let app = test_app!(RateLimitConfig { global_max: 1, ..RateLimitConfig::default() });
        let docs = || {
            test::TestRequest::get()
                .uri("/api/docs")
                .peer_addr("10.3.3.3:5000".parse().unwrap())
                .to_request()
        };

        assert_eq!(test::call_service(&app, docs()).await.status(), StatusCode::OK);
        assert_eq!(test::call_service(&app, docs()).await.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
