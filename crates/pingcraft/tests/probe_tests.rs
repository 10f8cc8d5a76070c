//! Single-target probing through the service and the prober

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{Behavior, MockClient, service};
use pingcraft::probe::VariantDetails;
use pingcraft::protocol::{NetStatusClient, RawTarget, Variant};
use pingcraft::{Prober, ValidationError};
use serde_json::json;
use tokio::net::TcpListener;

fn target(host: &str, port: u16, kind: &str) -> RawTarget {
    RawTarget {
        host: Some(json!(host)),
        port: Some(json!(port)),
        kind: Some(json!(kind)),
        timeout: None,
    }
}

#[tokio::test]
async fn test_java_online_result() {
    let _ = tracing_subscriber::fmt::try_init();

    let client =
        Arc::new(MockClient::new().with_host("java.test", Duration::ZERO, Behavior::Online));
    let wrapped = service(client).status(&target("java.test", 25565, "java")).await.unwrap();
    let result = wrapped.result;

    assert!(result.online);
    assert_eq!(result.error, None);
    assert!(result.ping_ms.is_some());
    assert_eq!(result.version.as_deref(), Some("Paper 1.21.1"));
    assert_eq!(result.motd.as_deref(), Some("Hello World"));

    let players = result.players.unwrap();
    assert_eq!((players.online, players.max), (12, 100));
    assert_eq!(players.sample, Some(vec!["Steve".to_string(), "Alex".to_string()]));
    assert_eq!(result.details, VariantDetails::Java { favicon: None });
}

#[tokio::test]
async fn test_bedrock_online_result() {
    let client =
        Arc::new(MockClient::new().with_host("bedrock.test", Duration::ZERO, Behavior::Online));
    let result =
        service(client).status(&target("bedrock.test", 19132, "Bedrock")).await.unwrap().result;

    assert!(result.online);
    assert_eq!(result.variant, Variant::Bedrock);
    assert_eq!(result.motd.as_deref(), Some("Bedrock Server"));
    assert_eq!(result.players.unwrap().sample, None);
    assert_eq!(
        result.details,
        VariantDetails::Bedrock {
            gamemode: Some("Survival".to_string()),
            server_id: Some("1234567890".to_string()),
        }
    );
}

#[tokio::test]
async fn test_refused_connection_is_offline_not_error() {
    let client =
        Arc::new(MockClient::new().with_host("down.test", Duration::ZERO, Behavior::Refused));
    let wrapped = service(client).status(&target("down.test", 25565, "java")).await.unwrap();

    let value = serde_json::to_value(&wrapped).unwrap();
    assert_eq!(value["online"], false);
    assert_eq!(value["pingMs"], json!(null));
    assert_eq!(value["players"], json!(null));
    assert_eq!(value["version"], json!(null));
    assert_eq!(value["motd"], json!(null));
    assert!(!value["error"].as_str().unwrap().is_empty());
    assert!(value["metadata"]["timestamp"].is_string());
}

#[tokio::test(start_paused = true)]
async fn test_hanging_server_times_out_as_offline() {
    let client = Arc::new(MockClient::new().with_host("slow.test", Duration::ZERO, Behavior::Hang));
    let mut raw = target("slow.test", 25565, "java");
    raw.timeout = Some(json!(1500));

    let result = service(client).status(&raw).await.unwrap().result;
    assert!(!result.online);
    assert!(result.error.unwrap().contains("1500 ms"));
}

#[tokio::test(start_paused = true)]
async fn test_slow_answer_within_timeout_is_online() {
    let client = Arc::new(MockClient::new().with_host(
        "slow.test",
        Duration::from_millis(4_000),
        Behavior::Online,
    ));
    let result = service(client).status(&target("slow.test", 25565, "java")).await.unwrap().result;
    assert!(result.online);
}

#[tokio::test]
async fn test_validation_happens_before_probing() {
    let client = Arc::new(MockClient::new());
    let service = service(client.clone());

    let mut raw = target("java.test", 25565, "java");
    raw.port = Some(json!(0));
    assert_eq!(service.status(&raw).await.unwrap_err(), ValidationError::InvalidPort);

    raw.port = None;
    assert_eq!(service.ping(&raw).await.unwrap_err(), ValidationError::MissingField("port"));

    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_ping_and_status_agree_on_offline() {
    let client =
        Arc::new(MockClient::new().with_host("down.test", Duration::ZERO, Behavior::Refused));
    let service = service(client);
    let raw = target("down.test", 19132, "bedrock");

    let status = service.status(&raw).await.unwrap().result;
    let ping = service.ping(&raw).await.unwrap();

    assert!(!status.online);
    assert!(!ping.online);
    assert_eq!(status.ping_ms, ping.ping_ms);
    assert_eq!((ping.host.as_str(), ping.port, ping.variant), ("down.test", 19132, Variant::Bedrock));
}

#[tokio::test]
async fn test_prober_probe_by_parts() {
    let client =
        Arc::new(MockClient::new().with_host("java.test", Duration::ZERO, Behavior::Online));
    let prober = Prober::new(client);

    let online = prober.probe("java.test", 25565, Variant::Java, 2000).await;
    assert!(online.online);

    let unknown = prober.probe("nowhere.test", 25565, Variant::Java, 2000).await;
    assert!(!unknown.online);
    assert!(unknown.error.unwrap().contains("nowhere.test"));
}

#[tokio::test]
async fn test_prober_probe_follows_the_variant() {
    let client = Arc::new(
        MockClient::new()
            .with_host("java.test", Duration::ZERO, Behavior::Online)
            .with_host("bedrock.test", Duration::ZERO, Behavior::Online),
    );
    let prober = Prober::new(client);

    let bedrock = prober.probe("bedrock.test", 19132, Variant::Bedrock, 2000).await;
    assert_eq!(bedrock.variant, Variant::Bedrock);
    assert!(matches!(bedrock.details, VariantDetails::Bedrock { .. }));
    assert_eq!(bedrock.version.as_deref(), Some("1.21.20"));

    let java = prober.probe("java.test", 25565, Variant::Java, 2000).await;
    assert!(matches!(java.details, VariantDetails::Java { .. }));
    assert_eq!(java.version.as_deref(), Some("Paper 1.21.1"));
}

#[tokio::test]
async fn test_real_refused_connection_is_offline() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    drop(listener);

    let prober = Prober::new(Arc::new(NetStatusClient::new()));
    let result = prober.probe("127.0.0.1", port, Variant::Java, 2000).await;

    assert!(!result.online);
    assert_eq!(result.ping_ms, None);
    assert_eq!(result.players, None);
    assert!(!result.error.unwrap_or_default().is_empty());
    Ok(())
}
