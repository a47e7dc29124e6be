// Integration tests for `YamahaClient` using wiremock.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use yamaha_ctrl::{ClientConfig, DeviceStatus, Toggle, YamahaClient, YamahaError};

const MAIN: &str = "/YamahaExtendedControl/v1/main";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, YamahaClient) {
    let server = MockServer::start().await;
    let client = YamahaClient::new(server.uri()).unwrap();
    (server, client)
}

fn status_body() -> serde_json::Value {
    json!({
        "response_code": 0,
        "power": "on",
        "volume": 20,
        "max_volume": 60,
        "subwoofer_volume": -2,
        "pure_direct": false,
        "enhancer": true,
        "adaptive_drc": false,
        "extra_bass": true,
        "actual_volume": { "mode": "db", "value": -40.5, "unit": "dB" },
        "dialogue_level": 1,
        "tone_control": { "mode": "manual", "bass": -3, "treble": 5 }
    })
}

async fn mount_ok(server: &MockServer, endpoint: &str) {
    Mock::given(method("GET"))
        .and(path(format!("{MAIN}/{endpoint}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response_code": 0 })))
        .mount(server)
        .await;
}

/// Path and query of the single request the server received
///
/// Compared as a string so parameter order is checked too.
async fn only_request_target(server: &MockServer) -> String {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    let url = &requests[0].url;
    format!("{}?{}", url.path(), url.query().unwrap_or(""))
}

fn refused_host() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

// ── Status ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{MAIN}/getStatus")))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body()))
        .expect(1)
        .mount(&server)
        .await;

    let status: DeviceStatus = client.fetch_status().await.unwrap();

    assert_eq!(status.volume, 20);
    assert_eq!(status.max_volume, 60);
    assert_eq!(status.subwoofer_volume, -2);
    assert!(status.enhancer);
    assert!(status.extra_bass);
    assert!(!status.pure_direct);
    assert!(!status.adaptive_drc);
    assert_eq!(status.actual_volume.value, -40.5);
    assert_eq!(status.actual_volume.unit.as_deref(), Some("dB"));
    assert_eq!(status.dialogue_level, 1);
    assert_eq!(status.tone_control.mode, "manual");
    assert_eq!(status.tone_control.bass, -3);
    assert_eq!(status.tone_control.treble, 5);
}

#[tokio::test]
async fn test_fetch_status_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{MAIN}/getStatus")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = client.fetch_status().await.unwrap_err();
    assert!(matches!(err, YamahaError::EmptyResponse), "got {err:?}");
}

#[tokio::test]
async fn test_fetch_status_missing_field() {
    let (server, client) = setup().await;

    let mut body = status_body();
    body.as_object_mut().unwrap().remove("tone_control");

    Mock::given(method("GET"))
        .and(path(format!("{MAIN}/getStatus")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = client.fetch_status().await.unwrap_err();
    match err {
        YamahaError::Decode(source) => assert!(source.to_string().contains("tone_control")),
        other => panic!("expected Decode, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_status_not_json() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{MAIN}/getStatus")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let err = client.fetch_status().await.unwrap_err();
    assert!(matches!(err, YamahaError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn test_fetch_status_connection_refused() {
    let client = YamahaClient::new(refused_host()).unwrap();

    let err = client.fetch_status().await.unwrap_err();
    assert!(matches!(err, YamahaError::Network(_)), "got {err:?}");
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_send_command_builds_exact_url() {
    let (server, client) = setup().await;
    mount_ok(&server, "setVolume").await;

    client
        .send_command("setVolume", [("volume", "25")])
        .await
        .unwrap();

    assert_eq!(
        only_request_target(&server).await,
        format!("{MAIN}/setVolume?volume=25")
    );
}

#[tokio::test]
async fn test_send_command_accepts_maps() {
    let (server, client) = setup().await;
    mount_ok(&server, "setDialogueLevel").await;

    let params = BTreeMap::from([("value".to_string(), "2".to_string())]);
    client.send_command("setDialogueLevel", &params).await.unwrap();

    assert_eq!(
        only_request_target(&server).await,
        format!("{MAIN}/setDialogueLevel?value=2")
    );
}

#[tokio::test]
async fn test_send_command_invalid_endpoint() {
    let (server, client) = setup().await;

    let err = client
        .send_command("../system/setPower", [("power", "standby")])
        .await
        .unwrap_err();

    assert!(matches!(err, YamahaError::InvalidUrl(_)), "got {err:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_command_ignores_device_response_code() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{MAIN}/setVolume")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response_code": 3 })))
        .mount(&server)
        .await;

    client.set_volume(300).await.unwrap();
}

#[tokio::test]
async fn test_command_ignores_http_status() {
    let (_server, client) = setup().await;

    // Nothing mounted: wiremock answers 404
    client.set_volume(10).await.unwrap();
}

#[tokio::test]
async fn test_sub_second_timeout_allows_fast_answers() {
    let server = MockServer::start().await;
    let config = ClientConfig::new(server.uri()).with_timeout(Duration::from_millis(500));
    let client = YamahaClient::with_config(&config).unwrap();
    mount_ok(&server, "setVolume").await;

    client.set_volume(10).await.unwrap();
}

#[tokio::test]
async fn test_command_connection_refused() {
    let client = YamahaClient::new(refused_host()).unwrap();

    let err = client.set_toggle(Toggle::PureDirect, true).await.unwrap_err();
    assert!(matches!(err, YamahaError::Network(_)), "got {err:?}");

    let err = client.set_tone_control(0, 0).await.unwrap_err();
    assert!(matches!(err, YamahaError::Network(_)), "got {err:?}");
}

// ── Helpers map to endpoints ────────────────────────────────────────

#[tokio::test]
async fn test_set_volume() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{MAIN}/setVolume")))
        .and(query_param("volume", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response_code": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    client.set_volume(42).await.unwrap();
}

#[tokio::test]
async fn test_set_bass_uses_subwoofer_endpoint() {
    let (server, client) = setup().await;
    mount_ok(&server, "setSubwooferVolume").await;

    client.set_bass(-7).await.unwrap();

    assert_eq!(
        only_request_target(&server).await,
        format!("{MAIN}/setSubwooferVolume?volume=-7")
    );
}

#[tokio::test]
async fn test_set_tone_control() {
    let (server, client) = setup().await;
    mount_ok(&server, "setToneControl").await;

    client.set_tone_control(-3, 5).await.unwrap();

    assert_eq!(
        only_request_target(&server).await,
        format!("{MAIN}/setToneControl?mode=manual&bass=-3&treble=5")
    );
}

#[tokio::test]
async fn test_set_dialogue_level() {
    let (server, client) = setup().await;
    mount_ok(&server, "setDialogueLevel").await;

    client.set_dialogue_level(3).await.unwrap();

    assert_eq!(
        only_request_target(&server).await,
        format!("{MAIN}/setDialogueLevel?value=3")
    );
}

#[tokio::test]
async fn test_set_toggle() {
    let (server, client) = setup().await;
    mount_ok(&server, "setEnhancer").await;

    client.set_toggle(Toggle::Enhancer, true).await.unwrap();

    assert_eq!(
        only_request_target(&server).await,
        format!("{MAIN}/setEnhancer?enable=true")
    );
}

#[tokio::test]
async fn test_set_toggle_each_endpoint() {
    let (server, client) = setup().await;

    for (toggle, endpoint) in [
        (Toggle::PureDirect, "setPureDirect"),
        (Toggle::Enhancer, "setEnhancer"),
        (Toggle::ExtraBass, "setExtraBass"),
        (Toggle::AdaptiveDrc, "setAdaptiveDrc"),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("{MAIN}/{endpoint}")))
            .and(query_param("enable", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response_code": 0 })))
            .expect(1)
            .mount(&server)
            .await;

        client.set_toggle(toggle, false).await.unwrap();
    }
}
