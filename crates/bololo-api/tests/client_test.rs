#![allow(clippy::unwrap_used)]
// Integration tests for `BololoClient` using wiremock.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bololo_api::{BololoClient, Error, StatusMap};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, BololoClient) {
    setup_with_timeout(Duration::from_secs(10)).await
}

async fn setup_with_timeout(timeout: Duration) -> (MockServer, BololoClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = BololoClient::with_client(reqwest::Client::new(), base_url, "app-key", timeout);
    (server, client)
}

fn token() -> SecretString {
    "user-token".to_string().into()
}

fn ok(data: serde_json::Value) -> serde_json::Value {
    json!({
        "code": "200",
        "message": "本次请求成功",
        "data": data,
        "display": null,
        "error": false
    })
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_send_verify_code() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/app/user/mobileCode"))
        .and(body_json(json!({
            "appKey": "app-key",
            "data": { "mobile": "13800000000", "lang": "zh" },
            "version": "1.0"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    client.send_verify_code("13800000000").await.unwrap();
}

#[tokio::test]
async fn test_login_by_mobile_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/app/user/loginByMobile"))
        .and(body_partial_json(json!({
            "appKey": "app-key",
            "data": {
                "mobile": "13800000000",
                "code": "1234",
                "mobileCountryCode": "CN",
                "lang": "zh"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "jwtAuthenticationDto": { "token": "jwt" },
            "userToken": "user-token",
            "uid": "u-1",
            "userId": 123,
            "refreshToken": "refresh",
            "createdAt": 1_755_672_309,
            "expiredAt": 1_771_224_309
        }))))
        .mount(&server)
        .await;

    let creds = client
        .login_by_mobile("13800000000", "1234")
        .await
        .unwrap();

    assert_eq!(creds.user_token, "user-token");
    assert_eq!(creds.user_id, Some(123));
}

#[tokio::test]
async fn test_login_by_mobile_rejected_code_echoes_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/app/user/loginByMobile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "10010",
            "message": "验证码错误",
            "data": null,
            "display": null,
            "error": true
        })))
        .mount(&server)
        .await;

    let err = client
        .login_by_mobile("13800000000", "0000")
        .await
        .unwrap_err();

    assert!(err.is_unexpected_response(), "got: {err:?}");
    assert_eq!(err.envelope_code(), Some("10010"));
    let msg = err.to_string();
    assert!(msg.contains("/app/user/loginByMobile"), "{msg}");
    assert!(msg.contains("10010"), "{msg}");
    assert!(msg.contains("验证码错误"), "{msg}");
}

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_sends_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/app/smartHome/v2/users/devices"))
        .and(header("Authorization", "user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([{
            "sno": "SN1",
            "productKey": "k1mvpG70tNN000000000000000000000",
            "mac": "AA:BB:01",
            "name": "消毒柜",
            "roomId": 42,
            "hide": false,
            "manufacturer": null,
            "userId": 7,
            "did": "did-1",
            "deviceSourceType": 1,
            "onlineStatus": 1,
            "mqttInfo": { "clusterName": "c1", "clusterAddress": "mqtt.example", "clusterMqttPort": 1883 }
        }]))))
        .mount(&server)
        .await;

    let devices = client.list_devices(&token()).await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].mac, "AA:BB:01");
    assert_eq!(devices[0].name.as_deref(), Some("消毒柜"));
    assert_eq!(devices[0].online_status, Some(1));
}

#[tokio::test]
async fn test_list_devices_null_data_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/app/smartHome/v2/users/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(null))))
        .mount(&server)
        .await;

    assert!(client.list_devices(&token()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_devices_skips_unreadable_records() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/app/smartHome/v2/users/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([
            { "sno": null, "productKey": "pk", "mac": "AA:BB:01" },
            { "sno": "SN2", "productKey": null, "mac": "AA:BB:02" },
            { "sno": "SN3", "productKey": "pk", "mac": null },
            "garbage"
        ]))))
        .mount(&server)
        .await;

    let devices = client.list_devices(&token()).await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].mac, "AA:BB:01");
    assert!(devices[0].sno.is_none());
}

#[tokio::test]
async fn test_list_homes() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/app/smartHome/v2/homes"))
        .and(header("Authorization", "user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([{
            "userId": 1111,
            "id": 2222,
            "name": "测试",
            "address": null,
            "owner": true,
            "rooms": [{ "id": 42, "homeId": 2222, "name": "Kitchen", "icon": null, "default": true }],
            "ctime": "2025-08-21 11:59:57",
            "mobileCountryCode": "CN"
        }]))))
        .mount(&server)
        .await;

    let homes = client.list_homes(&token()).await.unwrap();

    assert_eq!(homes.len(), 1);
    assert_eq!(homes[0].rooms[0].name.as_deref(), Some("Kitchen"));
    assert!(homes[0].owner);
}

#[tokio::test]
async fn test_device_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/bololo/app/device/status/pk/AA:BB:01"))
        .and(header("Authorization", "user-token"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "switch": false,
            "anion": true,
            "disinfection_time": 15,
            "status_time": 1_755_765_294_647_i64
        }))))
        .mount(&server)
        .await;

    let status = client
        .device_status(&token(), "pk", "AA:BB:01")
        .await
        .unwrap();

    assert_eq!(status.get("switch"), Some(&json!(false)));
    assert_eq!(status.get("disinfection_time"), Some(&json!(15)));
}

#[tokio::test]
async fn test_control_device_encodes_patch_as_string() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/bololo/app/device/control/pk/AA:BB:01"))
        .and(header("Authorization", "user-token"))
        .and(body_json(json!({
            "appKey": "app-key",
            "data": "{\"switch\":true}",
            "version": "1.0"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(true))))
        .expect(1)
        .mount(&server)
        .await;

    let mut patch = StatusMap::new();
    patch.insert("switch".into(), json!(true));
    client
        .control_device(&token(), "pk", "AA:BB:01", &patch)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_device_path_values_are_percent_encoded() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/bololo/app/device/status/pk/AA%2FBB%3F01%23x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({ "switch": 1 }))))
        .expect(1)
        .mount(&server)
        .await;

    let status = client
        .device_status(&token(), "pk", "AA/BB?01#x")
        .await
        .unwrap();

    assert_eq!(status.get("switch"), Some(&json!(1)));
}

// ── Failure tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_http_error_carries_status_and_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/app/smartHome/v2/homes"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let result = client.list_homes(&token()).await;

    match result {
        Err(Error::Http { status, body, path }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "Bad Gateway");
            assert_eq!(path, "/app/smartHome/v2/homes");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_envelope_is_unexpected_response() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/bololo/app/device/status/pk/mac"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client
        .device_status(&token(), "pk", "mac")
        .await
        .unwrap_err();

    match err {
        Error::UnexpectedResponse { code, envelope, .. } => {
            assert!(code.is_none());
            assert!(envelope.contains("maintenance"));
        }
        other => panic!("expected UnexpectedResponse, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_deadline_exceeded_is_timeout() {
    let (server, client) = setup_with_timeout(Duration::from_millis(100)).await;

    Mock::given(method("GET"))
        .and(path("/app/smartHome/v2/users/devices"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(json!([])))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let err = client.list_devices(&token()).await.unwrap_err();

    assert!(
        matches!(err, Error::Timeout { .. }),
        "expected Timeout, got: {err:?}"
    );
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_transport_timeout_reports_configured_deadline() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let client = BololoClient::with_client(http, base_url, "app-key", Duration::from_secs(5));

    Mock::given(method("GET"))
        .and(path("/app/smartHome/v2/homes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(json!([])))
                .set_delay(Duration::from_millis(1000)),
        )
        .mount(&server)
        .await;

    let err = client.list_homes(&token()).await.unwrap_err();

    match err {
        Error::Timeout { path, timeout_secs } => {
            assert_eq!(path, "/app/smartHome/v2/homes");
            assert_eq!(timeout_secs, 5);
        }
        other => panic!("expected Timeout, got: {other:?}"),
    }
}
