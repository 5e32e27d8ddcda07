#![allow(clippy::unwrap_used)]
// Integration tests for account setup, polling, and teardown.

use std::time::Duration;

use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bololo_core::catalog::DISINFECTION_CABINET_PRODUCT_KEY as PK;
use bololo_core::{Account, AccountConfig, CloudConfig, CoreError, EntityValue};

fn ok(data: Value) -> Value {
    json!({ "code": "200", "message": "ok", "data": data, "display": null, "error": false })
}

fn config(server: &MockServer) -> AccountConfig {
    let mut cloud = CloudConfig::new("app-key").unwrap();
    cloud.base_url = Url::parse(&server.uri()).unwrap();
    AccountConfig::new(cloud, "13800000000", "user-token".to_string().into())
}

async fn mount_device_list(server: &MockServer, devices: Value) {
    Mock::given(method("GET"))
        .and(path("/app/smartHome/v2/users/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(devices)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_setup_skips_unknown_product_keys() {
    let server = MockServer::start().await;
    mount_device_list(
        &server,
        json!([
            { "sno": "1", "productKey": PK, "mac": "AA:BB:01" },
            { "sno": "2", "productKey": "some-other-product", "mac": "AA:BB:02" },
            { "sno": "3", "productKey": PK, "mac": "aa:bb:03" }
        ]),
    )
    .await;

    let account = Account::setup(config(&server)).await.unwrap();

    let macs: Vec<String> = account
        .devices()
        .iter()
        .map(|d| d.mac().to_string())
        .collect();
    assert_eq!(macs, ["aa:bb:01", "aa:bb:03"]);
    assert!(matches!(
        account.device("AA:BB:02"),
        Err(CoreError::DeviceNotFound { .. })
    ));
    assert_eq!(account.entities().len(), 18);
    assert!(account.entity("aa:bb:03_auto_switch").is_some());
}

#[tokio::test]
async fn test_setup_skips_malformed_records() {
    let server = MockServer::start().await;
    mount_device_list(
        &server,
        json!([
            { "sno": "1", "productKey": PK, "mac": "AA:BB:01" },
            { "sno": "2", "productKey": null, "mac": "AA:BB:02" },
            { "sno": null, "productKey": PK, "mac": "AA:BB:03" },
            { "sno": "4", "productKey": PK, "mac": "" }
        ]),
    )
    .await;

    let account = Account::setup(config(&server)).await.unwrap();

    let macs: Vec<String> = account
        .devices()
        .iter()
        .map(|d| d.mac().to_string())
        .collect();
    assert_eq!(macs, ["aa:bb:01", "aa:bb:03"]);
    assert_eq!(account.device("aa:bb:03").unwrap().info().serial, "");
}

#[tokio::test]
async fn test_setup_with_no_devices() {
    let server = MockServer::start().await;
    mount_device_list(&server, json!(null)).await;

    let account = Account::setup(config(&server)).await.unwrap();
    assert!(account.devices().is_empty());
    assert!(account.entities().is_empty());
}

#[tokio::test]
async fn test_setup_rejected_token_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/smartHome/v2/users/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "401",
            "message": "token expired",
            "data": null,
            "error": true
        })))
        .mount(&server)
        .await;

    let err = Account::setup(config(&server)).await.err().unwrap();
    assert!(err.to_string().contains("token expired"), "{err}");
}

#[tokio::test]
async fn test_homes_are_converted() {
    let server = MockServer::start().await;
    mount_device_list(&server, json!([])).await;
    Mock::given(method("GET"))
        .and(path("/app/smartHome/v2/homes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([{
            "id": 1,
            "name": "Home",
            "owner": true,
            "rooms": [{ "id": 42, "homeId": 1, "name": "Kitchen", "default": false }]
        }]))))
        .mount(&server)
        .await;

    let account = Account::setup(config(&server)).await.unwrap();
    let homes = account.homes().await.unwrap();

    assert_eq!(homes.len(), 1);
    assert_eq!(homes[0].room(42).map(|r| r.name.as_str()), Some("Kitchen"));
}

#[tokio::test]
async fn test_polling_then_unload_detaches_entities() {
    let server = MockServer::start().await;
    mount_device_list(
        &server,
        json!([{ "sno": "1", "productKey": PK, "mac": "AA:BB:01" }]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/bololo/app/device/status/.+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "switch": true,
            "auto_time": 40
        }))))
        .mount(&server)
        .await;

    let account = Account::setup(config(&server)).await.unwrap();
    let power = account.entity("aa:bb:01_switch").unwrap();
    let mut rx = power.subscribe();

    account.start_polling(Duration::from_secs(3600)).await;
    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(power.state().value, Some(EntityValue::Toggle(true)));
    assert!(power.state().available);

    account.unload().await;

    assert!(account.devices().is_empty());
    assert!(!power.state().available);
    let err = power.as_toggle().unwrap().read().await.unwrap_err();
    assert!(matches!(err, CoreError::DeviceDetached { .. }), "{err:?}");
}
