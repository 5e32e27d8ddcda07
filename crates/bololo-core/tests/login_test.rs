#![allow(clippy::unwrap_used)]
// Integration tests for the SMS login flow.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bololo_core::{CloudConfig, CoreError, LoginFlow};

fn flow(server: &MockServer) -> LoginFlow {
    let mut cloud = CloudConfig::new("app-key").unwrap();
    cloud.base_url = Url::parse(&server.uri()).unwrap();
    cloud.lang = "en".into();
    LoginFlow::new(&cloud).unwrap()
}

#[tokio::test]
async fn test_request_code_then_verify() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app/user/mobileCode"))
        .and(body_partial_json(json!({ "data": { "mobile": "138", "lang": "en" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200", "message": "ok", "data": null, "error": false
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/app/user/loginByMobile"))
        .and(body_partial_json(json!({ "data": { "mobile": "138", "code": "4321" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200",
            "message": "ok",
            "data": { "userToken": "fresh-token", "userId": 9 },
            "error": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let flow = flow(&server);
    flow.request_code("138").await.unwrap();
    let creds = flow.verify("138", "4321").await.unwrap();

    assert_eq!(creds.user_token, "fresh-token");
}

#[tokio::test]
async fn test_wrong_code_keeps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app/user/loginByMobile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "10010",
            "message": "验证码错误",
            "data": null,
            "error": true
        })))
        .mount(&server)
        .await;

    let err = flow(&server).verify("138", "0000").await.unwrap_err();

    match err {
        CoreError::UnexpectedResponse { code, envelope, .. } => {
            assert_eq!(code.as_deref(), Some("10010"));
            assert!(envelope.contains("验证码错误"));
        }
        other => panic!("expected UnexpectedResponse, got {other:?}"),
    }
}
