// Cloud API response types
//
// Every endpoint wraps its payload in the same `Envelope`. Record fields use
// `#[serde(default)]` liberally because the cloud returns `null` for most
// optional attributes and omits others entirely depending on app version.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard response envelope.
///
/// ```json
/// { "code": "200", "message": "...", "data": ..., "display": null, "error": false }
/// ```
///
/// Success is `code == "200"`; `error` is informational only.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Envelope<T> {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub display: Option<serde_json::Value>,
    #[serde(default)]
    pub error: bool,
}

impl<T> Envelope<T> {
    pub const SUCCESS_CODE: &'static str = "200";

    pub fn is_success(&self) -> bool {
        self.code == Self::SUCCESS_CODE
    }
}

/// Raw device status: server field name -> scalar value.
pub type StatusMap = serde_json::Map<String, serde_json::Value>;

// ── Login ────────────────────────────────────────────────────────────

/// Credentials returned by `loginByMobile`.
///
/// Only `user_token` is sent back as the `Authorization` header; the
/// remaining fields are kept so a host can persist and inspect them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub user_token: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds since epoch.
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Seconds since epoch.
    #[serde(default)]
    pub expired_at: Option<i64>,
    #[serde(default, rename = "jwtAuthenticationDto")]
    pub jwt_authentication: Option<JwtAuthentication>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtAuthentication {
    #[serde(default)]
    pub token: Option<String>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// Device record from `GET /app/smartHome/v2/users/devices`.
///
/// `product_key` and `mac` address the device on every later call, so a
/// record without them does not parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    #[serde(default)]
    pub sno: Option<String>,
    pub product_key: String,
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub room_id: Option<i64>,
    #[serde(default)]
    pub hide: Option<bool>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub did: Option<String>,
    #[serde(default)]
    pub device_source_type: Option<i64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// 1 = online.
    #[serde(default)]
    pub online_status: Option<i64>,
    #[serde(default)]
    pub mqtt_info: Option<MqttInfo>,
    #[serde(default)]
    pub muser_id: Option<i64>,
}

/// Transport cluster the device is attached to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MqttInfo {
    #[serde(default)]
    pub cluster_name: Option<String>,
    #[serde(default)]
    pub cluster_address: Option<String>,
    #[serde(default)]
    pub cluster_mqtt_port: Option<u16>,
}

// ── Homes ────────────────────────────────────────────────────────────

/// Home record from `GET /app/smartHome/v2/homes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeRecord {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub owner: bool,
    #[serde(default)]
    pub rooms: Vec<RoomRecord>,
    #[serde(default)]
    pub ctime: Option<String>,
    #[serde(default)]
    pub mobile_country_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    pub id: i64,
    #[serde(default)]
    pub home_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub default: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_record_tolerates_nulls() {
        let record: DeviceRecord = serde_json::from_value(json!({
            "sno": "S1",
            "productKey": "pk",
            "mac": "AA:BB:01",
            "name": "消毒柜",
            "roomId": 123,
            "hide": false,
            "manufacturer": null,
            "userId": 7,
            "remark": null,
            "did": "d1",
            "deviceSourceType": 1,
            "longitude": null,
            "latitude": null,
            "onlineStatus": 1,
            "mqttInfo": { "clusterName": "c", "clusterAddress": "a", "clusterMqttPort": 1883 },
            "muserId": null
        }))
        .unwrap();

        assert_eq!(record.product_key, "pk");
        assert_eq!(record.sno.as_deref(), Some("S1"));
        assert_eq!(record.room_id, Some(123));
        assert!(record.manufacturer.is_none());
        assert_eq!(record.mqtt_info.unwrap().cluster_mqtt_port, Some(1883));
    }

    #[test]
    fn device_record_null_sno_is_none() {
        let record: DeviceRecord = serde_json::from_value(json!({
            "sno": null,
            "productKey": "pk",
            "mac": "AA:BB:01"
        }))
        .unwrap();
        assert!(record.sno.is_none());
    }

    #[test]
    fn device_record_requires_product_key() {
        let result = serde_json::from_value::<DeviceRecord>(json!({
            "productKey": null,
            "mac": "AA:BB:02"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn envelope_success_is_code_200_only() {
        let ok: Envelope<bool> =
            serde_json::from_value(json!({"code": "200", "data": true, "error": false})).unwrap();
        assert!(ok.is_success());

        let rejected: Envelope<bool> =
            serde_json::from_value(json!({"code": "401", "message": "expired", "error": true}))
                .unwrap();
        assert!(!rejected.is_success());
        assert!(rejected.data.is_none());
    }

    #[test]
    fn login_credentials_parse_jwt_dto() {
        let creds: LoginCredentials = serde_json::from_value(json!({
            "jwtAuthenticationDto": { "token": "jwt" },
            "userToken": "tok",
            "uid": "u",
            "userId": 123,
            "refreshToken": "r",
            "createdAt": 1_755_672_309,
            "expiredAt": 1_771_224_309
        }))
        .unwrap();
        assert_eq!(creds.user_token, "tok");
        assert_eq!(
            creds.jwt_authentication.and_then(|j| j.token).as_deref(),
            Some("jwt")
        );
    }
}
