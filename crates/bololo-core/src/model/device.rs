// ── Device domain types ──

use bololo_api::DeviceRecord;
use serde::Serialize;

use super::identity::MacAddress;

/// Connectivity as last reported by the device listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OnlineState {
    Online,
    Offline,
    Unknown,
}

impl OnlineState {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => Self::Online,
            Some(_) => Self::Offline,
            None => Self::Unknown,
        }
    }
}

/// Immutable identity and metadata of one discovered device.
///
/// Captured once at setup from the cloud listing and never refreshed for the
/// life of the account.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    pub mac: MacAddress,
    /// MAC exactly as the cloud reported it; used in request paths.
    pub raw_mac: String,
    pub product_key: String,
    pub name: String,
    pub serial: String,
    pub did: Option<String>,
    pub room_id: Option<i64>,
    pub manufacturer: String,
    pub model: String,
    pub online: OnlineState,
    /// The listing record as received.
    pub record: DeviceRecord,
}

impl DeviceInfo {
    /// Display name, falling back to the MAC when the cloud gave none.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.mac.as_str()
        } else {
            &self.name
        }
    }
}
