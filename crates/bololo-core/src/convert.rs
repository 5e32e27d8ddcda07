// ── API-to-domain type conversions ──
//
// Bridges raw `bololo_api` records into `bololo_core::model` types,
// normalizing names and filling defaults for missing optional data.

use bololo_api::{DeviceRecord, HomeRecord, RoomRecord};

use crate::catalog::DeviceType;
use crate::model::{DeviceInfo, Home, MacAddress, OnlineState, Room};

const DEFAULT_MANUFACTURER: &str = "Bololo";

impl DeviceInfo {
    /// Build the identity of a classified device from its listing record.
    pub fn from_record(record: &DeviceRecord, device_type: &DeviceType) -> Self {
        Self {
            mac: MacAddress::new(&record.mac),
            raw_mac: record.mac.clone(),
            product_key: record.product_key.clone(),
            name: record.name.clone().unwrap_or_default(),
            serial: record.sno.clone().unwrap_or_default(),
            did: record.did.clone(),
            room_id: record.room_id,
            manufacturer: record
                .manufacturer
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MANUFACTURER.to_owned()),
            model: device_type.model.to_owned(),
            online: OnlineState::from_code(record.online_status),
            record: record.clone(),
        }
    }
}

impl From<RoomRecord> for Room {
    fn from(r: RoomRecord) -> Self {
        Self {
            id: r.id,
            name: r.name.unwrap_or_default(),
            is_default: r.default,
        }
    }
}

impl From<HomeRecord> for Home {
    fn from(h: HomeRecord) -> Self {
        Self {
            id: h.id,
            name: h.name.unwrap_or_default(),
            address: h.address,
            owner: h.owner,
            rooms: h.rooms.into_iter().map(Room::from).collect(),
        }
    }
}
