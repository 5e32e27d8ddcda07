// bololo-api: Async Rust client for the Bololo smart-home cloud API

pub mod auth;
pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::Locale;
pub use client::{BololoClient, DEFAULT_BASE_URL};
pub use error::Error;
pub use models::{
    DeviceRecord, Envelope, HomeRecord, JwtAuthentication, LoginCredentials, MqttInfo, RoomRecord,
    StatusMap,
};
pub use transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};
