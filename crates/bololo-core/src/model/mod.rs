// ── Domain model ──

pub mod device;
pub mod home;
pub mod identity;
pub mod status;

pub use device::{DeviceInfo, OnlineState};
pub use home::{Home, Room};
pub use identity::MacAddress;
pub use status::StatusSnapshot;
