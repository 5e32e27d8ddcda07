//! Device state synchronization and entity adapters for Bololo appliances.
//!
//! Sits between `bololo-api` and a host (the `bololo` CLI, or any embedding
//! application):
//!
//! - **[`Account`]**: setup entry point. Lists the account's devices,
//!   classifies them by product key, and builds one [`Device`] per supported
//!   appliance. Optional background polling and explicit teardown.
//!
//! - **[`Device`]**: per-device aggregate owning a [`StatusCache`] with a
//!   short staleness window and single-flight refresh, plus the optimistic
//!   control path.
//!
//! - **[`Entity`]**: toggle and choice adapters, one per catalog function,
//!   each publishing its last known state through a `watch` channel.
//!
//! - **[`catalog`]**: static product-key registry and function table.
//!
//! - **[`LoginFlow`]**: SMS one-time-code login producing the user token.

pub mod account;
pub mod catalog;
pub mod config;
pub mod convert;
pub mod device;
pub mod entity;
pub mod error;
pub mod login;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use account::Account;
pub use catalog::{CapabilityGroup, DeviceKind, DeviceType, FunctionDescriptor, resolve_device_type};
pub use config::{AccountConfig, CloudConfig, DEFAULT_STATUS_TTL, TlsVerification};
pub use device::Device;
pub use entity::{ChoiceEntity, Entity, EntityState, EntityValue, ToggleEntity};
pub use error::CoreError;
pub use login::LoginFlow;
pub use model::{DeviceInfo, Home, MacAddress, OnlineState, Room, StatusSnapshot};
pub use store::StatusCache;

// Wire types that surface through the public API.
pub use bololo_api::{LoginCredentials, StatusMap};
