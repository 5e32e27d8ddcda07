// ── Entity adapters ──
//
// Host-facing views of one device function each. An adapter keeps its own
// last-known state (published through a `watch` channel) and reaches the
// device through a non-owning back-reference.

pub mod choice;
pub mod toggle;

use std::fmt;
use std::sync::{Arc, Weak};

use serde::Serialize;
use tokio::sync::watch;

use crate::catalog::{CapabilityGroup, FunctionDescriptor};
use crate::device::Device;
use crate::error::CoreError;
use crate::model::DeviceInfo;

pub use choice::ChoiceEntity;
pub use toggle::ToggleEntity;

// ── State ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntityValue {
    Toggle(bool),
    Choice(&'static str),
}

impl fmt::Display for EntityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toggle(true) => f.write_str("on"),
            Self::Toggle(false) => f.write_str("off"),
            Self::Choice(option) => f.write_str(option),
        }
    }
}

/// Last state an entity published to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityState {
    pub available: bool,
    pub value: Option<EntityValue>,
}

impl EntityState {
    pub fn available(value: EntityValue) -> Self {
        Self {
            available: true,
            value: Some(value),
        }
    }
}

// ── Shared adapter plumbing ──────────────────────────────────────

#[derive(Debug)]
pub(crate) struct EntityCore {
    function: &'static FunctionDescriptor,
    info: Arc<DeviceInfo>,
    device: Weak<Device>,
    unique_id: String,
    state: watch::Sender<EntityState>,
}

impl EntityCore {
    fn new(
        function: &'static FunctionDescriptor,
        info: Arc<DeviceInfo>,
        device: Weak<Device>,
        initial: Option<EntityValue>,
    ) -> Self {
        let unique_id = info.mac.unique_id(function.server_field);
        let (state, _) = watch::channel(EntityState {
            available: false,
            value: initial,
        });
        Self {
            function,
            info,
            device,
            unique_id,
            state,
        }
    }

    fn device(&self) -> Result<Arc<Device>, CoreError> {
        self.device.upgrade().ok_or_else(|| CoreError::DeviceDetached {
            unique_id: self.unique_id.clone(),
        })
    }

    fn field_missing(&self) -> CoreError {
        CoreError::StatusFieldMissing {
            mac: self.info.mac.to_string(),
            field: self.function.server_field.to_owned(),
        }
    }

    /// Publish `value` as available; subscribers only wake on change.
    fn publish(&self, value: EntityValue) {
        let next = EntityState::available(value);
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn mark_unavailable(&self) {
        self.state.send_if_modified(|current| {
            if current.available {
                current.available = false;
                true
            } else {
                false
            }
        });
    }

    fn state(&self) -> EntityState {
        *self.state.borrow()
    }
}

// ── Entity ───────────────────────────────────────────────────────

/// Any entity created for a device.
#[derive(Debug, Clone)]
pub enum Entity {
    Toggle(Arc<ToggleEntity>),
    Choice(Arc<ChoiceEntity>),
}

impl Entity {
    pub(crate) fn new(
        function: &'static FunctionDescriptor,
        info: Arc<DeviceInfo>,
        device: Weak<Device>,
    ) -> Self {
        match function.capability {
            CapabilityGroup::Toggle => {
                Self::Toggle(Arc::new(ToggleEntity::new(function, info, device)))
            }
            CapabilityGroup::Choice => {
                Self::Choice(Arc::new(ChoiceEntity::new(function, info, device)))
            }
        }
    }

    fn core(&self) -> &EntityCore {
        match self {
            Self::Toggle(t) => &t.core,
            Self::Choice(c) => &c.core,
        }
    }

    /// `{mac}_{server_field}`, lowercased mac.
    pub fn unique_id(&self) -> &str {
        &self.core().unique_id
    }

    /// Local key, also the translation key.
    pub fn name(&self) -> &'static str {
        self.core().function.local_key
    }

    pub fn icon(&self) -> &'static str {
        self.core().function.icon
    }

    pub fn function(&self) -> &'static FunctionDescriptor {
        self.core().function
    }

    pub fn capability(&self) -> CapabilityGroup {
        self.core().function.capability
    }

    pub fn device_info(&self) -> &DeviceInfo {
        &self.core().info
    }

    pub fn state(&self) -> EntityState {
        self.core().state()
    }

    pub fn subscribe(&self) -> watch::Receiver<EntityState> {
        self.core().state.subscribe()
    }

    pub fn is_writable(&self) -> bool {
        match self {
            Self::Toggle(_) => true,
            Self::Choice(c) => c.is_writable(),
        }
    }

    /// Re-read state from the device; marks the entity unavailable on failure.
    pub async fn update(&self) -> Result<(), CoreError> {
        match self {
            Self::Toggle(t) => t.update().await,
            Self::Choice(c) => c.update().await,
        }
    }

    pub fn as_toggle(&self) -> Option<&Arc<ToggleEntity>> {
        match self {
            Self::Toggle(t) => Some(t),
            Self::Choice(_) => None,
        }
    }

    pub fn as_choice(&self) -> Option<&Arc<ChoiceEntity>> {
        match self {
            Self::Choice(c) => Some(c),
            Self::Toggle(_) => None,
        }
    }

    pub(crate) fn mark_unavailable(&self) {
        self.core().mark_unavailable();
    }
}
