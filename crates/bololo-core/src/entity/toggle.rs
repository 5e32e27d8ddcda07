// Boolean on/off entity.

use std::sync::{Arc, Weak};

use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use super::{EntityCore, EntityState, EntityValue};
use crate::catalog::FunctionDescriptor;
use crate::device::Device;
use crate::error::CoreError;
use crate::model::DeviceInfo;

#[derive(Debug)]
pub struct ToggleEntity {
    pub(super) core: EntityCore,
}

impl ToggleEntity {
    pub(crate) fn new(
        function: &'static FunctionDescriptor,
        info: Arc<DeviceInfo>,
        device: Weak<Device>,
    ) -> Self {
        Self {
            core: EntityCore::new(function, info, device, None),
        }
    }

    pub fn unique_id(&self) -> &str {
        &self.core.unique_id
    }

    pub fn name(&self) -> &'static str {
        self.core.function.local_key
    }

    pub fn icon(&self) -> &'static str {
        self.core.function.icon
    }

    pub fn server_field(&self) -> &'static str {
        self.core.function.server_field
    }

    pub fn device(&self) -> &DeviceInfo {
        &self.core.info
    }

    /// Last known on/off state, without touching the network.
    pub fn is_on(&self) -> Option<bool> {
        match self.core.state().value {
            Some(EntityValue::Toggle(on)) => Some(on),
            _ => None,
        }
    }

    pub fn state(&self) -> EntityState {
        self.core.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<EntityState> {
        self.core.state.subscribe()
    }

    /// Read the bound field from the device's current status.
    pub async fn read(&self) -> Result<bool, CoreError> {
        let device = self.core.device()?;
        let snapshot = device.status().await?;
        let on = snapshot
            .bool(self.server_field())
            .ok_or_else(|| self.core.field_missing())?;
        self.core.publish(EntityValue::Toggle(on));
        Ok(on)
    }

    /// Command the device, then record the new state locally.
    pub async fn write(&self, on: bool) -> Result<(), CoreError> {
        let device = self.core.device()?;
        device.control(self.server_field(), Value::Bool(on)).await?;
        self.core.publish(EntityValue::Toggle(on));
        debug!(entity = %self.core.unique_id, on, "toggle written");
        Ok(())
    }

    pub async fn turn_on(&self) -> Result<(), CoreError> {
        self.write(true).await
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.write(false).await
    }

    pub async fn update(&self) -> Result<(), CoreError> {
        self.read().await.map(|_| ()).inspect_err(|_| self.core.mark_unavailable())
    }
}
