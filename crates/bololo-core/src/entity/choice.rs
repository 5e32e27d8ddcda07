// Enumerated-option entity (timer durations).

use std::sync::{Arc, Weak};

use tokio::sync::watch;
use tracing::warn;

use super::{EntityCore, EntityState, EntityValue};
use crate::catalog::FunctionDescriptor;
use crate::device::Device;
use crate::error::CoreError;
use crate::model::DeviceInfo;

#[derive(Debug)]
pub struct ChoiceEntity {
    pub(super) core: EntityCore,
}

impl ChoiceEntity {
    pub(crate) fn new(
        function: &'static FunctionDescriptor,
        info: Arc<DeviceInfo>,
        device: Weak<Device>,
    ) -> Self {
        let initial = function.default_option.map(EntityValue::Choice);
        Self {
            core: EntityCore::new(function, info, device, initial),
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

    pub fn options(&self) -> &'static [&'static str] {
        self.core.function.options
    }

    pub fn default_option(&self) -> Option<&'static str> {
        self.core.function.default_option
    }

    /// Last known option, or the default before the first read.
    pub fn current_option(&self) -> Option<&'static str> {
        match self.core.state().value {
            Some(EntityValue::Choice(option)) => Some(option),
            _ => self.default_option(),
        }
    }

    pub fn state(&self) -> EntityState {
        self.core.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<EntityState> {
        self.core.state.subscribe()
    }

    /// Map the device's raw value for this field to the closest option.
    pub async fn read(&self) -> Result<&'static str, CoreError> {
        let device = self.core.device()?;
        let snapshot = device.status().await?;
        let option = self
            .core
            .function
            .closest_option(snapshot.get(self.server_field()))
            .ok_or_else(|| self.core.field_missing())?;
        self.core.publish(EntityValue::Choice(option));
        Ok(option)
    }

    /// Whether [`select`](Self::select) reaches the device. Always `false`:
    /// the value encoding the cloud expects for these fields is unconfirmed.
    pub fn is_writable(&self) -> bool {
        false
    }

    /// Validate `option`; the cloud is not called.
    pub fn select(&self, option: &str) -> Result<(), CoreError> {
        let function = self.core.function;
        if !function.has_option(option) {
            return Err(CoreError::InvalidOption {
                function: function.local_key.to_owned(),
                option: option.to_owned(),
                options: function.options.iter().map(|o| (*o).to_owned()).collect(),
            });
        }
        warn!(
            entity = %self.core.unique_id,
            option,
            "choice write is not wired to the cloud, ignoring"
        );
        Ok(())
    }

    pub async fn update(&self) -> Result<(), CoreError> {
        self.read().await.map(|_| ()).inspect_err(|_| self.core.mark_unavailable())
    }
}
