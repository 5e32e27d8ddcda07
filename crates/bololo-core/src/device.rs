// ── Device aggregate ──
//
// One discovered appliance: its identity, its status cache, the client
// handle used to reach it, and the entities created for its functions.
// Entities point back here through a `Weak`, so dropping the aggregate
// detaches them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use bololo_api::{BololoClient, StatusMap};

use crate::catalog::DeviceType;
use crate::entity::{ChoiceEntity, Entity, ToggleEntity};
use crate::error::CoreError;
use crate::model::{DeviceInfo, MacAddress, StatusSnapshot};
use crate::store::StatusCache;

#[derive(Debug)]
pub struct Device {
    info: Arc<DeviceInfo>,
    device_type: &'static DeviceType,
    client: BololoClient,
    token: Arc<SecretString>,
    cache: StatusCache,
    entities: Vec<Entity>,
}

impl Device {
    /// Build the aggregate and one entity per function of its type.
    pub fn new(
        info: DeviceInfo,
        device_type: &'static DeviceType,
        client: BololoClient,
        token: Arc<SecretString>,
        status_ttl: std::time::Duration,
    ) -> Arc<Self> {
        let info = Arc::new(info);
        Arc::new_cyclic(|weak| {
            let entities = device_type
                .functions
                .iter()
                .filter(|f| device_type.supports(f.capability))
                .map(|f| Entity::new(f, Arc::clone(&info), weak.clone()))
                .collect();
            Self {
                info,
                device_type,
                client,
                token,
                cache: StatusCache::new(status_ttl),
                entities,
            }
        })
    }

    // ── Identity ─────────────────────────────────────────────────

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    pub fn mac(&self) -> &MacAddress {
        &self.info.mac
    }

    pub fn device_type(&self) -> &'static DeviceType {
        self.device_type
    }

    // ── Entities ─────────────────────────────────────────────────

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Entity for a function, by local key (`power`) or server field (`switch`).
    pub fn entity(&self, key: &str) -> Result<&Entity, CoreError> {
        self.entities
            .iter()
            .find(|e| e.function().local_key == key)
            .or_else(|| self.entities.iter().find(|e| e.function().server_field == key))
            .ok_or_else(|| CoreError::FunctionNotFound {
                device: self.info.mac.to_string(),
                function: key.to_owned(),
            })
    }

    pub fn toggle(&self, key: &str) -> Result<&Arc<ToggleEntity>, CoreError> {
        match self.entity(key)? {
            Entity::Toggle(t) => Ok(t),
            Entity::Choice(_) => Err(CoreError::FunctionNotFound {
                device: self.info.mac.to_string(),
                function: format!("{key} (not a toggle)"),
            }),
        }
    }

    pub fn choice(&self, key: &str) -> Result<&Arc<ChoiceEntity>, CoreError> {
        match self.entity(key)? {
            Entity::Choice(c) => Ok(c),
            Entity::Toggle(_) => Err(CoreError::FunctionNotFound {
                device: self.info.mac.to_string(),
                function: format!("{key} (not a choice)"),
            }),
        }
    }

    // ── Status ───────────────────────────────────────────────────

    /// Current status, served from cache while fresh.
    pub async fn status(&self) -> Result<Arc<StatusSnapshot>, CoreError> {
        self.cache.get_or_refresh(|| self.fetch_status()).await
    }

    /// Refetch regardless of freshness.
    pub async fn refresh(&self) -> Result<Arc<StatusSnapshot>, CoreError> {
        self.cache.invalidate().await;
        self.status().await
    }

    pub fn cached_status(&self) -> Option<Arc<StatusSnapshot>> {
        self.cache.cached()
    }

    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.cache.fetched_at().await
    }

    pub fn subscribe_status(&self) -> watch::Receiver<Option<Arc<StatusSnapshot>>> {
        self.cache.subscribe()
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }

    async fn fetch_status(&self) -> Result<StatusSnapshot, CoreError> {
        let map = self
            .client
            .device_status(&self.token, &self.info.product_key, &self.info.raw_mac)
            .await?;
        debug!(mac = %self.info.mac, fields = map.len(), "status fetched");
        Ok(StatusSnapshot::new(map))
    }

    // ── Control ──────────────────────────────────────────────────

    /// Set one server field on the device.
    ///
    /// On success the cached snapshot, if any, is replaced by a copy with
    /// that field changed. On failure the cache is left alone.
    pub async fn control(&self, field: &str, value: impl Into<Value>) -> Result<(), CoreError> {
        let value = value.into();
        let mut patch = StatusMap::new();
        patch.insert(field.to_owned(), value.clone());

        self.client
            .control_device(&self.token, &self.info.product_key, &self.info.raw_mac, &patch)
            .await?;

        if !self.cache.apply_field(field, value).await {
            debug!(mac = %self.info.mac, field, "no cached status to patch");
        }
        info!(mac = %self.info.mac, field, "control applied");
        Ok(())
    }

    // ── Polling / teardown ───────────────────────────────────────

    /// Update every entity once. Returns the number that failed.
    pub async fn update_entities(&self) -> usize {
        let mut failures = 0;
        for entity in &self.entities {
            if let Err(e) = entity.update().await {
                warn!(entity = entity.unique_id(), error = %e, "entity update failed");
                failures += 1;
            }
        }
        failures
    }

    pub(crate) async fn teardown(&self) {
        self.cache.clear().await;
        for entity in &self.entities {
            entity.mark_unavailable();
        }
        debug!(mac = %self.info.mac, "device torn down");
    }
}
