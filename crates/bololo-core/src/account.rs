// ── Account ──
//
// Lifecycle of one logged-in account: discovers devices, classifies them
// against the catalog, builds aggregates and entities, optionally polls,
// and tears everything down on unload.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use secrecy::SecretString;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use bololo_api::{BololoClient, DeviceRecord};

use crate::catalog::resolve_device_type;
use crate::config::AccountConfig;
use crate::device::Device;
use crate::entity::Entity;
use crate::error::CoreError;
use crate::model::{DeviceInfo, Home, MacAddress};

/// Handle to a set-up account.
///
/// Cheaply cloneable via `Arc<AccountInner>`.
#[derive(Clone)]
pub struct Account {
    inner: Arc<AccountInner>,
}

struct AccountInner {
    config: AccountConfig,
    client: BololoClient,
    token: Arc<SecretString>,
    devices: watch::Sender<Arc<Vec<Arc<Device>>>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Account {
    /// Discover the account's devices and build an aggregate for each
    /// supported one.
    pub async fn setup(config: AccountConfig) -> Result<Self, CoreError> {
        let client = config.cloud.build_client()?;
        let token = Arc::new(config.token.clone());

        let records = client.list_devices(&token).await?;
        let discovered = records.len();
        let devices = build_devices(&records, &client, &token, config.status_ttl);
        info!(
            discovered,
            supported = devices.len(),
            mobile = %config.mobile,
            "account set up"
        );

        let (devices, _) = watch::channel(Arc::new(devices));
        Ok(Self {
            inner: Arc::new(AccountInner {
                config,
                client,
                token,
                devices,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &AccountConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &BololoClient {
        &self.inner.client
    }

    // ── Devices & entities ───────────────────────────────────────

    pub fn devices(&self) -> Arc<Vec<Arc<Device>>> {
        Arc::clone(&self.inner.devices.borrow())
    }

    /// Find a device by MAC, case-insensitively.
    pub fn device(&self, mac: &str) -> Result<Arc<Device>, CoreError> {
        let mac = MacAddress::new(mac);
        self.devices()
            .iter()
            .find(|d| *d.mac() == mac)
            .cloned()
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: mac.to_string(),
            })
    }

    /// Every entity of every device, in device then catalog order.
    pub fn entities(&self) -> Vec<Entity> {
        self.devices()
            .iter()
            .flat_map(|d| d.entities().iter().cloned())
            .collect()
    }

    pub fn entity(&self, unique_id: &str) -> Option<Entity> {
        self.entities()
            .into_iter()
            .find(|e| e.unique_id() == unique_id)
    }

    pub async fn homes(&self) -> Result<Vec<Home>, CoreError> {
        let homes = self.inner.client.list_homes(&self.inner.token).await?;
        Ok(homes.into_iter().map(Home::from).collect())
    }

    // ── Polling ──────────────────────────────────────────────────

    /// Update every entity once, devices in parallel. Returns the number
    /// of entities that failed.
    pub async fn update_all(&self) -> usize {
        let devices = self.devices();
        join_all(devices.iter().map(|d| d.update_entities()))
            .await
            .into_iter()
            .sum()
    }

    /// Spawn a task that calls [`update_all`](Self::update_all) every
    /// `interval`, starting immediately. Stopped by [`unload`](Self::unload).
    pub async fn start_polling(&self, interval: Duration) {
        let handle = tokio::spawn(poll_task(
            self.clone(),
            interval,
            self.inner.cancel.child_token(),
        ));
        self.inner.task_handles.lock().await.push(handle);
        debug!(?interval, "polling started");
    }

    // ── Teardown ─────────────────────────────────────────────────

    /// Stop polling, clear every status cache, and drop all aggregates.
    ///
    /// Entities still held by the host report unavailable and fail with
    /// [`CoreError::DeviceDetached`] once the aggregates are gone.
    pub async fn unload(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "poll task ended abnormally");
            }
        }
        drop(handles);

        let devices = self.inner.devices.send_replace(Arc::new(Vec::new()));
        for device in devices.iter() {
            device.teardown().await;
        }
        info!(devices = devices.len(), "account unloaded");
    }
}

/// Classify discovered records and build aggregates for supported ones.
fn build_devices(
    records: &[DeviceRecord],
    client: &BololoClient,
    token: &Arc<SecretString>,
    status_ttl: Duration,
) -> Vec<Arc<Device>> {
    let mut devices = Vec::new();
    for record in records {
        if record.mac.trim().is_empty() {
            warn!(product_key = %record.product_key, "skipping device record without a mac");
            continue;
        }
        let Some(device_type) = resolve_device_type(&record.product_key) else {
            info!(
                mac = %record.mac,
                product_key = %record.product_key,
                "skipping device with unsupported product key"
            );
            continue;
        };
        if device_type.capabilities.is_empty() {
            info!(mac = %record.mac, "skipping device with no supported capabilities");
            continue;
        }
        let info = DeviceInfo::from_record(record, device_type);
        debug!(mac = %info.mac, kind = %device_type.kind, "device classified");
        devices.push(Device::new(
            info,
            device_type,
            client.clone(),
            Arc::clone(token),
            status_ttl,
        ));
    }
    devices
}

async fn poll_task(account: Account, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let failures = account.update_all().await;
                debug!(failures, "poll cycle complete");
            }
        }
    }
    debug!("poll task stopped");
}
