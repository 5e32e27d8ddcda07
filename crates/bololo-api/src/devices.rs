// Device, home, status and control endpoints
//
// All of these are authorized with the user token from `login_by_mobile`,
// sent verbatim (no scheme prefix) in the `Authorization` header.

use secrecy::SecretString;
use serde_json::json;
use tracing::{debug, warn};

use crate::auth::API_VERSION;
use crate::client::BololoClient;
use crate::error::Error;
use crate::models::{DeviceRecord, HomeRecord, StatusMap};

impl BololoClient {
    /// List every device registered to the user.
    ///
    /// `GET /app/smartHome/v2/users/devices`. Records are parsed one by one;
    /// a record that does not fit [`DeviceRecord`] is logged and skipped so
    /// the rest of the account stays usable.
    pub async fn list_devices(&self, token: &SecretString) -> Result<Vec<DeviceRecord>, Error> {
        debug!("listing devices");
        let raw: Option<Vec<serde_json::Value>> = self
            .get("/app/smartHome/v2/users/devices", Some(token))
            .await?;

        let devices = raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<DeviceRecord>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable device record");
                    None
                }
            })
            .collect();
        Ok(devices)
    }

    /// List the user's homes and their rooms.
    ///
    /// `GET /app/smartHome/v2/homes`
    pub async fn list_homes(&self, token: &SecretString) -> Result<Vec<HomeRecord>, Error> {
        debug!("listing homes");
        let homes: Option<Vec<HomeRecord>> =
            self.get("/app/smartHome/v2/homes", Some(token)).await?;
        Ok(homes.unwrap_or_default())
    }

    /// Fetch the raw status map of one device.
    ///
    /// `POST /bololo/app/device/status/{product_key}/{mac}` with an empty
    /// JSON object as body.
    pub async fn device_status(
        &self,
        token: &SecretString,
        product_key: &str,
        mac: &str,
    ) -> Result<StatusMap, Error> {
        debug!(product_key, mac, "fetching device status");
        let url = self.device_url("/bololo/app/device/status", product_key, mac)?;
        self.post_url(url, Some(token), &json!({})).await
    }

    /// Send a control patch (`server field -> value`) to one device.
    ///
    /// `POST /bololo/app/device/control/{product_key}/{mac}`. The patch is
    /// JSON-encoded into a string under `data`, as the app does.
    pub async fn control_device(
        &self,
        token: &SecretString,
        product_key: &str,
        mac: &str,
        patch: &StatusMap,
    ) -> Result<(), Error> {
        debug!(product_key, mac, ?patch, "controlling device");
        let url = self.device_url("/bololo/app/device/control", product_key, mac)?;
        let body = json!({
            "appKey": self.app_key(),
            "data": serde_json::Value::Object(patch.clone()).to_string(),
            "version": API_VERSION,
        });
        let ack: Option<bool> = self.post_url(url, Some(token), &body).await?;
        if ack == Some(false) {
            warn!(mac, "control accepted but not acknowledged by device");
        }
        Ok(())
    }
}
