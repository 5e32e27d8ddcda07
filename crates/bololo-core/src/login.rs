// ── SMS login flow ──
//
// Two steps: ask the cloud to text a code, then trade the code for a user
// token. The resulting token goes into an `AccountConfig`.

use tracing::info;

use bololo_api::{BololoClient, LoginCredentials};

use crate::config::CloudConfig;
use crate::error::CoreError;

pub struct LoginFlow {
    client: BololoClient,
}

impl LoginFlow {
    pub fn new(cloud: &CloudConfig) -> Result<Self, CoreError> {
        Ok(Self {
            client: cloud.build_client()?,
        })
    }

    /// Text a one-time code to `mobile`.
    pub async fn request_code(&self, mobile: &str) -> Result<(), CoreError> {
        self.client.send_verify_code(mobile).await?;
        info!(mobile, "verification code requested");
        Ok(())
    }

    /// Exchange the code for credentials. A wrong or expired code surfaces
    /// as [`CoreError::UnexpectedResponse`] carrying the server envelope.
    pub async fn verify(&self, mobile: &str, code: &str) -> Result<LoginCredentials, CoreError> {
        let creds = self.client.login_by_mobile(mobile, code).await?;
        info!(mobile, user_id = ?creds.user_id, "logged in");
        Ok(creds)
    }
}
