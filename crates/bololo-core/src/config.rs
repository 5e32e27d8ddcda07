// ── Runtime account configuration ──
//
// These types describe *how* to reach the vendor cloud and which account to
// act as. They carry credential data and tuning, but never touch disk.
// The CLI (via `bololo-config`) constructs an `AccountConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use bololo_api::transport::{TlsMode, TransportConfig};
use bololo_api::{BololoClient, Locale};

use crate::error::CoreError;

/// How long a fetched status snapshot is served before the next read refetches.
pub const DEFAULT_STATUS_TTL: Duration = Duration::from_secs(10);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification.
    DangerAcceptInvalid,
}

/// Everything needed to talk to the cloud, independent of any login.
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Vendor host (defaults to [`bololo_api::DEFAULT_BASE_URL`]).
    pub base_url: Url,
    /// Vendor-issued application key.
    pub app_key: String,
    pub tls: TlsVerification,
    /// Deadline for each cloud call.
    pub timeout: Duration,
    pub country_code: String,
    pub lang: String,
}

impl CloudConfig {
    pub fn new(app_key: impl Into<String>) -> Result<Self, CoreError> {
        let base_url = Url::parse(bololo_api::DEFAULT_BASE_URL).map_err(|e| CoreError::Config {
            message: format!("invalid default base URL: {e}"),
        })?;
        let locale = Locale::default();
        Ok(Self {
            base_url,
            app_key: app_key.into(),
            tls: TlsVerification::default(),
            timeout: bololo_api::DEFAULT_TIMEOUT,
            country_code: locale.country_code,
            lang: locale.lang,
        })
    }

    /// Build the API client this configuration describes.
    pub fn build_client(&self) -> Result<BololoClient, CoreError> {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        let transport = TransportConfig::default()
            .with_tls(tls)
            .with_timeout(self.timeout);
        let client = BololoClient::new(self.base_url.clone(), self.app_key.clone(), &transport)?;
        Ok(client.with_locale(Locale {
            country_code: self.country_code.clone(),
            lang: self.lang.clone(),
        }))
    }
}

/// Configuration for one logged-in account.
///
/// Built by the host, passed to [`Account::setup`](crate::Account::setup).
#[derive(Debug, Clone)]
pub struct AccountConfig {
    pub cloud: CloudConfig,
    /// Mobile number the account logged in with.
    pub mobile: String,
    /// User token from `loginByMobile`. Read-only for the account's lifetime.
    pub token: SecretString,
    /// Staleness window of each device's status cache.
    pub status_ttl: Duration,
}

impl AccountConfig {
    pub fn new(cloud: CloudConfig, mobile: impl Into<String>, token: SecretString) -> Self {
        Self {
            cloud,
            mobile: mobile.into(),
            token,
            status_ttl: DEFAULT_STATUS_TTL,
        }
    }

    pub fn with_status_ttl(mut self, ttl: Duration) -> Self {
        self.status_ttl = ttl;
        self
    }
}
