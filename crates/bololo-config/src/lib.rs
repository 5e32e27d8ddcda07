//! Shared configuration for the Bololo CLI.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `bololo_core::AccountConfig`. The CLI layers its
//! `GlobalOpts` overrides on top of what this crate produces.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use bololo_core::{AccountConfig, CloudConfig, TlsVerification};

/// Keyring service name; entries are keyed `{profile}/token`.
const KEYRING_SERVICE: &str = "bololo";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Profile name to use when none is given explicitly.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Per-request deadline, seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Status cache staleness window, seconds.
    #[serde(default = "default_status_ttl")]
    pub status_ttl: u64,

    /// `watch` poll interval, seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            status_ttl: default_status_ttl(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_status_ttl() -> u64 {
    10
}
fn default_poll_interval() -> u64 {
    30
}

/// A named account profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Vendor application key.
    pub app_key: Option<String>,

    /// Mobile number the account logs in with.
    pub mobile: Option<String>,

    /// User token (plaintext, prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the token.
    pub token_env: Option<String>,

    /// Cloud base URL override.
    pub base_url: Option<String>,

    pub country_code: Option<String>,

    pub lang: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "bololo", "bololo").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("bololo");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, merged over defaults and under `BOLOLO_*`
/// env vars (`__` separates nested keys, e.g. `BOLOLO_DEFAULTS__TIMEOUT`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("BOLOLO_").split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), profiles = config.profiles.len(), "config loaded");
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token storage & resolution ──────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Option<keyring::Entry> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token")).ok()
}

/// Store a token in the system keyring. Returns `false` when no keyring
/// backend is usable, in which case the caller should fall back to the
/// profile's plaintext `token`.
pub fn store_token(profile_name: &str, token: &str) -> bool {
    keyring_entry(profile_name).is_some_and(|entry| entry.set_password(token).is_ok())
}

/// Resolve the user token from the credential chain (no CLI flag step).
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Some(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Translation to runtime config ───────────────────────────────────

/// Build the cloud-side config (no token) from a profile.
pub fn profile_to_cloud_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<CloudConfig, ConfigError> {
    let app_key = profile
        .app_key
        .clone()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ConfigError::Validation {
            field: "app_key".into(),
            reason: "not set".into(),
        })?;

    let mut cloud = CloudConfig::new(app_key).map_err(|e| ConfigError::Validation {
        field: "base_url".into(),
        reason: e.to_string(),
    })?;

    if let Some(ref raw) = profile.base_url {
        cloud.base_url = raw.parse().map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
    }
    if let Some(ref cc) = profile.country_code {
        cloud.country_code.clone_from(cc);
    }
    if let Some(ref lang) = profile.lang {
        cloud.lang.clone_from(lang);
    }

    cloud.tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };
    cloud.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(cloud)
}

/// Build an `AccountConfig` from a profile, no CLI flag overrides.
pub fn profile_to_account_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<AccountConfig, ConfigError> {
    let cloud = profile_to_cloud_config(profile, defaults)?;
    let token = resolve_token(profile, profile_name)?;
    let mobile = profile.mobile.clone().unwrap_or_default();

    Ok(AccountConfig::new(cloud, mobile, token)
        .with_status_ttl(Duration::from_secs(defaults.status_ttl)))
}
