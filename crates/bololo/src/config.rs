//! CLI configuration: thin wrapper around `bololo_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--app-key, --token, etc.).

use std::time::Duration;

use secrecy::SecretString;

use bololo_core::{AccountConfig, CloudConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use bololo_config::{
    Config, Profile, config_path, load_config, load_config_or_default, save_config, store_token,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Apply flag overrides onto a copy of the profile (flags win).
pub fn profile_with_overrides(profile: Option<&Profile>, global: &GlobalOpts) -> Profile {
    let mut merged = profile.cloned().unwrap_or_default();
    if let Some(ref key) = global.app_key {
        merged.app_key = Some(key.clone());
    }
    if let Some(ref mobile) = global.mobile {
        merged.mobile = Some(mobile.clone());
    }
    if let Some(ref url) = global.base_url {
        merged.base_url = Some(url.clone());
    }
    if global.insecure {
        merged.insecure = Some(true);
    }
    merged
}

/// Build the cloud half of the config from profile + flags.
pub fn resolve_cloud_config(
    profile: Option<&Profile>,
    config: &Config,
    global: &GlobalOpts,
) -> Result<CloudConfig, CliError> {
    let merged = profile_with_overrides(profile, global);
    let mut cloud = bololo_config::profile_to_cloud_config(&merged, &config.defaults)?;

    if let Some(secs) = global.timeout {
        cloud.timeout = Duration::from_secs(secs);
    }
    if global.insecure {
        cloud.tls = TlsVerification::DangerAcceptInvalid;
    }
    Ok(cloud)
}

/// Build a full `AccountConfig` for commands that talk to devices.
pub fn resolve_account_config(global: &GlobalOpts) -> Result<AccountConfig, CliError> {
    let config = load_config_or_default();
    let profile_name = active_profile_name(global, &config);
    let profile = config.profiles.get(&profile_name);

    if profile.is_none() && global.app_key.is_none() {
        if global.profile.is_some() {
            let mut available: Vec<_> = config.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }

    let cloud = resolve_cloud_config(profile, &config, global)?;
    let token = resolve_token_with_flag(profile, &profile_name, global)?;
    let mobile = global
        .mobile
        .clone()
        .or_else(|| profile.and_then(|p| p.mobile.clone()))
        .unwrap_or_default();

    Ok(AccountConfig::new(cloud, mobile, token)
        .with_status_ttl(Duration::from_secs(config.defaults.status_ttl)))
}

/// Resolve the token with CLI flag override, then fall through to shared resolution.
fn resolve_token_with_flag(
    profile: Option<&Profile>,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<SecretString, CliError> {
    if let Some(ref token) = global.token {
        return Ok(SecretString::from(token.clone()));
    }
    match profile {
        Some(profile) => Ok(bololo_config::resolve_token(profile, profile_name)?),
        None => Err(CliError::NoCredentials {
            profile: profile_name.to_owned(),
        }),
    }
}
