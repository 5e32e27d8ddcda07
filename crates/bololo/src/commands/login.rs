//! SMS login: request a code, trade it for a token, save the profile.

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};

use bololo_core::{CoreError, LoginFlow};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt(label: &str) -> Result<String, CliError> {
    let value: String = Input::new()
        .with_prompt(label)
        .interact_text()
        .map_err(prompt_err)?;
    let value = value.trim().to_owned();
    if value.is_empty() {
        return Err(CliError::Validation {
            field: label.to_lowercase(),
            reason: "cannot be empty".into(),
        });
    }
    Ok(value)
}

/// A rejected envelope here means the code was wrong or expired.
fn login_error(err: CoreError) -> CliError {
    match err {
        CoreError::UnexpectedResponse { envelope, .. } => CliError::LoginFailed { message: envelope },
        other => other.into(),
    }
}

pub async fn handle(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);
    let mut profile = config::profile_with_overrides(cfg.profiles.get(&profile_name), global);

    if profile.app_key.is_none() {
        profile.app_key = Some(prompt("App key")?);
    }
    let mobile = match profile.mobile.clone() {
        Some(m) => m,
        None => prompt("Mobile number")?,
    };
    profile.mobile = Some(mobile.clone());

    let cloud = config::resolve_cloud_config(Some(&profile), &cfg, global)?;
    let flow = LoginFlow::new(&cloud)?;

    let code = if let Some(code) = args.code {
        code
    } else {
        flow.request_code(&mobile).await?;
        if !global.quiet {
            eprintln!("Verification code sent to {mobile}");
        }
        prompt("Verification code")?
    };

    let creds = flow.verify(&mobile, &code).await.map_err(login_error)?;
    let token = SecretString::from(creds.user_token);

    let in_keyring = !args.plaintext && config::store_token(&profile_name, token.expose_secret());
    profile.token = if in_keyring {
        None
    } else {
        Some(token.expose_secret().to_owned())
    };

    if cfg.profiles.is_empty() {
        cfg.default_profile = Some(profile_name.clone());
    }
    cfg.profiles.insert(profile_name.clone(), profile);
    config::save_config(&cfg)?;

    if !global.quiet {
        let stored = if in_keyring {
            "system keyring"
        } else {
            "config file"
        };
        eprintln!("Logged in as {mobile}, token saved to the {stored} (profile '{profile_name}')");
    }
    Ok(())
}
