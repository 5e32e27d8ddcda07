//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use bololo_config::ConfigError;
use bololo_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Bololo cloud at {url}")]
    #[diagnostic(
        code(bololo::connection_failed),
        help(
            "Check your network connection.\n\
             If you use a custom --base-url, make sure it is reachable."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login failed: {message}")]
    #[diagnostic(
        code(bololo::login_failed),
        help(
            "The code may be wrong or expired.\n\
             Request a new code and retry: bololo login"
        )
    )]
    LoginFailed { message: String },

    #[error("The cloud rejected the token for profile '{profile}': {message}")]
    #[diagnostic(
        code(bololo::auth_failed),
        help("Log in again to refresh the token: bololo login --profile {profile}")
    )]
    AuthFailed { profile: String, message: String },

    #[error("No token configured for profile '{profile}'")]
    #[diagnostic(
        code(bololo::no_credentials),
        help(
            "Log in with: bololo login\n\
             Or set the BOLOLO_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(bololo::not_found),
        help("Run: bololo {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(bololo::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(bololo::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(bololo::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: bololo login --profile {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No account configured")]
    #[diagnostic(
        code(bololo::no_config),
        help(
            "Log in first with: bololo login --app-key <KEY> --mobile <NUMBER>\n\
             Config file: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(bololo::config))]
    Config(Box<figment::Error>),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request to {path} timed out after {seconds}s")]
    #[diagnostic(
        code(bololo::timeout),
        help("Increase the deadline with --timeout or try again later.")
    )]
    Timeout { path: String, seconds: u64 },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to write config: {0}")]
    #[diagnostic(code(bololo::config_write))]
    ConfigWrite(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::LoginFailed { .. } | Self::AuthFailed { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
            ConfigError::Serialization(e) => CliError::ConfigWrite(e.to_string()),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout { path, timeout_secs } => CliError::Timeout {
                path,
                seconds: timeout_secs,
            },

            CoreError::Http { path, status, body } => CliError::ApiError {
                code: format!("http {status}"),
                message: format!("{path}: {body}"),
            },

            CoreError::UnexpectedResponse {
                path,
                code,
                envelope,
            } => CliError::ApiError {
                code: code.unwrap_or_else(|| "malformed".into()),
                message: format!("{path}: {envelope}"),
            },

            CoreError::Api { message } => CliError::ApiError {
                code: "api".into(),
                message,
            },

            CoreError::DeviceNotFound { identifier } => CliError::NotFound {
                resource_type: "device".into(),
                identifier,
                list_command: "devices list".into(),
            },

            CoreError::FunctionNotFound { device, function } => CliError::NotFound {
                resource_type: "function".into(),
                identifier: function,
                list_command: format!("entities list {device}"),
            },

            CoreError::StatusFieldMissing { mac, field } => CliError::ApiError {
                code: "missing_field".into(),
                message: format!("status of {mac} has no usable '{field}'"),
            },

            CoreError::InvalidOption {
                function,
                option,
                options,
            } => CliError::Validation {
                field: function,
                reason: format!("'{option}' is not one of: {}", options.join(", ")),
            },

            CoreError::DeviceDetached { unique_id } => CliError::ApiError {
                code: "detached".into(),
                message: format!("entity {unique_id} is no longer attached to a device"),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}
