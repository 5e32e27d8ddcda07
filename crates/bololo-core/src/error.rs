// ── Core error types ──
//
// Errors surfaced by the device layer. The cloud-boundary distinction
// (transport vs. HTTP vs. envelope) is preserved so an entity poll can be
// marked unavailable and a command failure can be reported with the server
// payload intact.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Cloud errors ─────────────────────────────────────────────────
    #[error("Cannot reach Bololo cloud at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {path} timed out after {timeout_secs}s")]
    Timeout { path: String, timeout_secs: u64 },

    #[error("HTTP {status} from {path}: {body}")]
    Http {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {path}: {envelope}")]
    UnexpectedResponse {
        path: String,
        code: Option<String>,
        envelope: String,
    },

    #[error("API error: {message}")]
    Api { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("Function '{function}' not found on device {device}")]
    FunctionNotFound { device: String, function: String },

    #[error("Status of device {mac} has no usable '{field}' field")]
    StatusFieldMissing { mac: String, field: String },

    #[error("Invalid option '{option}' for {function} (expected one of: {})", options.join(", "))]
    InvalidOption {
        function: String,
        option: String,
        options: Vec<String>,
    },

    #[error("Entity {unique_id} is detached from its device")]
    DeviceDetached { unique_id: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` if the failure happened before the server answered.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Timeout { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<bololo_api::Error> for CoreError {
    fn from(err: bololo_api::Error) -> Self {
        match err {
            // The client reports its own deadline as `Timeout`; anything left
            // here never got an answer from the server.
            bololo_api::Error::Transport(ref e) => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            bololo_api::Error::Timeout { path, timeout_secs } => {
                CoreError::Timeout { path, timeout_secs }
            }
            bololo_api::Error::Http { path, status, body } => {
                CoreError::Http { path, status, body }
            }
            bololo_api::Error::UnexpectedResponse {
                path,
                code,
                envelope,
            } => CoreError::UnexpectedResponse {
                path,
                code,
                envelope,
            },
            bololo_api::Error::Deserialization { path, message, .. } => CoreError::Api {
                message: format!("unreadable payload from {path}: {message}"),
            },
            bololo_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            bololo_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_failure_keeps_payload() {
        let err: CoreError = bololo_api::Error::UnexpectedResponse {
            path: "/app/user/loginByMobile".into(),
            code: Some("10010".into()),
            envelope: r#"{"code":"10010"}"#.into(),
        }
        .into();
        assert!(matches!(err, CoreError::UnexpectedResponse { .. }));
        assert!(err.to_string().contains(r#"{"code":"10010"}"#));
    }

    #[test]
    fn api_timeout_maps_to_timeout() {
        let err: CoreError = bololo_api::Error::Timeout {
            path: "/x".into(),
            timeout_secs: 10,
        }
        .into();
        assert!(err.is_transport());
    }

    #[test]
    fn invalid_option_lists_choices() {
        let err = CoreError::InvalidOption {
            function: "auto_time".into(),
            option: "45".into(),
            options: vec!["off".into(), "40".into()],
        };
        assert_eq!(
            err.to_string(),
            "Invalid option '45' for auto_time (expected one of: off, 40)"
        );
    }
}
