use thiserror::Error;

/// Top-level error type for the `bololo-api` crate.
///
/// Every failure at the cloud boundary lands in exactly one variant, so
/// callers can tell a dead network apart from an HTTP rejection or a
/// well-formed envelope carrying a non-success code. `bololo-core` maps
/// these into its own diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, reset, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request plus response parsing did not finish within the deadline.
    #[error("Request to {path} timed out after {timeout_secs}s")]
    Timeout { path: String, timeout_secs: u64 },

    /// TLS configuration or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP ────────────────────────────────────────────────────────
    /// Non-success HTTP status. Carries the raw body text for diagnostics.
    #[error("HTTP {status} from {path}: {body}")]
    Http {
        path: String,
        status: u16,
        body: String,
    },

    // ── Envelope ────────────────────────────────────────────────────
    /// HTTP succeeded but the `{code, data, message}` envelope did not carry
    /// `code == "200"`, or could not be parsed as an envelope at all.
    #[error("Unexpected response from {path}: {envelope}")]
    UnexpectedResponse {
        path: String,
        /// Envelope `code`, if the body parsed as an envelope.
        code: Option<String>,
        /// Raw response body as received.
        envelope: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// The envelope was accepted but `data` did not fit the expected shape.
    #[error("Deserialization error for {path}: {message}")]
    Deserialization {
        path: String,
        message: String,
        body: String,
    },
}

impl Error {
    /// Returns `true` if the deadline around the call was exceeded.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying by a caller.
    ///
    /// The client itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the server answered with an envelope we did not accept.
    pub fn is_unexpected_response(&self) -> bool {
        matches!(self, Self::UnexpectedResponse { .. })
    }

    /// The envelope `code`, if the server sent one.
    pub fn envelope_code(&self) -> Option<&str> {
        match self {
            Self::UnexpectedResponse { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// The HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
