// Cloud API HTTP client
//
// Wraps `reqwest::Client` with URL construction against the vendor host,
// the per-call deadline, and envelope unwrapping. Endpoint methods live in
// `auth.rs` and `devices.rs` as inherent impls so this module stays focused
// on transport mechanics.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::auth::Locale;
use crate::error::Error;
use crate::models::Envelope;
use crate::transport::TransportConfig;

/// Production app host.
pub const DEFAULT_BASE_URL: &str = "https://app.bololoapp3.com";

/// Raw HTTP client for the vendor cloud.
///
/// Every call goes through one execution path: build the request, attach
/// `Authorization` when a token is given, bound send + parse by the deadline,
/// and unwrap the `{code, data, message}` envelope. Methods return the
/// `data` payload; the envelope is stripped before the caller sees it.
///
/// No retries happen here. Each response is consumed and dropped inside
/// the call that produced it.
#[derive(Debug, Clone)]
pub struct BololoClient {
    http: reqwest::Client,
    base_url: Url,
    app_key: String,
    locale: Locale,
    timeout: Duration,
}

impl BololoClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `app_key` is the vendor-issued application key sent in every
    /// POST body.
    pub fn new(
        base_url: Url,
        app_key: impl Into<String>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            app_key: app_key.into(),
            locale: Locale::default(),
            timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        app_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            base_url,
            app_key: app_key.into(),
            locale: Locale::default(),
            timeout,
        }
    }

    /// Override the country code and language sent with SMS login requests.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// The vendor host this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The deadline applied to each call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}{path}`. `path` must start with `/`.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// Build `{base}{prefix}/{product_key}/{mac}`, encoding both trailing
    /// values as single path segments.
    pub(crate) fn device_url(
        &self,
        prefix: &str,
        product_key: &str,
        mac: &str,
    ) -> Result<Url, Error> {
        let mut url = self.url(prefix)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(product_key)
            .push(mac);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);
        let builder = Self::authorize(self.http.get(url), token);
        self.execute(path, builder).await
    }

    /// Send a POST request with a JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        self.post_url(url, token, body).await
    }

    /// Send a POST request to a pre-built URL and unwrap the envelope.
    pub(crate) async fn post_url<T: DeserializeOwned>(
        &self,
        url: Url,
        token: Option<&SecretString>,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let path = url.path().to_owned();
        debug!("POST {}", url);
        let builder = Self::authorize(self.http.post(url).json(body), token);
        self.execute(&path, builder).await
    }

    fn authorize(
        builder: reqwest::RequestBuilder,
        token: Option<&SecretString>,
    ) -> reqwest::RequestBuilder {
        match token {
            Some(token) => builder.header(AUTHORIZATION, token.expose_secret()),
            None => builder,
        }
    }

    /// Run send + parse under one deadline.
    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, Error> {
        let call = async {
            let resp = builder.send().await.map_err(Error::Transport)?;
            Self::parse_envelope(path, resp).await
        };

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Err(Error::Transport(e))) if e.is_timeout() => Err(self.deadline_error(path)),
            Ok(result) => result,
            Err(_) => Err(self.deadline_error(path)),
        }
    }

    fn deadline_error(&self, path: &str) -> Error {
        warn!(path, timeout = ?self.timeout, "request deadline exceeded");
        Error::Timeout {
            path: path.to_owned(),
            timeout_secs: self.timeout.as_secs(),
        }
    }

    /// Parse the `{code, data, message}` envelope, returning `data` when the
    /// HTTP status is a success and `code == "200"`.
    async fn parse_envelope<T: DeserializeOwned>(
        path: &str,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(path, status = status.as_u16(), "request failed");
            return Err(Error::Http {
                path: path.to_owned(),
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(path, body = %body, "response body");

        let Ok(envelope) = serde_json::from_str::<Envelope<serde_json::Value>>(&body) else {
            return Err(Error::UnexpectedResponse {
                path: path.to_owned(),
                code: None,
                envelope: body,
            });
        };

        if !envelope.is_success() {
            return Err(Error::UnexpectedResponse {
                path: path.to_owned(),
                code: Some(envelope.code),
                envelope: body,
            });
        }

        debug!(path, "request succeeded");
        let data = envelope.data.unwrap_or(serde_json::Value::Null);
        serde_json::from_value(data).map_err(|e| Error::Deserialization {
            path: path.to_owned(),
            message: e.to_string(),
            body,
        })
    }
}
