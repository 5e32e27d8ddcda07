// SMS one-time-code authentication
//
// Two-step login: request a code for a mobile number, then exchange the
// code for credentials. Neither call needs an `Authorization` header.

use serde_json::json;
use tracing::debug;

use crate::client::BololoClient;
use crate::error::Error;
use crate::models::LoginCredentials;

/// Protocol version string the app sends in every POST body.
pub(crate) const API_VERSION: &str = "1.0";

/// Country code and language attached to login requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub country_code: String,
    pub lang: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            country_code: "CN".into(),
            lang: "zh".into(),
        }
    }
}

impl BololoClient {
    /// Ask the cloud to text a one-time code to `mobile`.
    ///
    /// `POST /app/user/mobileCode`
    pub async fn send_verify_code(&self, mobile: &str) -> Result<(), Error> {
        debug!(mobile, "requesting verify code");
        let body = json!({
            "appKey": self.app_key(),
            "data": {
                "mobile": mobile,
                "lang": self.locale().lang,
            },
            "version": API_VERSION,
        });
        let _: serde_json::Value = self.post("/app/user/mobileCode", None, &body).await?;
        Ok(())
    }

    /// Exchange a one-time code for credentials.
    ///
    /// `POST /app/user/loginByMobile`. The returned `user_token` is what every
    /// authorized endpoint expects in the `Authorization` header.
    pub async fn login_by_mobile(
        &self,
        mobile: &str,
        code: &str,
    ) -> Result<LoginCredentials, Error> {
        debug!(mobile, "logging in by mobile");
        let locale = self.locale();
        let body = json!({
            "appKey": self.app_key(),
            "data": {
                "mobile": mobile,
                "code": code,
                "mobileCountryCode": locale.country_code,
                "lang": locale.lang,
            },
            "version": API_VERSION,
        });
        let creds: LoginCredentials = self.post("/app/user/loginByMobile", None, &body).await?;
        debug!(user_id = ?creds.user_id, "login successful");
        Ok(creds)
    }
}
