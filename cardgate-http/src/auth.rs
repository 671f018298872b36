//! OAuth2 client-credentials authentication against the gateway.
//!
//! Every API call carries a bearer token obtained from the gateway's
//! `/oauth/auth` endpoint with the merchant's client ID and secret. Tokens
//! are cached and refreshed shortly before they expire, so callers never
//! handle them directly.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::constants::{AUTH_PATH, TOKEN_REFRESH_MARGIN};
use crate::error::HttpError;

/// Merchant API credentials issued by the gateway.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    /// Creates credentials from the merchant's client ID and secret.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Returns the client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

// The secret stays out of debug output.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Wire format of the token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// A cached bearer token with its expiry bookkeeping.
#[derive(Debug, Clone)]
struct BearerToken {
    token: String,
    acquired: Instant,
    lifetime: Duration,
}

impl BearerToken {
    /// Whether the token is within the refresh margin of expiring.
    fn needs_refresh(&self) -> bool {
        let safe_lifetime = self.lifetime.saturating_sub(TOKEN_REFRESH_MARGIN);
        self.acquired.elapsed() >= safe_lifetime
    }
}

/// Token cache shared by all calls on one client.
#[derive(Debug, Default)]
pub(crate) struct TokenCache {
    inner: Mutex<Option<BearerToken>>,
}

impl TokenCache {
    /// Returns a valid bearer token, fetching or refreshing as needed.
    ///
    /// The cache lock is held across the refresh so concurrent calls do not
    /// stampede the token endpoint.
    pub(crate) async fn bearer(
        &self,
        client: &reqwest::Client,
        base_url: &str,
        credentials: &Credentials,
    ) -> Result<String, HttpError> {
        let mut cached = self.inner.lock().await;
        if let Some(token) = cached.as_ref() {
            if !token.needs_refresh() {
                return Ok(token.token.clone());
            }
        }

        let fresh = Self::fetch(client, base_url, credentials).await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    async fn fetch(
        client: &reqwest::Client,
        base_url: &str,
        credentials: &Credentials,
    ) -> Result<BearerToken, HttpError> {
        let response = client
            .post(format!("{base_url}{AUTH_PATH}"))
            .form(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::Auth(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!(
            client_id = %credentials.client_id,
            expires_in = token.expires_in,
            "gateway bearer token refreshed"
        );

        Ok(BearerToken {
            token: token.access_token,
            acquired: Instant::now(),
            lifetime: Duration::from_secs(token.expires_in),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = Credentials::new("merchant-1", "very-secret");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("merchant-1"));
        assert!(!rendered.contains("very-secret"));
    }

    #[test]
    fn test_token_refresh_margin() {
        let token = BearerToken {
            token: "abc".to_owned(),
            acquired: Instant::now(),
            lifetime: Duration::from_secs(7200),
        };
        assert!(!token.needs_refresh());

        let expiring = BearerToken {
            lifetime: TOKEN_REFRESH_MARGIN,
            ..token
        };
        assert!(expiring.needs_refresh());
    }
}
