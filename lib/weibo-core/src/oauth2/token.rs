//! Access token type and the token endpoint response.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::de::{string_or_number, u64_from_string_or_number};

/// An access token with the account it belongs to.
///
/// The token and refresh token are zeroed on drop and never printed by `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AccessToken {
    token: String,
    uid: String,
    #[zeroize(skip)]
    expires_in: Duration,
    refresh_token: Option<String>,
    #[zeroize(skip)]
    obtained_at: Instant,
}

impl AccessToken {
    /// Creates a token obtained now.
    pub fn new(token: impl Into<String>, uid: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            token: token.into(),
            uid: uid.into(),
            expires_in,
            refresh_token: None,
            obtained_at: Instant::now(),
        }
    }

    /// Sets the refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Returns the access token value.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the id of the account the token was issued for.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Returns the validity period announced by the service.
    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// Returns the refresh token if available.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Checks if the validity period has elapsed since the token was obtained.
    pub fn is_expired(&self) -> bool {
        self.obtained_at.elapsed() >= self.expires_in
    }

    /// Returns the time until expiration, `None` once expired.
    pub fn time_until_expiry(&self) -> Option<Duration> {
        self.expires_in
            .checked_sub(self.obtained_at.elapsed())
            .filter(|remaining| !remaining.is_zero())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("uid", &self.uid)
            .field("expires_in", &self.expires_in)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// The JSON body returned by the token endpoint.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    #[serde(default, deserialize_with = "u64_from_string_or_number")]
    expires_in: u64,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    uid: String,
}

impl From<TokenResponse> for AccessToken {
    fn from(response: TokenResponse) -> Self {
        let TokenResponse {
            access_token,
            expires_in,
            refresh_token,
            uid,
        } = response;
        let token = Self::new(access_token, uid, Duration::from_secs(expires_in));
        match refresh_token.filter(|refresh| !refresh.is_empty()) {
            Some(refresh) => token.with_refresh_token(refresh),
            None => token,
        }
    }
}
