//! Direct login: obtaining a token from a username and password through the
//! authorization page, without a browser.
//!
//! This is best effort. It depends on the markup of the service's login page, so it is
//! isolated behind the [`DirectLogin`] trait and can be swapped or stubbed.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use http::header::{CONTENT_TYPE, REFERER, USER_AGENT};
use http::{HeaderMap, HeaderValue, Method};
use regex::{Captures, Regex};
use tracing::debug;
use url::Url;

use super::config::Credentials;
use super::error::OAuth2Error;
use super::token::AccessToken;
use crate::client::{
    ApiClientError, BlockingTransport, DEFAULT_TIMEOUT, HttpRequest, HttpTransport,
};
use crate::encoding::encode_component;

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\{"access_token":"(?<token>.{0,32})","remind_in":"(?<remind>\d+)","expires_in":(?<expires>\d+),"uid":"(?<uid>\d+)"\}"#,
    )
    .expect("a valid regex")
});

static TOKEN_WITH_REFRESH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\{"access_token":"(?<token>.{0,32})","remind_in":"(?<remind>\d+)","expires_in":(?<expires>\d+),"refresh_token":"(?<refresh>.{0,32})","uid":"(?<uid>\d+)"\}"#,
    )
    .expect("a valid regex")
});

/// What a direct login needs to know about the application.
#[derive(Debug, Clone)]
pub struct LoginContext<'a> {
    /// The application credentials.
    pub credentials: &'a Credentials,
    /// The endpoint the login form is posted to.
    pub authorize: &'a Url,
    /// The authorization page the form is posted from.
    pub referer: Url,
    /// The `User-Agent` the form is posted with.
    pub user_agent: &'a HeaderValue,
}

/// A way of exchanging a username and password for an access token.
pub trait DirectLogin {
    /// Attempts the login.
    ///
    /// Returns `Ok(None)` when the service answered but no token could be found.
    ///
    /// # Errors
    ///
    /// Returns an error when the login request itself fails.
    fn attempt_direct_login(
        &self,
        context: &LoginContext<'_>,
        username: &str,
        password: &str,
    ) -> Result<Option<AccessToken>, OAuth2Error>;
}

/// Posts the authorization page's login form and scrapes the token from the result page.
///
/// Uses its own cookie-enabled transport, separate from the API client.
#[derive(Debug, Clone)]
pub struct WebFormLogin {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl WebFormLogin {
    /// Creates a login backed by a cookie-enabled `reqwest` blocking client.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, OAuth2Error> {
        let transport =
            BlockingTransport::with_cookie_store().map_err(ApiClientError::Transport)?;
        Ok(Self::with_transport(transport))
    }

    /// Creates a login posting through the given transport.
    pub fn with_transport(transport: impl HttpTransport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn form_body(context: &LoginContext<'_>, username: &str, password: &str) -> String {
        let callback_url = context.credentials.callback_url().unwrap_or_default();
        format!(
            "action=submit&withOfficalFlag=0&ticket=&isLoginSina=&response_type=token&regCallback=&redirect_uri={}&client_id={}&state=&from=&userId={}&passwd={}&display=js",
            encode_component(callback_url),
            encode_component(context.credentials.app_key()),
            encode_component(username),
            encode_component(password),
        )
    }
}

impl DirectLogin for WebFormLogin {
    fn attempt_direct_login(
        &self,
        context: &LoginContext<'_>,
        username: &str,
        password: &str,
    ) -> Result<Option<AccessToken>, OAuth2Error> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, context.user_agent.clone());
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        headers.insert(
            REFERER,
            HeaderValue::from_str(context.referer.as_str()).map_err(ApiClientError::from)?,
        );

        let request = HttpRequest {
            method: Method::POST,
            url: context.authorize.clone(),
            headers,
            body: Some(Self::form_body(context, username, password).into_bytes()),
            timeout: Some(self.timeout),
        };

        debug!(url = %context.authorize, "posting direct login form");
        let response = self
            .transport
            .execute(request)
            .map_err(ApiClientError::Transport)?;
        debug!(status = response.status, body_len = response.body.len(), "received login page");

        if !response.is_success() {
            return Err(ApiClientError::UnexpectedStatusCode {
                status_code: response.status,
                body: response.body.chars().take(1024).collect(),
            }
            .into());
        }

        Ok(extract_token_from_page(&response.body))
    }
}

/// Finds the token JSON fragment embedded in the login result page.
///
/// Two shapes are recognized: with and without a `refresh_token` before `uid`.
/// The refresh-token shape is tried first when the page mentions `refresh_token`.
///
/// ```rust
/// use weibo_core::oauth2::extract_token_from_page;
///
/// let page = r#"<script>cb({"access_token":"2.00abc","remind_in":"3600","expires_in":3600,"uid":"42"})</script>"#;
/// let token = extract_token_from_page(page).unwrap();
/// assert_eq!(token.uid(), "42");
/// ```
pub fn extract_token_from_page(html: &str) -> Option<AccessToken> {
    let captures = if html.contains("refresh_token") {
        TOKEN_WITH_REFRESH_PATTERN
            .captures(html)
            .or_else(|| TOKEN_PATTERN.captures(html))
    } else {
        TOKEN_PATTERN.captures(html)
    };

    token_from_captures(&captures?)
}

fn token_from_captures(captures: &Captures<'_>) -> Option<AccessToken> {
    let token = captures.name("token")?.as_str();
    let uid = captures.name("uid")?.as_str();
    let expires = captures.name("expires")?.as_str().parse::<u64>().ok()?;

    let access_token = AccessToken::new(token, uid, Duration::from_secs(expires));
    Some(match captures.name("refresh") {
        Some(refresh) if !refresh.as_str().is_empty() => {
            access_token.with_refresh_token(refresh.as_str())
        }
        _ => access_token,
    })
}
