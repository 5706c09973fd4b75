//! Application credentials and endpoint configuration.

use std::fmt;

use url::Url;

use super::error::OAuth2Error;
use crate::client::SecureString;

const DEFAULT_BASE_URL: &str = "https://api.weibo.com/";
const AUTHORIZE_PATH: &str = "oauth2/authorize";
const ACCESS_TOKEN_PATH: &str = "oauth2/access_token";
const VERIFY_PATH: &str = "2/account/get_uid.json";

/// The application key, secret and registered callback URL.
#[derive(Clone)]
pub struct Credentials {
    pub(crate) app_key: String,
    pub(crate) app_secret: SecureString,
    pub(crate) callback_url: Option<String>,
}

impl Credentials {
    /// Creates credentials without a callback URL.
    pub fn new(app_key: impl Into<String>, app_secret: impl Into<SecureString>) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: app_secret.into(),
            callback_url: None,
        }
    }

    /// Sets the callback URL registered for the application.
    #[must_use]
    pub fn with_callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    /// Returns the application key.
    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    /// Returns the callback URL, if set.
    pub fn callback_url(&self) -> Option<&str> {
        self.callback_url.as_deref()
    }

    pub(crate) fn app_secret(&self) -> &SecureString {
        &self.app_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_key", &self.app_key)
            .field("app_secret", &"[REDACTED]")
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

/// The URLs the token manager talks to.
///
/// Defaults to the production service. [`OAuthEndpoints::with_base_url`] rebases every
/// endpoint, which is how tests point the crate at a local server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthEndpoints {
    /// The authorization page, e.g. `https://api.weibo.com/oauth2/authorize`.
    pub authorize: Url,
    /// The token endpoint, e.g. `https://api.weibo.com/oauth2/access_token`.
    pub access_token: Url,
    /// The identity probe, e.g. `https://api.weibo.com/2/account/get_uid.json`.
    pub verify: Url,
    /// The base that API paths such as `2/common/get_timezone.json` resolve against.
    pub api_base: Url,
}

impl Default for OAuthEndpoints {
    fn default() -> Self {
        match Self::with_base_url(DEFAULT_BASE_URL) {
            Ok(endpoints) => endpoints,
            Err(error) => unreachable!("the default base URL is valid: {error}"),
        }
    }
}

impl OAuthEndpoints {
    /// Derives every endpoint from a single base URL.
    ///
    /// # Errors
    ///
    /// Returns [`OAuth2Error::InvalidEndpoint`] if `base_url` is not an absolute
    /// `http` or `https` URL.
    pub fn with_base_url(base_url: impl AsRef<str>) -> Result<Self, OAuth2Error> {
        let raw = base_url.as_ref();
        let mut api_base = parse_endpoint(raw)?;
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        let join = |path: &str| {
            api_base
                .join(path)
                .map_err(|error| OAuth2Error::InvalidEndpoint {
                    url: raw.to_string(),
                    reason: error.to_string(),
                })
        };

        Ok(Self {
            authorize: join(AUTHORIZE_PATH)?,
            access_token: join(ACCESS_TOKEN_PATH)?,
            verify: join(VERIFY_PATH)?,
            api_base: api_base.clone(),
        })
    }

    /// Resolves an API path such as `2/account/get_uid.json` against the base URL.
    ///
    /// # Errors
    ///
    /// Fails if the joined URL does not parse.
    pub fn api_url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.api_base.join(path.trim_start_matches('/'))
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, OAuth2Error> {
    let url = Url::parse(raw).map_err(|error| OAuth2Error::InvalidEndpoint {
        url: raw.to_string(),
        reason: error.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(OAuth2Error::InvalidEndpoint {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// What the authorization page hands back to the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResponseType {
    /// An authorization code, to exchange with [`TokenManager::exchange_authorization_code`](super::TokenManager::exchange_authorization_code).
    #[default]
    Code,
    /// An access token, directly.
    Token,
}

impl ResponseType {
    /// Returns the query-string value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Token => "token",
        }
    }
}

/// How the authorization page is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayType {
    /// Desktop browser.
    #[default]
    Default,
    /// Mobile browser.
    Mobile,
    /// Popup window.
    Popup,
    /// WAP 1.2 page.
    Wap12,
    /// WAP 2.0 page.
    Wap20,
    /// JavaScript callback.
    Js,
    /// Application hosted on the service site.
    AppOnWeibo,
}

impl DisplayType {
    /// Returns the query-string value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Mobile => "mobile",
            Self::Popup => "popup",
            Self::Wap12 => "wap12",
            Self::Wap20 => "wap20",
            Self::Js => "js",
            Self::AppOnWeibo => "apponweibo",
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn should_default_to_production_endpoints() {
        let endpoints = OAuthEndpoints::default();

        assert_eq!(
            endpoints.authorize.as_str(),
            "https://api.weibo.com/oauth2/authorize"
        );
        assert_eq!(
            endpoints.access_token.as_str(),
            "https://api.weibo.com/oauth2/access_token"
        );
        assert_eq!(
            endpoints.verify.as_str(),
            "https://api.weibo.com/2/account/get_uid.json"
        );
    }

    #[rstest]
    #[case::without_slash("http://127.0.0.1:8080/mock")]
    #[case::with_slash("http://127.0.0.1:8080/mock/")]
    fn should_rebase_endpoints(#[case] base: &str) {
        let endpoints = OAuthEndpoints::with_base_url(base).expect("valid base");

        assert_eq!(
            endpoints.access_token.as_str(),
            "http://127.0.0.1:8080/mock/oauth2/access_token"
        );
        assert_eq!(
            endpoints
                .api_url("/2/common/get_timezone.json")
                .expect("api url")
                .as_str(),
            "http://127.0.0.1:8080/mock/2/common/get_timezone.json"
        );
    }

    #[rstest]
    #[case::relative("oauth2/authorize")]
    #[case::ftp("ftp://api.weibo.com/")]
    fn should_reject_invalid_base(#[case] base: &str) {
        let result = OAuthEndpoints::with_base_url(base);

        assert!(matches!(result, Err(OAuth2Error::InvalidEndpoint { .. })));
    }

    #[test]
    fn should_redact_app_secret() {
        let credentials = Credentials::new("K", "super-secret-value").with_callback_url("https://cb");

        let debug = format!("{credentials:?}");

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-value"));
        assert_eq!(credentials.callback_url(), Some("https://cb"));
    }

    #[rstest]
    #[case(DisplayType::Default, "default")]
    #[case(DisplayType::Mobile, "mobile")]
    #[case(DisplayType::Popup, "popup")]
    #[case(DisplayType::Wap12, "wap12")]
    #[case(DisplayType::Wap20, "wap20")]
    #[case(DisplayType::Js, "js")]
    #[case(DisplayType::AppOnWeibo, "apponweibo")]
    fn should_render_display_type(#[case] display: DisplayType, #[case] expected: &str) {
        assert_eq!(display.as_str(), expected);
    }
}
