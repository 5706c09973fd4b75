use tracing::info;
use url::Url;

use super::config::{Credentials, DisplayType, OAuthEndpoints, ResponseType};
use super::error::OAuth2Error;
use super::login::{DirectLogin, LoginContext, WebFormLogin};
use super::signed_request::decode_signed_request;
use super::state::TokenState;
use super::token::{AccessToken, TokenResponse};
use crate::client::{ApiCall, ApiClient, ApiClientBuilder, ApiClientError, RequestMethod};
use crate::encoding::{RequestParameter, build_query_string};

/// The grant sent to the token endpoint.
enum Grant<'a> {
    AuthorizationCode { code: &'a str },
    Password { username: &'a str, password: &'a str },
    RefreshToken { refresh_token: &'a str },
}

impl Grant<'_> {
    fn grant_type(&self) -> &'static str {
        match self {
            Self::AuthorizationCode { .. } => "authorization_code",
            Self::Password { .. } => "password",
            Self::RefreshToken { .. } => "refresh_token",
        }
    }
}

/// Owns the application credentials and the current access token.
///
/// Acquiring a token (through any flow) replaces the current one. Acquisition methods
/// take `&mut self`: a manager is driven by one caller at a time.
///
/// # Example
///
/// ```rust,no_run
/// use weibo_core::oauth2::{Credentials, DisplayType, ResponseType, TokenManager};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("1234567890", "app-secret")
///     .with_callback_url("https://example.com/callback");
/// let mut manager = TokenManager::builder(credentials).build()?;
///
/// // Send the user to this page, then receive `code` on the callback
/// let url = manager.authorize_url(ResponseType::Code, Some("xyz"), DisplayType::Default);
/// println!("{url}");
///
/// let token = manager.exchange_authorization_code("code-from-callback")?;
/// println!("authorized uid {}", token.uid());
///
/// let body = manager.request(
///     "https://api.weibo.com/2/statuses/home_timeline.json",
///     weibo_core::RequestMethod::Get,
///     &[],
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TokenManager {
    credentials: Credentials,
    endpoints: OAuthEndpoints,
    client: ApiClient,
    current_token: Option<AccessToken>,
}

impl TokenManager {
    /// Creates a builder for the given application credentials.
    pub fn builder(credentials: Credentials) -> TokenManagerBuilder {
        TokenManagerBuilder::new(credentials)
    }

    /// Returns the application credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the configured endpoints.
    pub fn endpoints(&self) -> &OAuthEndpoints {
        &self.endpoints
    }

    /// Returns the underlying API client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Returns the current access token.
    pub fn access_token(&self) -> Option<&AccessToken> {
        self.current_token.as_ref()
    }

    /// Replaces the current access token, e.g. with one restored by the caller.
    pub fn set_access_token(&mut self, token: AccessToken) {
        self.current_token = Some(token);
    }

    /// Forgets the current access token and returns it.
    pub fn clear_access_token(&mut self) -> Option<AccessToken> {
        self.current_token.take()
    }

    /// Builds the URL of the authorization page.
    ///
    /// The query carries `client_id`, `redirect_uri`, `response_type`, `state` and
    /// `display`, in that order, leaving out the empty ones.
    pub fn authorize_url(
        &self,
        response_type: ResponseType,
        state: Option<&str>,
        display: DisplayType,
    ) -> Url {
        let query = build_query_string([
            ("client_id", self.credentials.app_key()),
            (
                "redirect_uri",
                self.credentials.callback_url().unwrap_or_default(),
            ),
            ("response_type", response_type.as_str()),
            ("state", state.unwrap_or_default()),
            ("display", display.as_str()),
        ]);

        let mut url = self.endpoints.authorize.clone();
        url.set_query(Some(&query));
        url
    }

    /// Exchanges the authorization code received on the callback for an access token.
    ///
    /// # Errors
    ///
    /// Fails if the call fails or the response carries no token.
    pub fn exchange_authorization_code(&mut self, code: &str) -> Result<AccessToken, OAuth2Error> {
        self.exchange(Grant::AuthorizationCode { code })
    }

    /// Exchanges the user's own username and password for an access token.
    ///
    /// # Errors
    ///
    /// Fails if the call fails or the response carries no token.
    pub fn exchange_password(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<AccessToken, OAuth2Error> {
        self.exchange(Grant::Password { username, password })
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Fails if the call fails or the response carries no token.
    pub fn exchange_refresh_token(
        &mut self,
        refresh_token: &str,
    ) -> Result<AccessToken, OAuth2Error> {
        self.exchange(Grant::RefreshToken { refresh_token })
    }

    /// Verifies a `signed_request` and makes its token current.
    ///
    /// Returns `Ok(None)`, leaving the current token untouched, when the user has not
    /// authorized the application yet.
    ///
    /// # Errors
    ///
    /// See [`decode_signed_request`].
    pub fn exchange_signed_request(
        &mut self,
        signed_request: &str,
    ) -> Result<Option<AccessToken>, OAuth2Error> {
        let token = decode_signed_request(signed_request, self.credentials.app_secret())?;
        if let Some(token) = &token {
            info!(uid = token.uid(), expires_in = ?token.expires_in(), "access token acquired from signed request");
            self.current_token = Some(token.clone());
        }
        Ok(token)
    }

    /// Calls the identity endpoint with the current token.
    ///
    /// # Errors
    ///
    /// Returns the call error; a rejected token shows up as [`ApiClientError::Service`].
    pub fn verify_access_token(&self) -> Result<(), ApiClientError> {
        self.request(self.endpoints.verify.as_str(), RequestMethod::Get, &[])
            .map(|_| ())
    }

    /// Classifies the current token by calling the identity endpoint.
    ///
    /// Any error response, with or without a service error body, is classified.
    ///
    /// # Errors
    ///
    /// Fails when no response was received or the request could not be built.
    pub fn probe_token_validity(&self) -> Result<TokenState, ApiClientError> {
        match self.verify_access_token() {
            Ok(()) => Ok(TokenState::Valid),
            Err(ApiClientError::Service(error)) => Ok(TokenState::from_service_code(&error.code)),
            Err(ApiClientError::UnexpectedStatusCode { .. }) => Ok(TokenState::Other),
            Err(error) => Err(error),
        }
    }

    /// Logs in through the authorization page with the default [`WebFormLogin`].
    ///
    /// The form is posted with the client's user agent and timeout.
    ///
    /// Returns `true` and makes the token current when the login page handed one back.
    ///
    /// # Errors
    ///
    /// Fails when the login request itself fails.
    pub fn login_with_credentials(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<bool, OAuth2Error> {
        let login = WebFormLogin::new()?.with_timeout(self.client.timeout());
        self.login_with(&login, username, password)
    }

    /// Logs in with the given [`DirectLogin`] implementation.
    ///
    /// # Errors
    ///
    /// Fails when the login request itself fails.
    pub fn login_with(
        &mut self,
        login: &impl DirectLogin,
        username: &str,
        password: &str,
    ) -> Result<bool, OAuth2Error> {
        let referer = self.authorize_url(ResponseType::Code, None, DisplayType::Default);
        let context = LoginContext {
            credentials: &self.credentials,
            authorize: &self.endpoints.authorize,
            referer,
            user_agent: self.client.user_agent(),
        };

        match login.attempt_direct_login(&context, username, password)? {
            Some(token) => {
                info!(uid = token.uid(), expires_in = ?token.expires_in(), "access token acquired from direct login");
                self.current_token = Some(token);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Sends one request authenticated with the current token, if any.
    ///
    /// # Errors
    ///
    /// See [`ApiCall::send`].
    pub fn request(
        &self,
        url: &str,
        method: RequestMethod,
        parameters: &[RequestParameter],
    ) -> Result<String, ApiClientError> {
        self.client
            .request(url, method, self.current_token(), parameters)
    }

    /// Starts a `GET` call authenticated with the current token, if any.
    pub fn get(&self, url: impl Into<String>) -> ApiCall<'_> {
        self.client
            .get(url)
            .with_optional_access_token(self.current_token())
    }

    /// Starts a `POST` call authenticated with the current token, if any.
    pub fn post(&self, url: impl Into<String>) -> ApiCall<'_> {
        self.client
            .post(url)
            .with_optional_access_token(self.current_token())
    }

    /// Resolves an API path against the configured base URL.
    ///
    /// # Errors
    ///
    /// Fails if the joined URL does not parse.
    pub fn api_url(&self, path: &str) -> Result<Url, ApiClientError> {
        Ok(self.endpoints.api_url(path)?)
    }

    fn current_token(&self) -> Option<&str> {
        self.current_token.as_ref().map(AccessToken::token)
    }

    fn exchange(&mut self, grant: Grant<'_>) -> Result<AccessToken, OAuth2Error> {
        let mut parameters = vec![
            RequestParameter::text("client_id", self.credentials.app_key()),
            RequestParameter::text("client_secret", self.credentials.app_secret().as_str()),
            RequestParameter::text("grant_type", grant.grant_type()),
        ];
        match grant {
            Grant::AuthorizationCode { code } => {
                parameters.push(RequestParameter::text("code", code));
                parameters.push(RequestParameter::text(
                    "redirect_uri",
                    self.credentials.callback_url().unwrap_or_default(),
                ));
            }
            Grant::Password { username, password } => {
                parameters.push(RequestParameter::text("username", username));
                parameters.push(RequestParameter::text("password", password));
            }
            Grant::RefreshToken { refresh_token } => {
                parameters.push(RequestParameter::text("refresh_token", refresh_token));
            }
        }

        let body = self.client.request(
            self.endpoints.access_token.as_str(),
            RequestMethod::Post,
            None,
            &parameters,
        )?;
        if body.trim().is_empty() {
            return Err(OAuth2Error::InvalidTokenResponse {
                reason: "empty response body".to_string(),
            });
        }

        let response: TokenResponse =
            serde_json::from_str(&body).map_err(|error| OAuth2Error::InvalidTokenResponse {
                reason: error.to_string(),
            })?;
        let token = AccessToken::from(response);

        info!(uid = token.uid(), expires_in = ?token.expires_in(), "access token acquired");
        self.current_token = Some(token.clone());
        Ok(token)
    }
}

/// Builder for [`TokenManager`].
#[derive(Debug)]
pub struct TokenManagerBuilder {
    credentials: Credentials,
    endpoints: OAuthEndpoints,
    client: ApiClientBuilder,
    access_token: Option<AccessToken>,
}

impl TokenManagerBuilder {
    fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoints: OAuthEndpoints::default(),
            client: ApiClient::builder(),
            access_token: None,
        }
    }

    /// Talks to the given endpoints instead of the production service.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: OAuthEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Configures the underlying API client.
    ///
    /// The app key is always taken from the credentials.
    #[must_use]
    pub fn with_client(mut self, client: ApiClientBuilder) -> Self {
        self.client = client;
        self
    }

    /// Starts with an already known access token.
    #[must_use]
    pub fn with_access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Builds the manager.
    ///
    /// # Errors
    ///
    /// Fails if the API client cannot be built.
    pub fn build(self) -> Result<TokenManager, ApiClientError> {
        let Self {
            credentials,
            endpoints,
            client,
            access_token,
        } = self;

        let client = client.with_app_key(credentials.app_key()).build()?;

        Ok(TokenManager {
            credentials,
            endpoints,
            client,
            current_token: access_token,
        })
    }
}
