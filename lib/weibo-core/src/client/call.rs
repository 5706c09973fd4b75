use std::sync::PoisonError;
use std::time::Duration;

use http::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderValue, Method};
use tracing::{debug, warn};
use url::Url;

use super::auth::{SecureString, oauth2_header};
use super::{ApiClient, ApiClientError, HttpRequest, ServiceError};
use crate::encoding::{
    MultipartBody, RequestParameter, append_query, build_query_string, parameters_query_string,
};

const MAX_ERROR_BODY_CHARS: usize = 1024;

/// The two HTTP methods the service API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RequestMethod {
    /// Parameters travel in the query string.
    #[display("GET")]
    Get,
    /// Parameters travel in a form-encoded or multipart body.
    #[display("POST")]
    Post,
}

impl From<RequestMethod> for Method {
    fn from(method: RequestMethod) -> Self {
        match method {
            RequestMethod::Get => Self::GET,
            RequestMethod::Post => Self::POST,
        }
    }
}

/// A single API call under construction.
///
/// Created by [`ApiClient::get`], [`ApiClient::post`] or [`ApiClient::call`].
///
/// # Example
///
/// ```rust,no_run
/// use weibo_core::ApiClient;
///
/// # fn example() -> Result<(), weibo_core::ApiClientError> {
/// let client = ApiClient::builder().with_app_key("1234567890").build()?;
///
/// let body = client
///     .post("https://api.weibo.com/2/statuses/update.json")
///     .with_access_token("2.00abc")
///     .add_param("status", "hello world")
///     .send()?;
/// # Ok(())
/// # }
/// ```
#[derive(derive_more::Debug)]
pub struct ApiCall<'c> {
    #[debug(ignore)]
    client: &'c ApiClient,
    method: RequestMethod,
    url: String,
    access_token: Option<SecureString>,
    parameters: Vec<RequestParameter>,
    timeout: Option<Duration>,
}

impl<'c> ApiCall<'c> {
    pub(super) fn new(client: &'c ApiClient, method: RequestMethod, url: String) -> Self {
        Self {
            client,
            method,
            url,
            access_token: None,
            parameters: Vec::new(),
            timeout: None,
        }
    }

    /// Authenticates the call with `Authorization: OAuth2 {token}`.
    ///
    /// An empty token counts as no token: the app key is sent as `source` instead.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<SecureString>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Same as [`Self::with_access_token`], doing nothing for `None`.
    #[must_use]
    pub fn with_optional_access_token(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.with_access_token(token),
            None => self,
        }
    }

    /// Adds a text parameter.
    #[must_use]
    pub fn add_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(RequestParameter::text(name, value));
        self
    }

    /// Adds a binary parameter. The call is then sent as `multipart/form-data`.
    #[must_use]
    pub fn add_binary(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.parameters.push(RequestParameter::binary(name, data));
        self
    }

    /// Adds several parameters at once.
    #[must_use]
    pub fn with_params<I>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = RequestParameter>,
    {
        self.parameters.extend(parameters);
        self
    }

    /// Overrides the client timeout for this call only.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the HTTP request without sending it.
    ///
    /// # Errors
    ///
    /// Fails if the URL does not parse or a header value is invalid.
    pub fn prepare(&self) -> Result<HttpRequest, ApiClientError> {
        let mut url = Url::parse(&self.url)?;
        let mut query = url.query().unwrap_or_default().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, self.client.user_agent.clone());

        let body = match self.method {
            RequestMethod::Get => {
                append_query(&mut query, &parameters_query_string(&self.parameters));
                None
            }
            RequestMethod::Post if self.parameters.iter().any(RequestParameter::is_binary) => {
                let multipart = {
                    let mut rng = self
                        .client
                        .rng
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner);
                    MultipartBody::build(&self.parameters, &mut **rng)
                };
                headers.insert(CONTENT_TYPE, HeaderValue::from_str(&multipart.content_type())?);
                Some(multipart.into_bytes())
            }
            RequestMethod::Post => {
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("application/x-www-form-urlencoded"),
                );
                Some(parameters_query_string(&self.parameters).into_bytes())
            }
        };

        match self.access_token.as_ref().filter(|token| !token.is_empty()) {
            Some(token) => {
                headers.insert(AUTHORIZATION, oauth2_header(token)?);
            }
            None => {
                if let Some(app_key) = &self.client.app_key {
                    append_query(&mut query, &build_query_string([("source", app_key)]));
                }
            }
        }

        url.set_query((!query.is_empty()).then_some(query.as_str()));

        Ok(HttpRequest {
            method: self.method.into(),
            url,
            headers,
            body,
            timeout: Some(self.timeout.unwrap_or(self.client.timeout)),
        })
    }

    /// Sends the call and returns the raw response body.
    ///
    /// # Errors
    ///
    /// - [`ApiClientError::Transport`] when no response was received
    /// - [`ApiClientError::Service`] for a non-2xx status with a service error body
    /// - [`ApiClientError::UnexpectedStatusCode`] for any other non-2xx response
    pub fn send(self) -> Result<String, ApiClientError> {
        let request = self.prepare()?;
        let method = request.method.clone();
        let path = request.url.path().to_string();

        debug!(%method, %path, body_len = request.body.as_ref().map_or(0, Vec::len), "sending request");
        let response = self.client.transport.execute(request)?;
        debug!(%method, %path, status = response.status, body_len = response.body.len(), "received response");

        if response.is_success() {
            return Ok(response.body);
        }

        match ServiceError::from_body(&response.body) {
            Ok(error) => Err(ApiClientError::Service(error)),
            Err(parse_error) => {
                warn!(status = response.status, %path, %parse_error, "response body is not a service error");
                Err(ApiClientError::UnexpectedStatusCode {
                    status_code: response.status,
                    body: response.body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
                })
            }
        }
    }
}
