//! Blocking HTTP client for the service REST API.
//!
//! [`ApiClient`] turns a URL, a method, an optional access token and a list of
//! [`RequestParameter`](crate::RequestParameter)s into a single HTTP request and
//! returns the raw response body, or an [`ApiClientError`].
//!
//! # Request shape
//!
//! | Call | Parameters | Content-Type |
//! |------|------------|--------------|
//! | `GET` | query string | none |
//! | `POST`, text only | form body | `application/x-www-form-urlencoded` |
//! | `POST`, any binary | multipart body | `multipart/form-data; boundary=...` |
//!
//! With a non-empty access token the request carries `Authorization: OAuth2 {token}`;
//! otherwise the app key is appended to the query string as `source={app_key}`.
//!
//! # Example
//!
//! ```rust,no_run
//! use weibo_core::{ApiClient, RequestMethod, RequestParameter};
//!
//! # fn example() -> Result<(), weibo_core::ApiClientError> {
//! let client = ApiClient::builder().with_app_key("1234567890").build()?;
//!
//! let body = client.request(
//!     "https://api.weibo.com/2/statuses/public_timeline.json",
//!     RequestMethod::Get,
//!     None,
//!     &[RequestParameter::text("count", "20")],
//! )?;
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use http::HeaderValue;
use rand::RngCore;

mod auth;
mod builder;
mod call;
mod error;
mod service_error;
#[cfg(test)]
pub(crate) mod testing;
mod transport;

pub use self::auth::SecureString;
pub use self::builder::{ApiClientBuilder, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use self::call::{ApiCall, RequestMethod};
pub use self::error::{ApiClientError, TransportError};
pub use self::service_error::ServiceError;
pub use self::transport::{BlockingTransport, HttpRequest, HttpResponse, HttpTransport};

use crate::encoding::RequestParameter;

/// A blocking client for the service REST API.
///
/// The client is `Send + Sync` and can be shared between threads. It holds no
/// token: each call states its own, see [`ApiCall::with_access_token`].
#[derive(derive_more::Debug)]
pub struct ApiClient {
    app_key: Option<String>,
    user_agent: HeaderValue,
    timeout: Duration,
    transport: Arc<dyn HttpTransport>,
    #[debug(ignore)]
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl ApiClient {
    /// Creates a builder with the default configuration.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Returns the application key, if configured.
    pub fn app_key(&self) -> Option<&str> {
        self.app_key.as_deref()
    }

    /// Returns the `User-Agent` sent with every call.
    pub fn user_agent(&self) -> &HeaderValue {
        &self.user_agent
    }

    /// Returns the default timeout of every call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Starts a `GET` call.
    pub fn get(&self, url: impl Into<String>) -> ApiCall<'_> {
        self.call(RequestMethod::Get, url)
    }

    /// Starts a `POST` call.
    pub fn post(&self, url: impl Into<String>) -> ApiCall<'_> {
        self.call(RequestMethod::Post, url)
    }

    /// Starts a call with the given method.
    pub fn call(&self, method: RequestMethod, url: impl Into<String>) -> ApiCall<'_> {
        ApiCall::new(self, method, url.into())
    }

    /// Sends one request and returns the raw response body.
    ///
    /// This is the single primitive every endpoint wrapper goes through.
    ///
    /// # Errors
    ///
    /// See [`ApiCall::send`].
    pub fn request(
        &self,
        url: &str,
        method: RequestMethod,
        access_token: Option<&str>,
        parameters: &[RequestParameter],
    ) -> Result<String, ApiClientError> {
        self.call(method, url)
            .with_optional_access_token(access_token)
            .with_params(parameters.iter().cloned())
            .send()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingTransport;
    use super::*;

    #[test]
    fn test_api_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<ApiClient>();
    }

    #[test]
    fn should_send_request_through_transport() {
        let transport = RecordingTransport::new().respond(200, "[]");
        let client = ApiClient::builder()
            .with_app_key("K")
            .with_transport(transport.clone())
            .build()
            .expect("client");

        let body = client
            .request(
                "https://api.weibo.com/2/common/get_timezone.json",
                RequestMethod::Get,
                None,
                &[RequestParameter::text("language", "zh-cn")],
            )
            .expect("body");

        assert_eq!(body, "[]");
        let request = transport.last_request().expect("recorded request");
        assert_eq!(request.url.query(), Some("language=zh-cn&source=K"));
    }
}
