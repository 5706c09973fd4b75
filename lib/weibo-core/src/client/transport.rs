use std::fmt::Debug;
use std::time::Duration;

use http::{HeaderMap, Method};
use url::Url;

use super::TransportError;

/// A fully prepared HTTP request, ready to go on the wire.
#[derive(Clone, derive_more::Debug)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: Method,
    /// The absolute URL, query string included.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// The request body, if any.
    #[debug(ignore)]
    pub body: Option<Vec<u8>>,
    /// Overrides the transport's default timeout.
    pub timeout: Option<Duration>,
}

/// The status and textual body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The full response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response from a status code and a body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a single request and reads the whole response.
///
/// Implementations return `Err` only when no HTTP response was received.
/// Any status code, including 4xx and 5xx, is an `Ok` response.
pub trait HttpTransport: Debug + Send + Sync {
    /// Executes the request.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on DNS, connection, TLS or timeout failures.
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// The production transport, backed by a blocking `reqwest` client.
///
/// The response body is fully read before returning, so the connection goes back
/// to the client's pool when the call completes.
#[derive(Debug, Clone)]
pub struct BlockingTransport {
    client: reqwest::blocking::Client,
}

impl BlockingTransport {
    /// Creates a transport with a default `reqwest` client.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { client })
    }

    /// Creates a transport that keeps cookies between requests.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialized.
    pub fn with_cookie_store() -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }

    /// Wraps an already configured `reqwest` client.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for BlockingTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
            timeout,
        } = request;

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        Ok(HttpResponse { status, body })
    }
}
