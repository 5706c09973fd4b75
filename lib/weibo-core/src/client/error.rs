use super::ServiceError;

/// Errors that can occur when using the [`ApiClient`](super::ApiClient).
///
/// Every failure is surfaced to the immediate caller; nothing is retried or swallowed.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ApiClientError {
    /// No HTTP response was received.
    ///
    /// Occurs on DNS, connection, TLS or timeout failures.
    Transport(TransportError),

    /// The service answered with a non-2xx status and a JSON error body.
    ///
    /// Carries the service-defined error code for programmatic branching.
    Service(ServiceError),

    /// URL parsing error when constructing the request URL.
    UrlError(url::ParseError),

    /// A header value (access token, user agent, content type) contains invalid characters.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// A success body could not be deserialized into the expected type.
    JsonError(serde_json::Error),

    /// The service answered with a non-2xx status and a body that is not a service error.
    #[display("Unexpected status code {status_code}: {body}")]
    #[from(skip)]
    UnexpectedStatusCode {
        /// The HTTP status code received.
        status_code: u16,
        /// The response body, truncated for display.
        body: String,
    },
}

/// A request that never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
#[display("Transport failure: {message}")]
pub struct TransportError {
    message: String,
    timeout: bool,
}

impl TransportError {
    /// Creates a transport error with the given description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout: false,
        }
    }

    /// Creates a transport error caused by an elapsed timeout.
    pub fn timed_out(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout: true,
        }
    }

    /// Returns the failure description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        self.timeout
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let timeout = error.is_timeout();
        // the query may carry the app key or user input, keep origin and path only
        let location = error
            .url()
            .map(|url| format!("{}{}", url.origin().ascii_serialization(), url.path()));
        let error = error.without_url();
        let message = match location {
            Some(location) => format!("{error} ({location})"),
            None => error.to_string(),
        };
        Self { message, timeout }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_client_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<ApiClientError>();
        assert_sync::<ApiClientError>();
    }

    #[test]
    fn should_display_unexpected_status_code() {
        let error = ApiClientError::UnexpectedStatusCode {
            status_code: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Unexpected status code 502: <html>Bad Gateway</html>"
        );
    }

    #[test]
    fn should_display_transport_error() {
        let error = ApiClientError::from(TransportError::timed_out("operation timed out"));

        assert_eq!(error.to_string(), "Transport failure: operation timed out");
        assert!(matches!(error, ApiClientError::Transport(ref inner) if inner.is_timeout()));
    }
}
