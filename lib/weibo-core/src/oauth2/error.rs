//! OAuth2-specific error types.

use std::fmt;

use crate::client::ApiClientError;

/// Errors that can occur while acquiring an access token.
#[derive(Debug)]
pub enum OAuth2Error {
    /// The underlying HTTP call failed.
    Client(ApiClientError),

    /// The signed request signature does not match the payload.
    InvalidSignature,

    /// The signed request could not be decoded.
    MalformedSignedRequest {
        /// Description of what was malformed.
        reason: String,
    },

    /// The token endpoint answered with an unusable body.
    InvalidTokenResponse {
        /// Description of what was invalid.
        reason: String,
    },

    /// An endpoint URL is invalid.
    InvalidEndpoint {
        /// The invalid URL that was provided.
        url: String,
        /// Description of why the URL is invalid.
        reason: String,
    },
}

impl std::error::Error for OAuth2Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Client(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for OAuth2Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(error) => write!(f, "OAuth2 request failed: {error}"),
            Self::InvalidSignature => write!(f, "Signed request signature mismatch"),
            Self::MalformedSignedRequest { reason } => {
                write!(f, "Malformed signed request: {reason}")
            }
            Self::InvalidTokenResponse { reason } => {
                write!(f, "Invalid OAuth2 token response: {reason}")
            }
            Self::InvalidEndpoint { url, reason } => {
                write!(f, "Invalid endpoint URL '{url}': {reason}")
            }
        }
    }
}

impl From<ApiClientError> for OAuth2Error {
    fn from(error: ApiClientError) -> Self {
        Self::Client(error)
    }
}

impl OAuth2Error {
    /// Returns the service error carried by a failed call, if any.
    pub fn service_error(&self) -> Option<&crate::ServiceError> {
        match self {
            Self::Client(ApiClientError::Service(error)) => Some(error),
            _ => None,
        }
    }
}
