use serde::Deserialize;

use crate::de::string_or_number;

/// An error reported by the service in a non-2xx response body.
///
/// The body has the shape `{"error": "...", "error_code": 21315, "request": "/2/..."}`.
/// The code is kept as a string whatever its JSON type, so it can be matched
/// against the service's published code table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_more::Error, derive_more::Display)]
#[display("Service error {code}: {message} (request: {request})")]
pub struct ServiceError {
    /// Service-defined error code, e.g. `"21315"`.
    #[serde(rename = "error_code", deserialize_with = "string_or_number")]
    pub code: String,
    /// Human readable error description.
    #[serde(rename = "error", default)]
    pub message: String,
    /// The request path that triggered the error.
    #[serde(default)]
    pub request: String,
}

impl ServiceError {
    /// Parses a response body into a service error.
    ///
    /// # Errors
    ///
    /// Fails if the body is not JSON or has no `error_code` field.
    pub fn from_body(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}
