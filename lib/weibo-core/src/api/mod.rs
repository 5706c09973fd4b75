//! Typed wrappers over a few service endpoints.
//!
//! Each wrapper calls [`TokenManager::request`](crate::oauth2::TokenManager::request)
//! and deserializes the raw JSON body. They are deliberately thin: the service
//! has hundreds of endpoints and they all follow this pattern.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::client::ApiClientError;
use crate::de::value_to_string;

pub mod account;
pub mod common;
mod date;

pub use self::date::parse_created_at;

/// Deserializes a JSON response body.
///
/// # Errors
///
/// Returns [`ApiClientError::JsonError`] if the body does not match `T`.
pub fn decode_json<T>(body: &str) -> Result<T, ApiClientError>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_str(body)?)
}

/// Flattens `[{"k1": "v1"}, {"k2": "v2"}]` into `{k1: v1, k2: v2}`.
///
/// Non-string values are rendered as JSON text. A key seen twice keeps its last value.
pub(crate) fn flatten_objects(body: &str) -> Result<BTreeMap<String, String>, ApiClientError> {
    let objects: Vec<Map<String, Value>> = decode_json(body)?;

    Ok(objects
        .iter()
        .flat_map(|object| object.iter())
        .map(|(key, value)| (key.clone(), value_to_string(value)))
        .collect())
}
