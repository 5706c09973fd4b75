//! Account endpoints.

use serde::Deserialize;

use super::decode_json;
use crate::client::{ApiClientError, RequestMethod};
use crate::de::string_or_number;
use crate::oauth2::TokenManager;

const GET_UID_PATH: &str = "2/account/get_uid.json";

/// The id of the account owning the current token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Uid {
    /// The account id.
    #[serde(deserialize_with = "string_or_number")]
    pub uid: String,
}

/// Returns the id of the account the current token was issued for.
///
/// # Errors
///
/// Returns the call error, or [`ApiClientError::JsonError`] for an unexpected body.
pub fn get_uid(manager: &TokenManager) -> Result<Uid, ApiClientError> {
    let url = manager.api_url(GET_UID_PATH)?;
    let body = manager.request(url.as_str(), RequestMethod::Get, &[])?;
    decode_json(&body)
}
