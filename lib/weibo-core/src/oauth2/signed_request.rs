//! Decoding of the `signed_request` parameter posted to applications hosted on the service site.
//!
//! A signed request is `{signature}.{payload}`, both URL-safe base64. The signature is
//! HMAC-SHA256 of the payload segment, exactly as received, keyed with the app secret.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;

use super::error::OAuth2Error;
use super::token::AccessToken;
use crate::client::SecureString;
use crate::de::value_to_string;

type HmacSha256 = Hmac<Sha256>;

/// Verifies a signed request and extracts the access token it carries.
///
/// Returns `Ok(None)` when the signature is valid but the user has not authorized
/// the application yet, i.e. the payload has no `oauth_token`.
///
/// # Errors
///
/// - [`OAuth2Error::MalformedSignedRequest`] if a segment is missing, cannot be decoded
///   or does not hold a JSON object
/// - [`OAuth2Error::InvalidSignature`] if the signature does not match
pub fn decode_signed_request(
    signed_request: &str,
    app_secret: &SecureString,
) -> Result<Option<AccessToken>, OAuth2Error> {
    let mut segments = signed_request.split('.');
    let (Some(signature), Some(payload)) = (segments.next(), segments.next()) else {
        return Err(malformed("expected '{signature}.{payload}'"));
    };

    let signature = STANDARD
        .decode(normalize_base64(signature))
        .map_err(|_| OAuth2Error::InvalidSignature)?;

    let mut mac = HmacSha256::new_from_slice(app_secret.as_str().as_bytes())
        .map_err(|error| malformed(&error.to_string()))?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| OAuth2Error::InvalidSignature)?;

    let decoded = STANDARD
        .decode(normalize_base64(payload))
        .map_err(|error| malformed(&format!("payload is not base64: {error}")))?;
    let payload: Value = serde_json::from_slice(&decoded)
        .map_err(|error| malformed(&format!("payload is not JSON: {error}")))?;
    if !payload.is_object() {
        return Err(malformed("payload is not a JSON object"));
    }

    let token = match payload.get("oauth_token") {
        None | Some(Value::Null) => return Ok(None),
        Some(token) => value_to_string(token),
    };
    let uid = payload
        .get("user_id")
        .filter(|value| !value.is_null())
        .map(value_to_string)
        .unwrap_or_default();
    let expires = match payload.get("expires").filter(|value| !value.is_null()) {
        None => 0,
        Some(value) => {
            let text = value_to_string(value);
            text.trim()
                .parse::<u64>()
                .map_err(|_| malformed(&format!("invalid expires '{text}'")))?
        }
    };

    Ok(Some(AccessToken::new(
        token,
        uid,
        Duration::from_secs(expires),
    )))
}

/// Turns URL-safe, possibly unpadded base64 into padded standard base64.
fn normalize_base64(segment: &str) -> String {
    let mut normalized = segment.replace('-', "+").replace('_', "/");
    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }
    normalized
}

fn malformed(reason: &str) -> OAuth2Error {
    OAuth2Error::MalformedSignedRequest {
        reason: reason.to_string(),
    }
}
