use std::fmt;

use http::HeaderValue;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::ApiClientError;

/// Secure wrapper for sensitive string data that automatically zeroes memory on drop.
///
/// Used for the app secret and for access tokens travelling with a single call.
/// The value never shows up in `Debug` output, and `Display` masks it.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner string value.
    ///
    /// # Security Note
    /// The returned reference should not be stored for extended periods.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the value is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Masks sensitive data for display/logging purposes.
    fn mask_sensitive(value: &str) -> String {
        let chars = value.chars().collect::<Vec<_>>();
        match (chars.get(..4), chars.get(chars.len().saturating_sub(4)..)) {
            (Some(head), Some(tail)) if chars.len() > 8 => format!(
                "{}...{}",
                head.iter().collect::<String>(),
                tail.iter().collect::<String>()
            ),
            _ => "***".to_string(),
        }
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::mask_sensitive(&self.0))
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

/// Builds the `Authorization: OAuth2 {token}` header value.
///
/// The value is flagged as sensitive so HTTP stacks skip it when logging headers.
pub(crate) fn oauth2_header(token: &SecureString) -> Result<HeaderValue, ApiClientError> {
    let mut value = HeaderValue::from_str(&format!("OAuth2 {}", token.as_str()))?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_redact_debug_output() {
        let secret = SecureString::from("4b1a6e2f90d3c8e7a5b6");

        let debug = format!("{secret:?}");

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("4b1a"));
    }

    #[test]
    fn should_mask_display_output() {
        assert_eq!(SecureString::from("4b1a6e2f90d3c8e7a5b6").to_string(), "4b1a...a5b6");
        assert_eq!(SecureString::from("short").to_string(), "***");
        assert_eq!(SecureString::from("").to_string(), "***");
    }

    #[test]
    fn should_build_oauth2_header() {
        let header = oauth2_header(&SecureString::from("2.00abc")).expect("valid header");

        assert_eq!(header.to_str().expect("ascii header"), "OAuth2 2.00abc");
        assert!(header.is_sensitive());
    }

    #[test]
    fn should_reject_token_with_newline() {
        let result = oauth2_header(&SecureString::from("abc\r\nX-Injected: 1"));

        assert!(matches!(result, Err(ApiClientError::InvalidHeaderValue(_))));
    }
}
