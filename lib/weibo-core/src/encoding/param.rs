use std::cmp::Ordering;
use std::fmt;

/// Value carried by a [`RequestParameter`].
#[derive(Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Plain text, sent in the query string, in a form body or as a multipart text field.
    Text(String),
    /// Raw bytes, only ever sent as a multipart file part.
    Binary(Vec<u8>),
}

impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Binary(bytes) => write!(f, "Binary({} bytes)", bytes.len()),
        }
    }
}

/// A single named request parameter.
///
/// Parameters are passed per call and never retained once the request completes.
/// A call containing at least one [`ParamValue::Binary`] parameter is sent as
/// `multipart/form-data`.
///
/// # Examples
///
/// ```rust
/// use weibo_core::RequestParameter;
///
/// let status = RequestParameter::text("status", "hello world");
/// let picture = RequestParameter::binary("pic", vec![0xFF, 0xD8, 0xFF]);
///
/// assert!(!status.is_binary());
/// assert!(picture.is_binary());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParameter {
    name: String,
    value: ParamValue,
}

impl RequestParameter {
    /// Creates a text parameter.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: ParamValue::Text(value.into()),
        }
    }

    /// Creates a binary parameter, uploaded as a file part.
    pub fn binary(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: ParamValue::Binary(data.into()),
        }
    }

    /// Returns the parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter value.
    pub fn value(&self) -> &ParamValue {
        &self.value
    }

    /// Returns the text value, or `None` for binary parameters.
    pub fn text_value(&self) -> Option<&str> {
        match &self.value {
            ParamValue::Text(text) => Some(text),
            ParamValue::Binary(_) => None,
        }
    }

    /// Returns `true` if this parameter carries raw bytes.
    pub fn is_binary(&self) -> bool {
        matches!(self.value, ParamValue::Binary(_))
    }

    /// Ordinal comparison of parameter names.
    ///
    /// Byte-wise and locale independent, so multipart field order is the same on every platform.
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        self.name.as_bytes().cmp(other.name.as_bytes())
    }
}

impl<N, V> From<(N, V)> for RequestParameter
where
    N: Into<String>,
    V: Into<String>,
{
    fn from((name, value): (N, V)) -> Self {
        Self::text(name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_create_text_parameter() {
        let param = RequestParameter::text("count", "50");

        assert_eq!(param.name(), "count");
        assert_eq!(param.text_value(), Some("50"));
        assert!(!param.is_binary());
    }

    #[test]
    fn should_create_binary_parameter() {
        let param = RequestParameter::binary("pic", vec![1, 2, 3]);

        assert_eq!(param.name(), "pic");
        assert_eq!(param.text_value(), None);
        assert!(param.is_binary());
    }

    #[test]
    fn should_not_dump_binary_content_in_debug() {
        let param = RequestParameter::binary("pic", vec![0xAB; 2048]);

        let debug = format!("{param:?}");

        assert!(debug.contains("Binary(2048 bytes)"));
        assert!(!debug.contains("171"));
    }

    #[test]
    fn should_compare_names_ordinally() {
        let upper = RequestParameter::text("Zeta", "");
        let lower = RequestParameter::text("alpha", "");

        // uppercase letters sort before lowercase ones in ordinal order
        assert_eq!(upper.cmp_by_name(&lower), Ordering::Less);
        assert_eq!(lower.cmp_by_name(&upper), Ordering::Greater);
        assert_eq!(lower.cmp_by_name(&lower.clone()), Ordering::Equal);
    }

    #[test]
    fn should_convert_from_tuple() {
        let param = RequestParameter::from(("uid", "42"));

        assert_eq!(param, RequestParameter::text("uid", "42"));
    }
}
