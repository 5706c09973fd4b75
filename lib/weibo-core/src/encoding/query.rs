use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::RequestParameter;

/// URI-component encode set: everything except ASCII alphanumerics and `-_.~`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes a single query-string key or value.
///
/// Spaces become `%20` (never `+`), and every reserved character is escaped.
///
/// ```rust
/// use weibo_core::encoding::encode_component;
///
/// assert_eq!(encode_component("https://cb"), "https%3A%2F%2Fcb");
/// assert_eq!(encode_component("a b~c"), "a%20b~c");
/// ```
pub fn encode_component(value: &str) -> Cow<'_, str> {
    utf8_percent_encode(value, COMPONENT).into()
}

/// Builds `key1=val1&key2=val2` from name/value pairs, keeping their order.
///
/// Pairs with an empty value are left out entirely.
///
/// ```rust
/// use weibo_core::encoding::build_query_string;
///
/// let query = build_query_string([("client_id", "K"), ("state", ""), ("display", "default")]);
/// assert_eq!(query, "client_id=K&display=default");
/// ```
pub fn build_query_string<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .into_iter()
        .filter(|(_, value)| !value.as_ref().is_empty())
        .map(|(key, value)| {
            format!(
                "{}={}",
                encode_component(key.as_ref()),
                encode_component(value.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds a query string from request parameters.
///
/// Binary parameters are skipped, as are text parameters with an empty value.
pub fn parameters_query_string(parameters: &[RequestParameter]) -> String {
    build_query_string(
        parameters
            .iter()
            .filter_map(|param| param.text_value().map(|value| (param.name(), value))),
    )
}

/// Appends an already encoded query fragment to `query`, joining with `&`.
pub(crate) fn append_query(query: &mut String, fragment: &str) {
    if fragment.is_empty() {
        return;
    }
    if !query.is_empty() {
        query.push('&');
    }
    query.push_str(fragment);
}
