use chrono::{DateTime, FixedOffset};

const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Parses a timestamp as the service formats it, e.g. `Tue May 31 17:46:55 +0800 2011`.
///
/// # Errors
///
/// Fails if the text does not follow that format.
pub fn parse_created_at(text: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_str(text.trim(), CREATED_AT_FORMAT)
}
