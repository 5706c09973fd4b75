//! Location and timezone lookups.
//!
//! The service answers these with an array of single-entry objects; they are
//! returned as one ordered map.

use std::collections::BTreeMap;

use super::flatten_objects;
use crate::client::{ApiClientError, RequestMethod};
use crate::encoding::RequestParameter;
use crate::oauth2::TokenManager;

fn lookup(
    manager: &TokenManager,
    path: &str,
    parameters: &[RequestParameter],
) -> Result<BTreeMap<String, String>, ApiClientError> {
    let url = manager.api_url(path)?;
    let body = manager.request(url.as_str(), RequestMethod::Get, parameters)?;
    flatten_objects(&body)
}

/// Maps location codes to names.
///
/// # Errors
///
/// Returns the call error, or [`ApiClientError::JsonError`] for an unexpected body.
pub fn code_to_location(
    manager: &TokenManager,
    codes: &[&str],
) -> Result<BTreeMap<String, String>, ApiClientError> {
    lookup(
        manager,
        "2/common/code_to_location.json",
        &[RequestParameter::text("codes", codes.join(","))],
    )
}

/// Lists the cities of a province, optionally filtered by initial.
///
/// # Errors
///
/// Returns the call error, or [`ApiClientError::JsonError`] for an unexpected body.
pub fn get_city(
    manager: &TokenManager,
    province: &str,
    capital: Option<&str>,
) -> Result<BTreeMap<String, String>, ApiClientError> {
    lookup(
        manager,
        "2/common/get_city.json",
        &[
            RequestParameter::text("province", province),
            RequestParameter::text("capital", capital.unwrap_or_default()),
        ],
    )
}

/// Lists the provinces of a country, optionally filtered by initial.
///
/// # Errors
///
/// Returns the call error, or [`ApiClientError::JsonError`] for an unexpected body.
pub fn get_province(
    manager: &TokenManager,
    country: &str,
    capital: Option<&str>,
) -> Result<BTreeMap<String, String>, ApiClientError> {
    lookup(
        manager,
        "2/common/get_province.json",
        &[
            RequestParameter::text("country", country),
            RequestParameter::text("capital", capital.unwrap_or_default()),
        ],
    )
}

/// Lists countries, optionally filtered by initial.
///
/// # Errors
///
/// Returns the call error, or [`ApiClientError::JsonError`] for an unexpected body.
pub fn get_country(
    manager: &TokenManager,
    capital: Option<&str>,
) -> Result<BTreeMap<String, String>, ApiClientError> {
    lookup(
        manager,
        "2/common/get_country.json",
        &[RequestParameter::text(
            "capital",
            capital.unwrap_or_default(),
        )],
    )
}

/// Lists timezones.
///
/// # Errors
///
/// Returns the call error, or [`ApiClientError::JsonError`] for an unexpected body.
pub fn get_timezone(manager: &TokenManager) -> Result<BTreeMap<String, String>, ApiClientError> {
    lookup(manager, "2/common/get_timezone.json", &[])
}
