//! # Weibo Core
//!
//! OAuth2 authentication and a blocking HTTP request core for the Weibo REST API.
//!
//! This crate provides:
//! - **[`ApiClient`]** - builds correctly encoded requests (query string, form body or
//!   `multipart/form-data`) and maps failures into [`ApiClientError`]
//! - **[`TokenManager`](oauth2::TokenManager)** - the OAuth2 flows: authorization code,
//!   password, refresh token, signed request and direct login
//! - **[`api`]** - a few typed endpoint wrappers built on the two above
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use weibo_core::oauth2::{Credentials, TokenManager, TokenState};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Credentials::new("1234567890", "app-secret")
//!     .with_callback_url("https://example.com/callback");
//! let mut manager = TokenManager::builder(credentials).build()?;
//!
//! manager.exchange_password("user@example.com", "password")?;
//! assert_eq!(manager.probe_token_validity()?, TokenState::Valid);
//!
//! let uid = weibo_core::api::account::get_uid(&manager)?;
//! println!("logged in as {}", uid.uid);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error handling
//!
//! Nothing is retried. Every call returns either the raw body or an error:
//!
//! | Situation | Error |
//! |-----------|-------|
//! | no HTTP response (DNS, connect, TLS, timeout) | [`ApiClientError::Transport`] |
//! | non-2xx with a `{"error", "error_code", "request"}` body | [`ApiClientError::Service`] |
//! | non-2xx with any other body | [`ApiClientError::UnexpectedStatusCode`] |
//!
//! ## Logging
//!
//! Requests and responses are traced at `debug` level with the `tracing` crate.
//! Secrets (app secret, tokens, passwords) are never logged.

pub mod api;
mod client;
mod de;
pub mod encoding;
pub mod oauth2;

pub use self::client::{
    ApiCall, ApiClient, ApiClientBuilder, ApiClientError, BlockingTransport, DEFAULT_TIMEOUT,
    DEFAULT_USER_AGENT, HttpRequest, HttpResponse, HttpTransport, RequestMethod, SecureString,
    ServiceError, TransportError,
};
pub use self::encoding::{ParamValue, RequestParameter};
