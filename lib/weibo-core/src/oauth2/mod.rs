//! OAuth2 token acquisition.
//!
//! The [`TokenManager`] owns the application [`Credentials`] and the current
//! [`AccessToken`]. It supports these flows:
//!
//! | Flow | Method |
//! |------|--------|
//! | Authorization code | [`TokenManager::authorize_url`] then [`TokenManager::exchange_authorization_code`] |
//! | Resource owner password | [`TokenManager::exchange_password`] |
//! | Refresh token | [`TokenManager::exchange_refresh_token`] |
//! | Signed request (site-hosted apps) | [`TokenManager::exchange_signed_request`] |
//! | Direct login (best effort) | [`TokenManager::login_with_credentials`] |
//!
//! [`TokenManager::probe_token_validity`] classifies the current token as a [`TokenState`].
//!
//! Tokens are never refreshed automatically nor persisted.

mod config;
mod error;
mod login;
mod manager;
mod signed_request;
mod state;
mod token;

pub use self::config::{Credentials, DisplayType, OAuthEndpoints, ResponseType};
pub use self::error::OAuth2Error;
pub use self::login::{DirectLogin, LoginContext, WebFormLogin, extract_token_from_page};
pub use self::manager::{TokenManager, TokenManagerBuilder};
pub use self::signed_request::decode_signed_request;
pub use self::state::TokenState;
pub use self::token::AccessToken;
