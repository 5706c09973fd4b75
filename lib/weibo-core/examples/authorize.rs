//! Walks through the authorization code flow.
//!
//! ```sh
//! WEIBO_APP_KEY=... WEIBO_APP_SECRET=... WEIBO_CALLBACK_URL=... \
//!     cargo run --example authorize -- <code>
//! ```
//!
//! Without a code, prints the authorization page URL to visit first.

use std::env;

use tracing::info;
use weibo_core::oauth2::{Credentials, DisplayType, ResponseType, TokenManager, TokenState};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let credentials = Credentials::new(env::var("WEIBO_APP_KEY")?, env::var("WEIBO_APP_SECRET")?)
        .with_callback_url(env::var("WEIBO_CALLBACK_URL")?);
    let mut manager = TokenManager::builder(credentials).build()?;

    let Some(code) = env::args().nth(1) else {
        let url = manager.authorize_url(ResponseType::Code, None, DisplayType::Default);
        info!(%url, "open this page, then run again with the `code` query parameter");
        return Ok(());
    };

    let token = manager.exchange_authorization_code(&code)?;
    info!(uid = token.uid(), expires_in = ?token.expires_in(), "authorized");

    let state = manager.probe_token_validity()?;
    info!(%state, "token probed");
    if state == TokenState::Valid {
        let uid = weibo_core::api::account::get_uid(&manager)?;
        info!(uid = uid.uid, "identity confirmed");
    }

    Ok(())
}
