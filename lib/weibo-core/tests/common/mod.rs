#![allow(dead_code)]

use tracing::Level;

/// Installs a test-friendly tracing subscriber, once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Runs blocking client code off the async runtime.
///
/// The blocking `reqwest` client must be created and dropped inside `f`.
pub async fn blocking<F, T>(f: F) -> anyhow::Result<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}
