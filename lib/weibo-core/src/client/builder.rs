use std::sync::{Arc, Mutex};
use std::time::Duration;

use http::HeaderValue;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::{ApiClient, ApiClientError, BlockingTransport, HttpTransport};

/// The User-Agent the service has always been called with.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 6.0)";

/// The per-call timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`ApiClient`] instances.
///
/// # Default Configuration
///
/// - **App key**: none (unauthenticated calls carry no `source` parameter)
/// - **Timeout**: 30 seconds
/// - **User-Agent**: `Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 6.0)`
/// - **Transport**: [`BlockingTransport`] over a default `reqwest` blocking client
/// - **Random source**: `StdRng` seeded from the operating system
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use weibo_core::ApiClient;
///
/// # fn example() -> Result<(), weibo_core::ApiClientError> {
/// let client = ApiClient::builder()
///     .with_app_key("1234567890")
///     .with_timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(derive_more::Debug)]
pub struct ApiClientBuilder {
    app_key: Option<String>,
    timeout: Duration,
    user_agent: String,
    transport: Option<Arc<dyn HttpTransport>>,
    #[debug(ignore)]
    rng: Option<Box<dyn RngCore + Send>>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            app_key: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            transport: None,
            rng: None,
        }
    }
}

impl ApiClientBuilder {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Fails if the user agent is not a valid header value, or if the default
    /// transport cannot be created.
    pub fn build(self) -> Result<ApiClient, ApiClientError> {
        let Self {
            app_key,
            timeout,
            user_agent,
            transport,
            rng,
        } = self;

        let user_agent = HeaderValue::from_str(&user_agent)?;
        let transport = match transport {
            Some(transport) => transport,
            None => Arc::new(BlockingTransport::new()?),
        };
        let rng = rng.unwrap_or_else(|| Box::new(StdRng::from_os_rng()));

        Ok(ApiClient {
            app_key,
            user_agent,
            timeout,
            transport,
            rng: Mutex::new(rng),
        })
    }

    /// Sets the application key.
    ///
    /// Calls made without an access token send it as the `source` query parameter.
    #[must_use]
    pub fn with_app_key(mut self, app_key: impl Into<String>) -> Self {
        self.app_key = Some(app_key.into());
        self
    }

    /// Sets the default timeout of every call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the `User-Agent` header sent with every call.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sends requests through the given transport instead of the default one.
    #[must_use]
    pub fn with_transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Uses the given random source for multipart boundaries and file names.
    #[must_use]
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Uses a `StdRng` seeded with `seed`, making multipart output reproducible.
    #[must_use]
    pub fn with_rng_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }
}
