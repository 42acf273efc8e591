use std::time::Duration;

use crate::retry::RetryConfig;

/// Domain used when none is configured.
pub const DEFAULT_DOMAIN: &str = "gitlab.com";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options shared by provider clients.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Provider domain, with or without scheme.
    pub domain: String,
    /// Send conditional requests for repeated reads.
    pub conditional_requests: bool,
    /// Allow calls that delete repositories.
    pub destructive_calls: bool,
    /// Retry policy for transient failures.
    pub retry: RetryConfig,
    /// Per-request timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            conditional_requests: false,
            destructive_calls: false,
            retry: RetryConfig::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("gitprovider/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientOptions {
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    #[must_use]
    pub fn with_conditional_requests(mut self, enabled: bool) -> Self {
        self.conditional_requests = enabled;
        self
    }

    #[must_use]
    pub fn with_destructive_calls(mut self, enabled: bool) -> Self {
        self.destructive_calls = enabled;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
