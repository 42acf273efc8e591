//! Retrying transport wrapper and cache-hit accounting.
//!
//! [`RetryTransport`] sits in front of the rest of the transport chain and
//! resends a request when the failure is known to be transient: a connection
//! reset, or a provider response saying the resource is still being torn down.
//! It also feeds a [`CacheHitCounter`] from the `X-From-Cache` marker set by
//! [`crate::cache::CachingTransport`].

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use backon::{ConstantBuilder, Retryable};

use crate::cache::FROM_CACHE_HEADER;
use crate::http::{HttpError, HttpRequest, HttpResponse, HttpTransport};

/// Fixed pause between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Attempts per request, the first one included.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Response body fragments that mark a conflict the provider resolves by
/// itself given a little time.
pub const TRANSIENT_CONFLICT_MARKERS: &[&str] = &["The project is still being deleted"];

/// Configuration for retry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Delay between attempts.
    pub delay: Duration,
    /// Total number of attempts, including the first.
    pub max_attempts: usize,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_RETRY_DELAY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with custom values.
    #[must_use]
    pub fn new(delay: Duration, max_attempts: usize) -> Self {
        Self {
            delay,
            max_attempts,
        }
    }

    /// A configuration that never retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, 1)
    }

    /// Build a constant backoff strategy from this configuration.
    #[must_use]
    pub fn into_backoff(self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.delay)
            .with_max_times(self.max_attempts.saturating_sub(1))
    }
}

/// Whether a response describes a transient provider-side conflict.
///
/// Only error responses are inspected; a successful body that happens to
/// contain the marker text (a file download, say) is never retried.
#[must_use]
pub fn is_transient_conflict(response: &HttpResponse) -> bool {
    if response.is_success() {
        return false;
    }
    let body = String::from_utf8_lossy(&response.body);
    TRANSIENT_CONFLICT_MARKERS
        .iter()
        .any(|marker| body.contains(marker))
}

#[derive(Debug, Default)]
struct CounterState {
    enabled: bool,
    hits: usize,
}

/// Counts responses served from the conditional cache.
///
/// Counting is off until enabled, so a test can scope the count to a single
/// call with [`CacheHitCounter::count_hits_for`].
#[derive(Debug, Default)]
pub struct CacheHitCounter {
    state: Mutex<CounterState>,
}

impl CacheHitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CounterState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.lock().enabled = enabled;
    }

    pub fn reset(&self) {
        self.lock().hits = 0;
    }

    #[must_use]
    pub fn hits(&self) -> usize {
        self.lock().hits
    }

    /// Record a response, counting it if it carries the cache marker.
    pub fn observe(&self, response: &HttpResponse) {
        let mut state = self.lock();
        if state.enabled && response.header(FROM_CACHE_HEADER).is_some() {
            state.hits += 1;
        }
    }

    /// Run `operation` with counting enabled and return its output together
    /// with the number of cache hits it produced.
    pub async fn count_hits_for<F, Fut, T>(&self, operation: F) -> (T, usize)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.set_enabled(true);
        self.reset();
        let output = operation().await;
        self.set_enabled(false);
        (output, self.hits())
    }
}

/// Outcome of a single attempt that is a candidate for retry.
enum Attempt {
    Transport(HttpError),
    Conflict(HttpResponse),
}

impl Attempt {
    fn is_retryable(&self) -> bool {
        match self {
            Attempt::Transport(err) => err.is_transient(),
            Attempt::Conflict(_) => true,
        }
    }

    fn describe(&self) -> String {
        match self {
            Attempt::Transport(err) => err.to_string(),
            Attempt::Conflict(resp) => format!("HTTP {}", resp.status),
        }
    }
}

/// Transport wrapper that retries transient failures with a fixed delay.
pub struct RetryTransport<T> {
    inner: T,
    config: RetryConfig,
    counter: Arc<CacheHitCounter>,
}

impl<T: HttpTransport> RetryTransport<T> {
    pub fn new(inner: T, config: RetryConfig, counter: Arc<CacheHitCounter>) -> Self {
        Self {
            inner,
            config,
            counter,
        }
    }

    pub fn counter(&self) -> &Arc<CacheHitCounter> {
        &self.counter
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for RetryTransport<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let attempt = AtomicU32::new(0);
        let method = request.method.as_str();
        let url = request.url.clone();

        let operation = || {
            attempt.fetch_add(1, Ordering::SeqCst);
            let request = request.clone();
            async move {
                match self.inner.send(request).await {
                    Ok(resp) if is_transient_conflict(&resp) => Err(Attempt::Conflict(resp)),
                    Ok(resp) => Ok(resp),
                    Err(err) => Err(Attempt::Transport(err)),
                }
            }
        };

        let result = operation
            .retry(self.config.clone().into_backoff())
            .sleep(tokio::time::sleep)
            .when(Attempt::is_retryable)
            .notify(|err, dur| {
                tracing::debug!(
                    "Transient failure on {} {}, retrying in {:?} (attempt {}): {}",
                    method,
                    url,
                    dur,
                    attempt.load(Ordering::SeqCst),
                    err.describe()
                );
            })
            .await;

        let response = match result {
            Ok(resp) => resp,
            Err(Attempt::Conflict(resp)) => {
                tracing::warn!(
                    method,
                    url = %url,
                    status = resp.status,
                    attempts = attempt.load(Ordering::SeqCst),
                    "transient conflict persisted, giving up"
                );
                resp
            }
            Err(Attempt::Transport(err)) => {
                if err.is_transient() {
                    tracing::warn!(
                        method,
                        url = %url,
                        attempts = attempt.load(Ordering::SeqCst),
                        "transient transport error persisted, giving up"
                    );
                }
                return Err(err);
            }
        };

        self.counter.observe(&response);
        Ok(response)
    }
}
