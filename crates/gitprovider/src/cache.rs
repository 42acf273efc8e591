//! Conditional-request cache for provider reads.
//!
//! [`CachingTransport`] remembers successful `GET` responses that carry a
//! validator (`ETag` or `Last-Modified`). The next identical `GET` is sent as a
//! conditional request; when the provider answers `304 Not Modified` the stored
//! response is returned instead, tagged with [`FROM_CACHE_HEADER`].
//!
//! The cache never answers on its own: every read still reaches the provider,
//! so enabling it changes latency and hit accounting, never content.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::http::{HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// Header added to responses that were served from the cache.
pub const FROM_CACHE_HEADER: &str = "X-From-Cache";

/// Statistics about cache usage.
///
/// Tracks how many reads were answered from the cache (304 Not Modified) vs.
/// transferred in full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of reads that returned 304 Not Modified (cache hits).
    pub cache_hits: u32,
    /// Number of reads that were freshly fetched.
    pub fetched: u32,
}

impl CacheStats {
    /// Create new stats with the given values.
    #[inline]
    pub fn new(cache_hits: u32, fetched: u32) -> Self {
        Self {
            cache_hits,
            fetched,
        }
    }

    /// Returns the cache hit ratio (0.0 to 1.0).
    ///
    /// Returns 0.0 if no requests were made.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.cache_hits + self.fetched;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }

    #[inline]
    pub fn record_hit(&mut self) {
        self.cache_hits += 1;
    }

    #[inline]
    pub fn record_fetch(&mut self) {
        self.fetched += 1;
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    etag: Option<String>,
    last_modified: Option<String>,
    response: HttpResponse,
}

impl CacheEntry {
    fn from_response(response: &HttpResponse) -> Option<Self> {
        let etag = response.header("etag").map(str::to_string);
        let last_modified = response.header("last-modified").map(str::to_string);
        if etag.is_none() && last_modified.is_none() {
            return None;
        }
        Some(Self {
            etag,
            last_modified,
            response: response.clone(),
        })
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

/// In-memory store of validated responses keyed by request URL.
///
/// Owned by one client; dropped with it.
#[derive(Debug, Default)]
pub struct CacheStore {
    inner: Mutex<StoreInner>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn get(&self, url: &str) -> Option<CacheEntry> {
        self.lock().entries.get(url).cloned()
    }

    fn put(&self, url: &str, entry: CacheEntry) {
        self.lock().entries.insert(url.to_string(), entry);
    }

    /// Drop the entry for `url`, if any.
    pub fn invalidate(&self, url: &str) {
        self.lock().entries.remove(url);
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    fn record_hit(&self) {
        self.lock().stats.record_hit();
    }

    fn record_fetch(&self) {
        self.lock().stats.record_fetch();
    }
}

/// Transport wrapper that turns repeated reads into conditional requests.
pub struct CachingTransport<T> {
    inner: T,
    store: Arc<CacheStore>,
}

impl<T: HttpTransport> CachingTransport<T> {
    pub fn new(inner: T, store: Arc<CacheStore>) -> Self {
        Self { inner, store }
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for CachingTransport<T> {
    async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, HttpError> {
        if request.method != HttpMethod::Get {
            self.store.invalidate(&request.url);
            return self.inner.send(request).await;
        }

        let url = request.url.clone();
        let cached = self.store.get(&url);
        if let Some(entry) = &cached {
            if let Some(etag) = &entry.etag {
                request.set_header("If-None-Match", etag.clone());
            }
            if let Some(modified) = &entry.last_modified {
                request.set_header("If-Modified-Since", modified.clone());
            }
        }

        let response = self.inner.send(request).await?;

        if response.status == 304 {
            if let Some(entry) = cached {
                tracing::debug!("Cache hit for {}", url);
                self.store.record_hit();
                let mut response = entry.response;
                response
                    .headers
                    .push((FROM_CACHE_HEADER.to_string(), "1".to_string()));
                return Ok(response);
            }
            return Ok(response);
        }

        if response.is_success() {
            self.store.record_fetch();
            match CacheEntry::from_response(&response) {
                Some(entry) => self.store.put(&url, entry),
                None => self.store.invalidate(&url),
            }
        } else {
            self.store.invalidate(&url);
        }

        Ok(response)
    }
}
