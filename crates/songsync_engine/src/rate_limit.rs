use std::sync::Arc;
use std::time::Duration;

use songsync_logging::sync_trace;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::{CatalogClient, CatalogError, Collection, SearchHit, UserProfile};

#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    /// Minimum spacing between the starts of two remote calls.
    pub min_interval: Duration,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(250),
        }
    }
}

/// Enforces a minimum interval between consecutive remote calls.
#[derive(Debug)]
pub struct RateLimiter {
    last_call: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            last_call: Mutex::new(None),
            min_interval: settings.min_interval,
        }
    }

    /// Waits until the next call is allowed, then claims the slot.
    pub async fn acquire(&self) {
        let mut last = self.last_call.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                sync_trace!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Wraps a catalog client so every remote call goes through one shared limiter.
#[derive(Debug)]
pub struct RateLimited<C> {
    inner: C,
    limiter: Arc<RateLimiter>,
}

impl<C> RateLimited<C> {
    pub fn new(inner: C, settings: RateLimitSettings) -> Self {
        Self::with_limiter(inner, Arc::new(RateLimiter::new(settings)))
    }

    /// Shares an existing limiter, e.g. across several clients of one service.
    pub fn with_limiter(inner: C, limiter: Arc<RateLimiter>) -> Self {
        Self { inner, limiter }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait::async_trait]
impl<C: CatalogClient> CatalogClient for RateLimited<C> {
    fn is_authenticated(&self) -> bool {
        self.inner.is_authenticated()
    }

    fn current_user(&self) -> Option<UserProfile> {
        self.inner.current_user()
    }

    async fn search(&self, query: &str) -> Result<Option<SearchHit>, CatalogError> {
        self.limiter.acquire().await;
        self.inner.search(query).await
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, CatalogError> {
        self.limiter.acquire().await;
        self.inner.list_collections().await
    }

    async fn create_collection(&self, title: &str) -> Result<Collection, CatalogError> {
        self.limiter.acquire().await;
        self.inner.create_collection(title).await
    }

    async fn append_to_collection(
        &self,
        collection_id: &str,
        remote_id: &str,
    ) -> Result<(), CatalogError> {
        self.limiter.acquire().await;
        self.inner.append_to_collection(collection_id, remote_id).await
    }
}
