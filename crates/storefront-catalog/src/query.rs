//! # Query Client
//!
//! Caches, deduplicates and retries keyed async fetches.
//!
//! The product source only says *what* to fetch and under which key. Every
//! policy decision (freshness, retention, retries, sharing an in-flight
//! request) belongs to a [`QueryClient`]. [`MemoryQueryClient`] is the
//! implementation the app uses; anything else implementing the trait can be
//! plugged in instead.
//!
//! ## Fetch Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        fetch(key, fetcher)                              │
//! │                                                                         │
//! │   caller ──► wait on key lock ──► finished after we queued? ──yes──┐   │
//! │                     │                     │ no                      │   │
//! │                     │                     ▼                         │   │
//! │                     │              still fresh? ───────yes─────────┤   │
//! │                     │                     │ no                      │   │
//! │                     │                     ▼                         │   │
//! │                     │     status = Pending, run fetcher             │   │
//! │                     │       ├── Ok  ──► Success, data               │   │
//! │                     │       └── Err ──► retry with backoff          │   │
//! │                     │                  └── exhausted ──► Error      │   │
//! │                     │                                               ▼   │
//! │                     └──────────────────────────────────────► snapshot  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

use crate::error::{CatalogError, CatalogResult};

// =============================================================================
// Query Status & Result
// =============================================================================

/// Lifecycle of a keyed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    /// Not fetched yet, or a fetch is in flight.
    #[default]
    Pending,
    /// The last fetch succeeded.
    Success,
    /// The last fetch failed after all retries.
    Error,
}

impl std::fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryStatus::Pending => write!(f, "pending"),
            QueryStatus::Success => write!(f, "success"),
            QueryStatus::Error => write!(f, "error"),
        }
    }
}

/// Snapshot of a key: status plus the last data and error.
///
/// `data` survives a later failure, so a consumer can keep showing the last
/// good catalog next to the error.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    pub status: QueryStatus,
    pub data: Option<T>,
    pub error: Option<CatalogError>,
}

impl<T> QueryResult<T> {
    /// A key nobody has fetched yet.
    pub fn pending() -> Self {
        QueryResult {
            status: QueryStatus::Pending,
            data: None,
            error: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == QueryStatus::Pending
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

impl<T> Default for QueryResult<T> {
    fn default() -> Self {
        Self::pending()
    }
}

// =============================================================================
// Query Client Trait
// =============================================================================

/// The query collaborator: `fetch(key) -> {status, data, error}`.
pub trait QueryClient<T>: Send + Sync {
    /// Runs `fetcher` for `key` unless the policy says a cached or in-flight
    /// result can be shared, and returns the resulting snapshot.
    fn fetch<F, Fut>(&self, key: &str, fetcher: F) -> impl Future<Output = QueryResult<T>> + Send
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = CatalogResult<T>> + Send;

    /// Current snapshot for `key` without triggering a fetch.
    fn state(&self, key: &str) -> QueryResult<T>;

    /// Marks `key` stale so the next `fetch` goes to the network.
    fn invalidate(&self, key: &str);
}

// =============================================================================
// Query Options
// =============================================================================

/// Policy for [`MemoryQueryClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// How long a success stays fresh. Zero means always refetch.
    pub stale_time: Duration,
    /// How long an entry is kept after its last update.
    pub cache_time: Duration,
    /// Retries after the first failed attempt.
    pub retry: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            stale_time: Duration::ZERO,
            cache_time: Duration::from_secs(300),
            retry: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
        }
    }
}

// =============================================================================
// Memory Query Client
// =============================================================================

#[derive(Debug)]
struct Entry<T> {
    status: QueryStatus,
    data: Option<T>,
    error: Option<CatalogError>,
    /// When the fetch that produced the current status started.
    fetch_started_at: Option<Instant>,
    updated_at: Option<Instant>,
    invalidated_at: Option<Instant>,
}

impl<T> Entry<T> {
    /// An invalidation counts against every result whose fetch started at
    /// or before it, including a fetch still in flight when it arrived.
    fn is_invalidated(&self) -> bool {
        self.invalidated_at.is_some_and(|invalidated| {
            self.fetch_started_at
                .map_or(true, |started| invalidated >= started)
        })
    }
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Entry {
            status: QueryStatus::Pending,
            data: None,
            error: None,
            fetch_started_at: None,
            updated_at: None,
            invalidated_at: None,
        }
    }
}

/// One cache slot. `fetch_lock` serializes fetches for the key; `entry`
/// is the readable snapshot and is never held across an await.
#[derive(Debug)]
struct Slot<T> {
    fetch_lock: tokio::sync::Mutex<()>,
    entry: RwLock<Entry<T>>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot {
            fetch_lock: tokio::sync::Mutex::new(()),
            entry: RwLock::new(Entry::default()),
        }
    }
}

impl<T: Clone> Slot<T> {
    fn snapshot(&self) -> QueryResult<T> {
        let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
        QueryResult {
            status: entry.status,
            data: entry.data.clone(),
            error: entry.error.clone(),
        }
    }

    fn update(&self, f: impl FnOnce(&mut Entry<T>)) {
        let mut entry = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut entry);
    }
}

/// In-memory [`QueryClient`] with freshness, retention, retry and
/// in-flight deduplication.
#[derive(Debug)]
pub struct MemoryQueryClient<T> {
    options: QueryOptions,
    slots: Mutex<HashMap<String, Arc<Slot<T>>>>,
}

impl<T> MemoryQueryClient<T> {
    pub fn new(options: QueryOptions) -> Self {
        MemoryQueryClient {
            options,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    fn slot(&self, key: &str) -> Arc<Slot<T>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        self.prune(&mut slots);
        slots.entry(key.to_string()).or_default().clone()
    }

    fn existing_slot(&self, key: &str) -> Option<Arc<Slot<T>>> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Drops entries not updated within `cache_time` that nobody is using.
    fn prune(&self, slots: &mut HashMap<String, Arc<Slot<T>>>) {
        let cache_time = self.options.cache_time;
        slots.retain(|key, slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            let entry = slot.entry.read().unwrap_or_else(PoisonError::into_inner);
            let keep = entry
                .updated_at
                .map_or(true, |at| at.elapsed() < cache_time);
            if !keep {
                debug!(key = %key, "Evicting expired query entry");
            }
            keep
        });
    }

    fn is_fresh(&self, entry: &Entry<T>) -> bool {
        entry.status == QueryStatus::Success
            && !entry.is_invalidated()
            && entry
                .updated_at
                .is_some_and(|at| at.elapsed() < self.options.stale_time)
    }

    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.options.initial_backoff,
            max_interval: self.options.max_backoff,
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }

    async fn run_with_retry<F, Fut>(&self, key: &str, fetcher: &F) -> CatalogResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = CatalogResult<T>>,
    {
        let mut backoff = self.create_backoff();
        let mut attempt = 0u32;

        loop {
            match fetcher().await {
                Ok(data) => return Ok(data),
                Err(e) if attempt < self.options.retry && e.is_retryable() => {
                    attempt += 1;
                    let delay = backoff.next_backoff().unwrap_or(self.options.max_backoff);
                    warn!(key = %key, attempt, ?delay, error = %e, "Fetch failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!(key = %key, attempts = attempt + 1, error = %e, "Fetch failed");
                    return Err(e);
                }
            }
        }
    }
}

impl<T> Default for MemoryQueryClient<T> {
    fn default() -> Self {
        Self::new(QueryOptions::default())
    }
}

impl<T> QueryClient<T> for MemoryQueryClient<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn fetch<F, Fut>(&self, key: &str, fetcher: F) -> QueryResult<T>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = CatalogResult<T>> + Send,
    {
        let slot = self.slot(key);
        let queued_at = Instant::now();
        let _guard = slot.fetch_lock.lock().await;

        {
            let entry = slot.entry.read().unwrap_or_else(PoisonError::into_inner);
            let finished_while_queued = !entry.is_invalidated()
                && entry.updated_at.is_some_and(|at| at >= queued_at);
            if finished_while_queued {
                debug!(key = %key, "Sharing result of concurrent fetch");
                drop(entry);
                return slot.snapshot();
            }
            if self.is_fresh(&entry) {
                debug!(key = %key, "Serving fresh cached result");
                drop(entry);
                return slot.snapshot();
            }
        }

        let started_at = Instant::now();
        slot.update(|entry| entry.status = QueryStatus::Pending);
        debug!(key = %key, "Fetching");

        let outcome = self.run_with_retry(key, &fetcher).await;

        slot.update(|entry| {
            match outcome {
                Ok(data) => {
                    entry.status = QueryStatus::Success;
                    entry.data = Some(data);
                    entry.error = None;
                }
                Err(e) => {
                    entry.status = QueryStatus::Error;
                    entry.error = Some(e);
                }
            }
            entry.fetch_started_at = Some(started_at);
            entry.updated_at = Some(Instant::now());
        });

        slot.snapshot()
    }

    fn state(&self, key: &str) -> QueryResult<T> {
        self.existing_slot(key)
            .map(|slot| slot.snapshot())
            .unwrap_or_default()
    }

    fn invalidate(&self, key: &str) {
        if let Some(slot) = self.existing_slot(key) {
            debug!(key = %key, "Invalidating query");
            slot.update(|entry| entry.invalidated_at = Some(Instant::now()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_options() -> QueryOptions {
        QueryOptions {
            stale_time: Duration::from_secs(60),
            cache_time: Duration::from_secs(300),
            retry: 2,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
        }
    }

    #[tokio::test]
    async fn test_unknown_key_is_pending() {
        let client: MemoryQueryClient<u32> = MemoryQueryClient::default();
        let state = client.state("products");
        assert!(state.is_pending());
        assert!(state.data.is_none());
    }

    #[tokio::test]
    async fn test_success_is_cached_while_fresh() {
        let client = MemoryQueryClient::new(fast_options());
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetcher = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, CatalogError>(vec![1, 2, 3])
        };

        let first = client.fetch("products", &fetcher).await;
        let second = client.fetch("products", &fetcher).await;

        assert!(first.is_success());
        assert_eq!(second.data, Some(vec![1, 2, 3]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(client.state("products").is_success());
    }

    #[tokio::test]
    async fn test_zero_stale_time_refetches() {
        let client = MemoryQueryClient::new(QueryOptions {
            stale_time: Duration::ZERO,
            ..fast_options()
        });
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetcher = move || async move {
            Ok::<_, CatalogError>(counter.fetch_add(1, Ordering::SeqCst))
        };

        client.fetch("products", &fetcher).await;
        let second = client.fetch("products", &fetcher).await;

        assert_eq!(second.data, Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let client = MemoryQueryClient::new(fast_options());
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetcher = move || async move {
            Ok::<_, CatalogError>(counter.fetch_add(1, Ordering::SeqCst))
        };

        client.fetch("products", &fetcher).await;
        client.invalidate("products");
        let refreshed = client.fetch("products", &fetcher).await;

        assert_eq!(refreshed.data, Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retryable_failure_is_retried() {
        let client = MemoryQueryClient::new(fast_options());
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetcher = move || async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(CatalogError::RequestFailed("connection reset".into()))
            } else {
                Ok("catalog")
            }
        };

        let result = client.fetch("products", &fetcher).await;

        assert!(result.is_success());
        assert_eq!(result.data, Some("catalog"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_report_error() {
        let client = MemoryQueryClient::new(fast_options());
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetcher = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<u8, _>(CatalogError::HttpStatus { status: 503 })
        };

        let result = client.fetch("products", &fetcher).await;

        assert!(result.is_error());
        assert_eq!(result.error, Some(CatalogError::HttpStatus { status: 503 }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_failure_fails_fast() {
        let client = MemoryQueryClient::new(fast_options());
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetcher = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<u8, _>(CatalogError::HttpStatus { status: 404 })
        };

        let result = client.fetch("products", &fetcher).await;

        assert!(result.is_error());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_keeps_previous_data() {
        let client = MemoryQueryClient::new(QueryOptions {
            stale_time: Duration::ZERO,
            retry: 0,
            ..fast_options()
        });

        client
            .fetch("products", || async { Ok::<_, CatalogError>(7u8) })
            .await;
        let failed = client
            .fetch("products", || async {
                Err::<u8, _>(CatalogError::RequestFailed("down".into()))
            })
            .await;

        assert!(failed.is_error());
        assert_eq!(failed.data, Some(7));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_fetches_are_deduplicated() {
        let client = Arc::new(MemoryQueryClient::new(QueryOptions {
            stale_time: Duration::ZERO,
            ..fast_options()
        }));
        let calls = Arc::new(AtomicUsize::new(0));
        let (release_tx, release_rx) = tokio::sync::watch::channel(false);

        let mut handles = Vec::new();
        for _ in 0..4 {
            let client = Arc::clone(&client);
            let calls = Arc::clone(&calls);
            let release_rx = release_rx.clone();
            handles.push(tokio::spawn(async move {
                client
                    .fetch("products", move || {
                        let calls = Arc::clone(&calls);
                        let mut release_rx = release_rx.clone();
                        async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            let _ = release_rx.wait_for(|released| *released).await;
                            Ok::<_, CatalogError>(42u32)
                        }
                    })
                    .await
            }));
        }

        // Let every task queue up behind the first fetch before releasing it.
        while calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(client.state("products").is_pending());
        release_tx.send(true).unwrap();

        for handle in handles {
            let result = handle.await.unwrap();
            assert_eq!(result.data, Some(42));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_invalidate_during_fetch_is_not_lost() {
        let client = Arc::new(MemoryQueryClient::new(fast_options()));
        let calls = Arc::new(AtomicUsize::new(0));
        let (release_tx, release_rx) = tokio::sync::watch::channel(false);

        let fetch = |client: Arc<MemoryQueryClient<usize>>| {
            let calls = Arc::clone(&calls);
            let release_rx = release_rx.clone();
            tokio::spawn(async move {
                client
                    .fetch("products", move || {
                        let calls = Arc::clone(&calls);
                        let mut release_rx = release_rx.clone();
                        async move {
                            let call = calls.fetch_add(1, Ordering::SeqCst);
                            let _ = release_rx.wait_for(|released| *released).await;
                            Ok::<_, CatalogError>(call)
                        }
                    })
                    .await
            })
        };

        let first = fetch(Arc::clone(&client));
        while calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        // Queued behind the in-flight fetch, before the invalidation.
        let queued = fetch(Arc::clone(&client));
        tokio::time::sleep(Duration::from_millis(20)).await;
        client.invalidate("products");
        release_tx.send(true).unwrap();

        assert_eq!(first.await.unwrap().data, Some(0));
        assert_eq!(queued.await.unwrap().data, Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // The refetch started after the invalidation, so it is fresh again.
        let cached = fetch(Arc::clone(&client)).await.unwrap();
        assert_eq!(cached.data, Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
