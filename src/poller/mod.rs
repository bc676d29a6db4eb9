//! Keyed polling subscriptions.
//!
//! Each page of the dashboard owns a subscription: a cache key (the full
//! resolved request URL, optionally parameterized by user input such as
//! the ticker) mapped to a fetch function and a revalidation interval.
//! The subscription exposes loading/error/data state to the render loop
//! and re-fetches on a background timer while the handle is alive.
//!
//! Contract:
//! - loading is true only until the first result for the current key;
//! - a failed fetch records an error but keeps previously cached data;
//! - `invalidate` forces an immediate out-of-cycle re-fetch (used after
//!   buy/sell mutations);
//! - a `None` key disables the subscription entirely: no fetch, no
//!   loading state;
//! - concurrent refreshes for one key are deduplicated through a pending
//!   registry mapping key -> shared in-flight future, so a timer tick and
//!   a user-triggered refresh never double-fetch;
//! - dropping the handle aborts the timer task, so no fetch or state
//!   update happens after drop.
//!
//! In-flight fetches are not cancelled when the key changes, but a result
//! arriving for a key that is no longer current is discarded, so a
//! disabled or re-keyed subscription never shows data from a stale fetch.

use dashmap::DashMap;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::Notify;
use tracing::debug;

/// Fetch outcome recorded into subscription state. The error side is a
/// display string; the poller keeps no structured error.
pub type FetchResult<T> = Result<T, String>;

/// Fetch function invoked with the current cache key
pub type Fetcher<T> = Arc<dyn Fn(String) -> BoxFuture<'static, FetchResult<T>> + Send + Sync>;

type SharedFetch<T> = Shared<BoxFuture<'static, FetchResult<T>>>;

/// Snapshot of a subscription exposed to views
#[derive(Debug)]
pub struct PollState<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub loading: bool,
}

impl<T> Default for PollState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
        }
    }
}

impl<T: Clone> Clone for PollState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            error: self.error.clone(),
            loading: self.loading,
        }
    }
}

/// Registry of in-flight fetches by cache key. Joining an existing entry
/// instead of inserting is what guarantees one network request per key at
/// a time.
pub struct PendingRegistry<T: Clone> {
    inflight: DashMap<String, SharedFetch<T>>,
}

impl<T: Clone> PendingRegistry<T> {
    pub fn new() -> Self {
        Self {
            inflight: DashMap::new(),
        }
    }

    /// Number of fetches currently in flight
    pub fn len(&self) -> usize {
        self.inflight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inflight.is_empty()
    }

    fn join_or_insert(
        &self,
        key: &str,
        make: impl FnOnce() -> BoxFuture<'static, FetchResult<T>>,
    ) -> SharedFetch<T> {
        self.inflight
            .entry(key.to_string())
            .or_insert_with(|| make().shared())
            .clone()
    }

    /// Remove a completed entry. `remove_if` guards against evicting a
    /// newer fetch that reused the key after this one completed.
    fn complete(&self, key: &str, fut: &SharedFetch<T>) {
        self.inflight.remove_if(key, |_, pending| pending.ptr_eq(fut));
    }
}

impl<T: Clone> Default for PendingRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

struct Inner<T: Clone> {
    key: RwLock<Option<String>>,
    state: RwLock<PollState<T>>,
    fetcher: Fetcher<T>,
    pending: Arc<PendingRegistry<T>>,
    wake: Notify,
}

impl<T: Clone + Send + Sync + 'static> Inner<T> {
    fn read_key(&self) -> Option<String> {
        read_lock(&self.key).clone()
    }

    async fn refresh(&self) {
        // Disabled subscription: no fetch, no loading state
        let Some(key) = self.read_key() else {
            return;
        };

        let fut = self.pending.join_or_insert(&key, || {
            debug!("fetch start: {}", key);
            (self.fetcher)(key.clone())
        });

        let result = fut.clone().await;
        self.pending.complete(&key, &fut);

        // The key may have been swapped or cleared while the fetch was in
        // flight; its result belongs to the old key and is discarded.
        if self.read_key().as_deref() != Some(key.as_str()) {
            debug!("discarding fetch result for stale key: {}", key);
            return;
        }

        let mut state = write_lock(&self.state);
        match result {
            Ok(data) => {
                state.data = Some(data);
                state.error = None;
            }
            Err(message) => {
                debug!("fetch failed for {}: {}", key, message);
                // stale-while-error: keep the previously cached data
                state.error = Some(message);
            }
        }
        state.loading = false;
    }
}

/// Handle to one polling subscription. Dropping it cancels the background
/// timer task.
pub struct Subscription<T: Clone + Send + Sync + 'static> {
    inner: Arc<Inner<T>>,
    task: tokio::task::JoinHandle<()>,
}

impl<T: Clone + Send + Sync + 'static> Subscription<T> {
    /// Start a subscription. The background task fetches immediately when
    /// a key is set, then re-fetches every `interval` until the handle is
    /// dropped.
    pub fn spawn(
        key: Option<String>,
        interval: Duration,
        fetcher: Fetcher<T>,
        pending: Arc<PendingRegistry<T>>,
    ) -> Self {
        let inner = Arc::new(Inner {
            state: RwLock::new(PollState {
                data: None,
                error: None,
                loading: key.is_some(),
            }),
            key: RwLock::new(key),
            fetcher,
            pending,
            wake: Notify::new(),
        });

        let task = tokio::spawn({
            let inner = inner.clone();
            async move {
                loop {
                    inner.refresh().await;
                    tokio::select! {
                        _ = tokio::time::sleep(interval) => {}
                        _ = inner.wake.notified() => {}
                    }
                }
            }
        });

        Self { inner, task }
    }

    /// Current state for rendering
    pub fn snapshot(&self) -> PollState<T> {
        read_lock(&self.inner.state).clone()
    }

    /// Current cache key
    pub fn key(&self) -> Option<String> {
        self.inner.read_key()
    }

    /// Swap the cache key. A changed key resets state (loading until the
    /// first result arrives, or fully idle for `None`); re-setting the
    /// same key just nudges an out-of-cycle refresh.
    pub fn set_key(&self, key: Option<String>) {
        let changed = {
            let mut current = write_lock(&self.inner.key);
            if *current == key {
                false
            } else {
                *current = key.clone();
                true
            }
        };

        if changed {
            let mut state = write_lock(&self.inner.state);
            *state = PollState {
                data: None,
                error: None,
                loading: key.is_some(),
            };
        }

        self.inner.wake.notify_one();
    }

    /// Nudge the background task into an immediate refresh without
    /// waiting for the result. Safe to call from the render/event path.
    pub fn request_refresh(&self) {
        self.inner.wake.notify_one();
    }

    /// Force a re-fetch and wait for it to land. Used after a successful
    /// mutation so the updated data is visible without waiting for the
    /// next interval tick. Deduplicates with a concurrent timer fetch.
    pub async fn invalidate(&self) {
        self.inner.refresh().await;
    }
}

impl<T: Clone + Send + Sync + 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_fetcher(
        counter: Arc<AtomicUsize>,
        delay: Duration,
        result: FetchResult<u64>,
    ) -> Fetcher<u64> {
        Arc::new(move |_key: String| {
            counter.fetch_add(1, Ordering::SeqCst);
            let result = result.clone();
            async move {
                tokio::time::sleep(delay).await;
                result
            }
            .boxed()
        })
    }

    #[tokio::test]
    async fn test_none_key_never_fetches_and_never_loads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let subscription = Subscription::spawn(
            None,
            Duration::from_millis(10),
            counting_fetcher(calls.clone(), Duration::ZERO, Ok(1)),
            Arc::new(PendingRegistry::new()),
        );

        tokio::time::sleep(Duration::from_millis(80)).await;

        let state = subscription.snapshot();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!state.loading);
        assert!(state.data.is_none());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_loading_until_first_result() {
        let calls = Arc::new(AtomicUsize::new(0));
        let subscription = Subscription::spawn(
            Some("key".to_string()),
            Duration::from_secs(60),
            counting_fetcher(calls.clone(), Duration::from_millis(50), Ok(7)),
            Arc::new(PendingRegistry::new()),
        );

        assert!(subscription.snapshot().loading);

        tokio::time::sleep(Duration::from_millis(150)).await;

        let state = subscription.snapshot();
        assert!(!state.loading);
        assert_eq!(state.data, Some(7));
    }

    #[tokio::test]
    async fn test_stale_data_preserved_on_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        // First fetch succeeds, every later one fails
        let fetcher: Fetcher<u64> = Arc::new(move |_key| {
            let call = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if call == 0 {
                    Ok(42)
                } else {
                    Err("backend down".to_string())
                }
            }
            .boxed()
        });

        let subscription = Subscription::spawn(
            Some("key".to_string()),
            Duration::from_millis(30),
            fetcher,
            Arc::new(PendingRegistry::new()),
        );

        tokio::time::sleep(Duration::from_millis(150)).await;

        let state = subscription.snapshot();
        assert_eq!(state.data, Some(42), "cached data survives later errors");
        assert_eq!(state.error.as_deref(), Some("backend down"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_share_one_fetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = Arc::new(PendingRegistry::new());
        let subscription = Arc::new(Subscription::spawn(
            Some("key".to_string()),
            Duration::from_secs(60),
            counting_fetcher(calls.clone(), Duration::from_millis(100), Ok(1)),
            registry.clone(),
        ));

        // The spawned timer task issues the first fetch; pile two manual
        // refreshes on top while it is still in flight.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(registry.len(), 1, "one shared fetch in flight");

        let (a, b) = tokio::join!(subscription.invalidate(), subscription.invalidate());
        let _ = (a, b);

        assert_eq!(calls.load(Ordering::SeqCst), 1, "in-flight fetch is shared");
        assert!(registry.is_empty(), "completed fetch is evicted");
    }

    #[tokio::test]
    async fn test_invalidate_refetches_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let subscription = Subscription::spawn(
            Some("key".to_string()),
            Duration::from_secs(60),
            counting_fetcher(calls.clone(), Duration::ZERO, Ok(1)),
            Arc::new(PendingRegistry::new()),
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Well before the 60s interval would tick
        subscription.invalidate().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_set_key_resets_state_and_disables_on_none() {
        let calls = Arc::new(AtomicUsize::new(0));
        let subscription = Subscription::spawn(
            Some("old".to_string()),
            Duration::from_secs(60),
            counting_fetcher(calls.clone(), Duration::from_millis(100), Ok(1)),
            Arc::new(PendingRegistry::new()),
        );

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(subscription.snapshot().data, Some(1));

        // The re-armed fetch is still in flight when we look
        subscription.set_key(Some("new".to_string()));
        assert!(subscription.snapshot().loading, "new key starts loading");

        subscription.set_key(None);
        let state = subscription.snapshot();
        assert!(!state.loading);
        assert!(state.data.is_none());
    }

    #[tokio::test]
    async fn test_result_discarded_when_key_cleared_mid_flight() {
        let calls = Arc::new(AtomicUsize::new(0));
        let subscription = Subscription::spawn(
            Some("key".to_string()),
            Duration::from_secs(60),
            counting_fetcher(calls.clone(), Duration::from_millis(100), Ok(1)),
            Arc::new(PendingRegistry::new()),
        );

        // Disable while the first fetch is still in flight
        tokio::time::sleep(Duration::from_millis(20)).await;
        subscription.set_key(None);

        tokio::time::sleep(Duration::from_millis(200)).await;

        let state = subscription.snapshot();
        assert!(state.data.is_none(), "disabled subscription shows no data");
        assert!(state.error.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_result_discarded_when_key_swapped_mid_flight() {
        // Fetch result depends on the key, so a stale write is observable
        let fetcher: Fetcher<u64> = Arc::new(|key: String| {
            async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok(key.len() as u64)
            }
            .boxed()
        });

        let subscription = Subscription::spawn(
            Some("a".to_string()),
            Duration::from_secs(60),
            fetcher,
            Arc::new(PendingRegistry::new()),
        );

        tokio::time::sleep(Duration::from_millis(20)).await;
        subscription.set_key(Some("abc".to_string()));

        // The fetch for "a" resolves here; it must not land
        tokio::time::sleep(Duration::from_millis(130)).await;
        let state = subscription.snapshot();
        assert_ne!(state.data, Some(1), "stale key result never lands");

        // The re-armed fetch for "abc" does
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(subscription.snapshot().data, Some(3));
    }

    #[tokio::test]
    async fn test_drop_stops_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let subscription = Subscription::spawn(
            Some("key".to_string()),
            Duration::from_millis(20),
            counting_fetcher(calls.clone(), Duration::ZERO, Ok(1)),
            Arc::new(PendingRegistry::new()),
        );

        tokio::time::sleep(Duration::from_millis(70)).await;
        drop(subscription);

        let after_drop = calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), after_drop);
    }
}
