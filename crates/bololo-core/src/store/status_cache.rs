// ── Device status cache ──
//
// One snapshot plus its fetch time, behind an async mutex that doubles as
// the refresh guard: a caller holding the lock is the only one allowed to
// fetch, and late arrivals re-check freshness once they get the lock.
// The latest snapshot is mirrored into a `watch` channel for synchronous
// readers and subscribers.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::{Mutex, watch};
use tokio::time::Instant;
use tracing::debug;

use crate::error::CoreError;
use crate::model::StatusSnapshot;

struct CacheEntry {
    snapshot: Arc<StatusSnapshot>,
    fetched_at: Instant,
    fetched_at_utc: DateTime<Utc>,
    expired: bool,
}

impl CacheEntry {
    fn new(snapshot: Arc<StatusSnapshot>) -> Self {
        Self {
            snapshot,
            fetched_at: Instant::now(),
            fetched_at_utc: Utc::now(),
            expired: false,
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        !self.expired && self.fetched_at.elapsed() <= ttl
    }
}

/// Single-flight status cache for one device.
pub struct StatusCache {
    ttl: Duration,
    state: Mutex<Option<CacheEntry>>,
    published: watch::Sender<Option<Arc<StatusSnapshot>>>,
}

impl StatusCache {
    pub fn new(ttl: Duration) -> Self {
        let (published, _) = watch::channel(None);
        Self {
            ttl,
            state: Mutex::new(None),
            published,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached snapshot, fetching first if it is absent or older
    /// than the staleness window.
    ///
    /// At most one `fetch` runs at a time. A failed fetch leaves the
    /// previous entry in place and propagates the error.
    pub async fn get_or_refresh<F, Fut>(&self, fetch: F) -> Result<Arc<StatusSnapshot>, CoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<StatusSnapshot, CoreError>>,
    {
        let mut state = self.state.lock().await;
        if let Some(entry) = state.as_ref().filter(|e| e.is_fresh(self.ttl)) {
            return Ok(Arc::clone(&entry.snapshot));
        }

        debug!("status cache stale, refreshing");
        let snapshot = Arc::new(fetch().await?);
        *state = Some(CacheEntry::new(Arc::clone(&snapshot)));
        self.publish(Some(Arc::clone(&snapshot)));
        Ok(snapshot)
    }

    /// Replace the cached snapshot with a copy that has `field` set to `value`.
    ///
    /// The fetch time is left untouched. Returns `false` when nothing is cached.
    pub async fn apply_field(&self, field: &str, value: Value) -> bool {
        let mut state = self.state.lock().await;
        let Some(entry) = state.as_mut() else {
            return false;
        };
        entry.snapshot = Arc::new(entry.snapshot.with_field(field, value));
        self.publish(Some(Arc::clone(&entry.snapshot)));
        true
    }

    /// Force the next read to refetch, keeping the current snapshot visible.
    pub async fn invalidate(&self) {
        if let Some(entry) = self.state.lock().await.as_mut() {
            entry.expired = true;
        }
    }

    /// Drop the snapshot entirely.
    pub async fn clear(&self) {
        *self.state.lock().await = None;
        self.publish(None);
    }

    /// Latest snapshot without fetching.
    pub fn cached(&self) -> Option<Arc<StatusSnapshot>> {
        self.published.borrow().clone()
    }

    /// Wall-clock time of the last successful fetch.
    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.as_ref().map(|e| e.fetched_at_utc)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<StatusSnapshot>>> {
        self.published.subscribe()
    }

    fn publish(&self, snapshot: Option<Arc<StatusSnapshot>>) {
        self.published.send_replace(snapshot);
    }
}

impl std::fmt::Debug for StatusCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusCache")
            .field("ttl", &self.ttl)
            .field("cached", &self.cached().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures_util::future::join_all;
    use serde_json::json;

    use super::*;

    const TTL: Duration = Duration::from_secs(10);

    fn snapshot(switch: bool) -> StatusSnapshot {
        let mut map = bololo_api::StatusMap::new();
        map.insert("switch".into(), json!(switch));
        map.insert("anion".into(), json!(true));
        StatusSnapshot::new(map)
    }

    async fn counting_fetch(
        calls: &AtomicUsize,
        switch: bool,
    ) -> Result<StatusSnapshot, CoreError> {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(snapshot(switch))
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_reads_share_one_fetch() {
        let cache = StatusCache::new(TTL);
        let calls = AtomicUsize::new(0);

        let results =
            join_all((0..8).map(|_| cache.get_or_refresh(|| counting_fetch(&calls, false)))).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let first = results[0].as_ref().expect("first");
        for r in &results {
            assert!(Arc::ptr_eq(first, r.as_ref().expect("result")));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reuses_within_window_and_refetches_after() {
        let cache = StatusCache::new(TTL);
        let calls = AtomicUsize::new(0);

        cache.get_or_refresh(|| counting_fetch(&calls, false)).await.expect("fetch");
        tokio::time::advance(Duration::from_secs(5)).await;
        cache.get_or_refresh(|| counting_fetch(&calls, false)).await.expect("reuse");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(6)).await;
        let fresh = cache.get_or_refresh(|| counting_fetch(&calls, true)).await.expect("refetch");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(fresh.bool("switch"), Some(true));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_keeps_previous_entry() {
        let cache = StatusCache::new(TTL);
        let calls = AtomicUsize::new(0);
        cache.get_or_refresh(|| counting_fetch(&calls, false)).await.expect("fetch");
        tokio::time::advance(Duration::from_secs(11)).await;

        let err = cache
            .get_or_refresh(|| async {
                Err::<StatusSnapshot, _>(CoreError::Timeout {
                    path: "/status".into(),
                    timeout_secs: 10,
                })
            })
            .await;

        assert!(matches!(err, Err(CoreError::Timeout { .. })));
        assert_eq!(cache.cached().and_then(|s| s.bool("switch")), Some(false));
    }

    #[tokio::test]
    async fn apply_field_replaces_snapshot() {
        let cache = StatusCache::new(TTL);
        assert!(!cache.apply_field("switch", json!(true)).await);

        let calls = AtomicUsize::new(0);
        let before = cache.get_or_refresh(|| counting_fetch(&calls, false)).await.expect("fetch");
        assert!(cache.apply_field("switch", json!(true)).await);

        let after = cache.cached().expect("cached");
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.bool("switch"), Some(false));
        assert_eq!(after.bool("switch"), Some(true));
        assert_eq!(after.bool("anion"), Some(true));
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cache = StatusCache::new(TTL);
        let calls = AtomicUsize::new(0);
        cache.get_or_refresh(|| counting_fetch(&calls, false)).await.expect("fetch");

        cache.invalidate().await;
        assert!(cache.cached().is_some());
        cache.get_or_refresh(|| counting_fetch(&calls, false)).await.expect("refetch");
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        cache.clear().await;
        assert!(cache.cached().is_none());
        assert!(cache.fetched_at().await.is_none());
    }
}
