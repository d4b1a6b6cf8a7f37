//! Read-through cache over a persisted [`CacheStore`].
//!
//! # Lookup Flow
//!
//! 1. Read the row for the key
//! 2. Row exists and is younger than the freshness window: return it
//! 3. Otherwise call the fetch closure (the external source)
//! 4. On success upsert the row with `updated_at` = fetch completion time
//!    and return it
//! 5. On failure propagate the error; a stale row is never served
//!
//! Concurrent misses for the same key may both fetch and both upsert. The
//! upsert is idempotent per key, so the last write wins.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::domain::entities::{CacheLookup, CacheOutcome, CacheStats};
use crate::domain::repositories::CacheStore;
use crate::error::AppError;

/// Time-bounded read-through cache for one entity kind.
pub struct ReadThroughCache<V, S: ?Sized> {
    store: Arc<S>,
    freshness: Duration,
    entity: &'static str,
    _value: PhantomData<fn() -> V>,
}

impl<V, S> ReadThroughCache<V, S>
where
    V: Clone + Send + Sync + 'static,
    S: CacheStore<V> + ?Sized,
{
    /// Creates a cache over `store`.
    ///
    /// `entity` names the cached kind in log lines (e.g. `"family"`).
    pub fn new(store: Arc<S>, freshness: Duration, entity: &'static str) -> Self {
        Self {
            store,
            freshness,
            entity,
            _value: PhantomData,
        }
    }

    /// Returns the value for `key`, refreshing it through `fetch` when the
    /// row is missing or stale.
    ///
    /// `fetch` is called at most once. Wrap it in
    /// [`crate::application::retry::with_retry`] to retry transient failures.
    /// A refreshed row is stamped with the time the fetch completed.
    ///
    /// # Errors
    ///
    /// - Store errors from the read or the upsert, as-is
    /// - The error returned by `fetch`; no row is written in that case
    pub async fn get<F, Fut>(&self, key: i64, fetch: F) -> Result<CacheLookup<V>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, AppError>>,
    {
        self.lookup(key, Utc::now(), fetch, Utc::now).await
    }

    /// Same as [`Self::get`] with a fixed clock reading, used both for the
    /// freshness check and as the `updated_at` of a refreshed row.
    pub async fn get_at<F, Fut>(
        &self,
        key: i64,
        now: DateTime<Utc>,
        fetch: F,
    ) -> Result<CacheLookup<V>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, AppError>>,
    {
        self.lookup(key, now, fetch, || now).await
    }

    async fn lookup<F, Fut, C>(
        &self,
        key: i64,
        now: DateTime<Utc>,
        fetch: F,
        written_at: C,
    ) -> Result<CacheLookup<V>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, AppError>>,
        C: FnOnce() -> DateTime<Utc>,
    {
        let outcome = match self.store.find_by_key(key).await? {
            Some(entry) if entry.is_fresh(self.freshness, now) => {
                debug!(entity = self.entity, key, "Cache HIT");
                return Ok(CacheLookup::from_entry(entry, CacheOutcome::Hit));
            }
            Some(entry) => {
                debug!(
                    entity = self.entity,
                    key,
                    age_secs = entry.age(now).num_seconds(),
                    "Cache STALE"
                );
                CacheOutcome::Refreshed
            }
            None => {
                debug!(entity = self.entity, key, "Cache MISS");
                CacheOutcome::Miss
            }
        };

        let value = fetch().await?;
        let entry = self.store.upsert(key, value, written_at()).await?;

        info!(
            entity = self.entity,
            key,
            outcome = outcome.as_str(),
            "Cache entry written"
        );

        Ok(CacheLookup::from_entry(entry, outcome))
    }

    /// Row counts, with rows older than the freshness window counted as stale.
    ///
    /// # Errors
    ///
    /// Returns store errors as-is.
    pub async fn stats(&self) -> Result<CacheStats, AppError> {
        self.store.stats(Utc::now() - self.freshness).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CacheEntry, NftOwnership};
    use crate::domain::repositories::MockCacheStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    const SIX_HOURS: i64 = 6;

    type NftStore = MockCacheStore<NftOwnership>;

    fn cache(store: NftStore) -> ReadThroughCache<NftOwnership, NftStore> {
        ReadThroughCache::new(Arc::new(store), Duration::hours(SIX_HOURS), "nft")
    }

    fn held() -> NftOwnership {
        NftOwnership::held("https://x/1.png")
    }

    #[tokio::test]
    async fn test_fresh_row_skips_source() {
        let now = Utc::now();
        let mut store = NftStore::new();

        store
            .expect_find_by_key()
            .withf(|key| *key == 42)
            .times(1)
            .returning(move |key| {
                Ok(Some(CacheEntry::new(key, held(), now - Duration::hours(1))))
            });
        store.expect_upsert().times(0);

        let calls = AtomicU32::new(0);
        let lookup = cache(store)
            .get_at(42, now, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(NftOwnership::not_held())
            })
            .await
            .unwrap();

        assert_eq!(lookup.outcome, CacheOutcome::Hit);
        assert_eq!(lookup.value, held());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_miss_fetches_once_and_persists() {
        let now = Utc::now();
        let mut store = NftStore::new();

        store
            .expect_find_by_key()
            .times(1)
            .returning(|_| Ok(None));
        store
            .expect_upsert()
            .withf(move |key, value, updated_at| {
                *key == 42 && *value == held() && *updated_at == now
            })
            .times(1)
            .returning(|key, value, updated_at| Ok(CacheEntry::new(key, value, updated_at)));

        let calls = AtomicU32::new(0);
        let lookup = cache(store)
            .get_at(42, now, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(held())
            })
            .await
            .unwrap();

        assert_eq!(lookup.outcome, CacheOutcome::Miss);
        assert_eq!(lookup.value, held());
        assert_eq!(lookup.updated_at, now);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refreshed_row_is_stamped_after_fetch() {
        let mut store = NftStore::new();

        store.expect_find_by_key().times(1).returning(|_| Ok(None));
        store
            .expect_upsert()
            .times(1)
            .returning(|key, value, updated_at| Ok(CacheEntry::new(key, value, updated_at)));

        let started = Utc::now();
        let lookup = cache(store)
            .get(42, || async {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                Ok(held())
            })
            .await
            .unwrap();

        assert!(lookup.updated_at - started >= Duration::milliseconds(50));
    }

    #[tokio::test]
    async fn test_stale_row_is_refreshed_and_overwritten() {
        let now = Utc::now();
        let mut store = NftStore::new();

        store.expect_find_by_key().times(1).returning(move |key| {
            Ok(Some(CacheEntry::new(key, held(), now - Duration::hours(7))))
        });
        store
            .expect_upsert()
            .withf(move |key, value, updated_at| {
                *key == 42 && !value.holding_nft && *updated_at == now
            })
            .times(1)
            .returning(|key, value, updated_at| Ok(CacheEntry::new(key, value, updated_at)));

        let lookup = cache(store)
            .get_at(42, now, || async { Ok(NftOwnership::not_held()) })
            .await
            .unwrap();

        assert_eq!(lookup.outcome, CacheOutcome::Refreshed);
        assert_eq!(lookup.value, NftOwnership::not_held());
        assert_eq!(lookup.updated_at, now);
    }

    #[tokio::test]
    async fn test_fetch_failure_on_miss_writes_nothing() {
        let mut store = NftStore::new();

        store.expect_find_by_key().times(1).returning(|_| Ok(None));
        store.expect_upsert().times(0);

        let result = cache(store)
            .get(42, || async {
                Err(AppError::upstream("alchemy down", json!({})))
            })
            .await;

        assert!(matches!(result, Err(AppError::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_fetch_failure_on_stale_row_has_no_fallback() {
        let now = Utc::now();
        let mut store = NftStore::new();

        store.expect_find_by_key().times(1).returning(move |key| {
            Ok(Some(CacheEntry::new(key, held(), now - Duration::hours(7))))
        });
        store.expect_upsert().times(0);

        let result = cache(store)
            .get_at(42, now, || async {
                Err(AppError::upstream("alchemy down", json!({})))
            })
            .await;

        assert!(matches!(result, Err(AppError::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_store_read_error_propagates() {
        let mut store = NftStore::new();

        store
            .expect_find_by_key()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        store.expect_upsert().times(0);

        let calls = AtomicU32::new(0);
        let result = cache(store)
            .get(42, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(held())
            })
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_write_error_propagates() {
        let mut store = NftStore::new();

        store.expect_find_by_key().times(1).returning(|_| Ok(None));
        store
            .expect_upsert()
            .times(1)
            .returning(|_, _, _| Err(AppError::internal("Database error", json!({}))));

        let result = cache(store).get(42, || async { Ok(held()) }).await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_repeated_hits_return_identical_values() {
        let now = Utc::now();
        let written = now - Duration::minutes(10);
        let mut store = NftStore::new();

        store
            .expect_find_by_key()
            .times(2)
            .returning(move |key| Ok(Some(CacheEntry::new(key, held(), written))));
        store.expect_upsert().times(0);

        let cache = cache(store);
        let first = cache
            .get_at(42, now, || async { Ok(NftOwnership::not_held()) })
            .await
            .unwrap();
        let second = cache
            .get_at(42, now + Duration::hours(1), || async {
                Ok(NftOwnership::not_held())
            })
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.value).unwrap(),
            serde_json::to_string(&second.value).unwrap()
        );
    }

    #[tokio::test]
    async fn test_stats_uses_freshness_cutoff() {
        let before = Utc::now();
        let mut store = NftStore::new();

        store
            .expect_stats()
            .withf(move |stale_before| {
                *stale_before <= before - Duration::hours(SIX_HOURS) + Duration::seconds(5)
                    && *stale_before >= before - Duration::hours(SIX_HOURS) - Duration::seconds(5)
            })
            .times(1)
            .returning(|_| Ok(CacheStats { total: 3, stale: 1 }));

        let stats = cache(store).stats().await.unwrap();

        assert_eq!(stats, CacheStats { total: 3, stale: 1 });
    }
}
