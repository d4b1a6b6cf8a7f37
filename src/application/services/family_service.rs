//! Family (best-friends graph) lookup service.

use std::sync::Arc;

use chrono::Duration;
use tracing::debug;

use crate::application::cache::ReadThroughCache;
use crate::application::retry::{RetryPolicy, with_retry};
use crate::application::services::ensure_valid_fid;
use crate::domain::entities::{CacheLookup, CacheStats, FamilySnapshot};
use crate::domain::repositories::CacheStore;
use crate::domain::sources::SocialGraphSource;
use crate::error::AppError;

/// Serves a user's family from the `family_cache` table, refreshing it from
/// the social graph when older than the freshness window.
///
/// A refresh makes two upstream calls: the best-friends ranking, then one
/// bulk profile lookup for all ranked members (skipped when the ranking is
/// empty). Each call goes through the retry policy.
pub struct FamilyService<S, G>
where
    S: CacheStore<FamilySnapshot>,
    G: SocialGraphSource,
{
    cache: ReadThroughCache<FamilySnapshot, S>,
    graph: Arc<G>,
    limit: u32,
    retry: RetryPolicy,
}

impl<S, G> FamilyService<S, G>
where
    S: CacheStore<FamilySnapshot>,
    G: SocialGraphSource,
{
    /// Creates a new family service.
    ///
    /// - `freshness` - maximum age of a cached family (1 hour by default)
    /// - `limit` - number of best friends requested per refresh
    pub fn new(
        store: Arc<S>,
        graph: Arc<G>,
        freshness: Duration,
        limit: u32,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            cache: ReadThroughCache::new(store, freshness, "family"),
            graph,
            limit,
            retry,
        }
    }

    /// Returns the family of `fid`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `fid` is not positive.
    /// Returns [`AppError::Upstream`] if the social graph cannot be reached
    /// after all retries. Returns [`AppError::Internal`] on database errors.
    pub async fn get_family(&self, fid: i64) -> Result<CacheLookup<FamilySnapshot>, AppError> {
        ensure_valid_fid(fid)?;
        self.cache.get(fid, || self.fetch_family(fid)).await
    }

    /// Row counts of the family cache.
    pub async fn cache_stats(&self) -> Result<CacheStats, AppError> {
        self.cache.stats().await
    }

    async fn fetch_family(&self, fid: i64) -> Result<FamilySnapshot, AppError> {
        let friends = with_retry(&self.retry, "neynar.best_friends", || {
            self.graph.best_friends(fid, self.limit)
        })
        .await?;

        if friends.is_empty() {
            debug!(fid, "No best friends returned");
            return Ok(FamilySnapshot::default());
        }

        let member_fids: Vec<i64> = friends.iter().map(|f| f.fid).collect();
        let profiles = with_retry(&self.retry, "neynar.bulk_users", || {
            self.graph.bulk_users(&member_fids, Some(fid))
        })
        .await?;

        Ok(FamilySnapshot::assemble(friends, profiles))
    }
}
