//! Persisted key/value store behind the read-through cache.

use crate::domain::entities::{CacheEntry, CacheStats};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A persisted cache table keyed by Farcaster id.
///
/// One implementation exists per cached entity kind; the read-through logic in
/// [`crate::application::cache::ReadThroughCache`] is written once against
/// this trait.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgFamilyCacheRepository`] - `family_cache` table
/// - [`crate::infrastructure::persistence::PgNftCacheRepository`] - `nft_ownership_cache` table
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore<V: Send + Sync + 'static>: Send + Sync {
    /// Reads the row for `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(entry))` if a row exists, whatever its age
    /// - `Ok(None)` if the key was never cached
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_key(&self, key: i64) -> Result<Option<CacheEntry<V>>, AppError>;

    /// Inserts the row for `key`, or overwrites value and `updated_at` if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn upsert(
        &self,
        key: i64,
        value: V,
        updated_at: DateTime<Utc>,
    ) -> Result<CacheEntry<V>, AppError>;

    /// Deletes rows last written before `cutoff`. Returns the number removed.
    ///
    /// Never called by the request path; retention is an operator action.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;

    /// Counts all rows and the rows last written before `stale_before`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn stats(&self, stale_before: DateTime<Utc>) -> Result<CacheStats, AppError>;
}
