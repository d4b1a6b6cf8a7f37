//! NFT ownership check service.

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use crate::application::cache::ReadThroughCache;
use crate::application::retry::{RetryPolicy, with_retry};
use crate::application::services::ensure_valid_fid;
use crate::domain::entities::{CacheLookup, CacheStats, FarcasterUser, NftOwnership};
use crate::domain::repositories::CacheStore;
use crate::domain::sources::NftOwnershipSource;
use crate::error::AppError;

/// Answers "does this user hold the collection NFT?" from the
/// `nft_ownership_cache` table, re-checking the NFT index when the cached
/// answer is older than the freshness window.
///
/// Negative answers are cached like positive ones.
pub struct NftService<S, N>
where
    S: CacheStore<NftOwnership>,
    N: NftOwnershipSource,
{
    cache: ReadThroughCache<NftOwnership, S>,
    source: Arc<N>,
    retry: RetryPolicy,
}

impl<S, N> NftService<S, N>
where
    S: CacheStore<NftOwnership>,
    N: NftOwnershipSource,
{
    /// Creates a new NFT service. `freshness` is 6 hours by default.
    pub fn new(store: Arc<S>, source: Arc<N>, freshness: Duration, retry: RetryPolicy) -> Self {
        Self {
            cache: ReadThroughCache::new(store, freshness, "nft"),
            source,
            retry,
        }
    }

    /// Returns the ownership status of `user`, keyed by `user.fid`.
    ///
    /// On refresh, the user's verified addresses are checked in order and the
    /// first address holding a token with an image wins; later addresses are
    /// not queried.
    /// A user without verified addresses is answered negatively without any
    /// upstream call.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `user.fid` is not positive.
    /// Returns [`AppError::Upstream`] if the NFT index fails after all retries.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn check_ownership(
        &self,
        user: &FarcasterUser,
    ) -> Result<CacheLookup<NftOwnership>, AppError> {
        ensure_valid_fid(user.fid)?;
        self.cache
            .get(user.fid, || self.fetch_ownership(user))
            .await
    }

    /// Row counts of the NFT ownership cache.
    pub async fn cache_stats(&self) -> Result<CacheStats, AppError> {
        self.cache.stats().await
    }

    async fn fetch_ownership(&self, user: &FarcasterUser) -> Result<NftOwnership, AppError> {
        let addresses = user
            .eth_addresses()
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty());

        for address in addresses {
            let token = with_retry(&self.retry, "alchemy.get_nfts", || {
                self.source.find_owned_token(address)
            })
            .await?;

            // A token the index has no image for does not count.
            if let Some(image) = token.and_then(|t| t.image_url) {
                info!(
                    fid = user.fid,
                    username = %user.username,
                    address,
                    image = %image,
                    "User is holding the NFT"
                );
                return Ok(NftOwnership::held(image));
            }
        }

        info!(fid = user.fid, username = %user.username, "User is not holding the NFT");
        Ok(NftOwnership::not_held())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CacheEntry, CacheOutcome, OwnedToken};
    use crate::domain::repositories::MockCacheStore;
    use crate::domain::sources::MockNftOwnershipSource;
    use crate::error::ExternalError;
    use chrono::Utc;

    type NftStore = MockCacheStore<NftOwnership>;

    fn service(
        store: NftStore,
        source: MockNftOwnershipSource,
    ) -> NftService<NftStore, MockNftOwnershipSource> {
        NftService::new(
            Arc::new(store),
            Arc::new(source),
            Duration::hours(6),
            RetryPolicy::no_retry(),
        )
    }

    fn token(image: Option<&str>) -> OwnedToken {
        OwnedToken {
            contract_address: "0x699727f9e01a822efdcf7333073f0461e5914b4e".to_string(),
            image_url: image.map(str::to_string),
        }
    }

    fn echo_upsert(store: &mut NftStore) {
        store
            .expect_upsert()
            .times(1)
            .returning(|key, value, updated_at| Ok(CacheEntry::new(key, value, updated_at)));
    }

    #[tokio::test]
    async fn test_first_holding_address_wins() {
        let mut store = NftStore::new();
        let mut source = MockNftOwnershipSource::new();

        store.expect_find_by_key().times(1).returning(|_| Ok(None));
        echo_upsert(&mut store);

        source
            .expect_find_owned_token()
            .withf(|owner| owner == "0xaaa")
            .times(1)
            .returning(|_| Ok(None));
        source
            .expect_find_owned_token()
            .withf(|owner| owner == "0xbbb")
            .times(1)
            .returning(|_| Ok(Some(token(Some("https://x/1.png")))));
        source
            .expect_find_owned_token()
            .withf(|owner| owner == "0xccc")
            .times(0);

        let user = FarcasterUser::new(42, "alice")
            .with_eth_address("0xaaa")
            .with_eth_address("0xbbb")
            .with_eth_address("0xccc");

        let lookup = service(store, source)
            .check_ownership(&user)
            .await
            .unwrap();

        assert_eq!(lookup.outcome, CacheOutcome::Miss);
        assert_eq!(
            lookup.value,
            NftOwnership::held("https://x/1.png")
        );
    }

    #[tokio::test]
    async fn test_no_holding_address_is_cached_negative() {
        let mut store = NftStore::new();
        let mut source = MockNftOwnershipSource::new();

        store.expect_find_by_key().times(1).returning(|_| Ok(None));
        store
            .expect_upsert()
            .withf(|key, value, _| *key == 42 && !value.holding_nft && value.nft_image.is_none())
            .times(1)
            .returning(|key, value, updated_at| Ok(CacheEntry::new(key, value, updated_at)));
        source
            .expect_find_owned_token()
            .times(2)
            .returning(|_| Ok(None));

        let user = FarcasterUser::new(42, "alice")
            .with_eth_address("0xaaa")
            .with_eth_address("0xbbb");

        let lookup = service(store, source)
            .check_ownership(&user)
            .await
            .unwrap();

        assert_eq!(lookup.value, NftOwnership::not_held());
    }

    #[tokio::test]
    async fn test_no_addresses_makes_no_upstream_call() {
        let mut store = NftStore::new();
        let mut source = MockNftOwnershipSource::new();

        store.expect_find_by_key().times(1).returning(|_| Ok(None));
        echo_upsert(&mut store);
        source.expect_find_owned_token().times(0);

        let lookup = service(store, source)
            .check_ownership(&FarcasterUser::new(42, "alice").with_eth_address("  "))
            .await
            .unwrap();

        assert!(!lookup.value.holding_nft);
    }

    #[tokio::test]
    async fn test_token_without_image_moves_to_next_address() {
        let mut store = NftStore::new();
        let mut source = MockNftOwnershipSource::new();

        store.expect_find_by_key().times(1).returning(|_| Ok(None));
        echo_upsert(&mut store);
        source
            .expect_find_owned_token()
            .withf(|owner| owner == "0xaaa")
            .times(1)
            .returning(|_| Ok(Some(token(None))));
        source
            .expect_find_owned_token()
            .withf(|owner| owner == "0xbbb")
            .times(1)
            .returning(|_| Ok(None));

        let user = FarcasterUser::new(42, "alice")
            .with_eth_address("0xaaa")
            .with_eth_address("0xbbb");

        let lookup = service(store, source)
            .check_ownership(&user)
            .await
            .unwrap();

        assert_eq!(lookup.value, NftOwnership::not_held());
    }

    #[tokio::test]
    async fn test_fresh_negative_entry_is_not_rechecked() {
        let mut store = NftStore::new();
        let mut source = MockNftOwnershipSource::new();

        store.expect_find_by_key().times(1).returning(|key| {
            Ok(Some(CacheEntry::new(
                key,
                NftOwnership::not_held(),
                Utc::now() - Duration::hours(5),
            )))
        });
        store.expect_upsert().times(0);
        source.expect_find_owned_token().times(0);

        let lookup = service(store, source)
            .check_ownership(&FarcasterUser::new(42, "alice").with_eth_address("0xaaa"))
            .await
            .unwrap();

        assert!(lookup.is_hit());
        assert!(!lookup.value.holding_nft);
    }

    #[tokio::test]
    async fn test_stale_entry_is_overwritten() {
        let mut store = NftStore::new();
        let mut source = MockNftOwnershipSource::new();

        store.expect_find_by_key().times(1).returning(|key| {
            Ok(Some(CacheEntry::new(
                key,
                NftOwnership::held("https://x/1.png"),
                Utc::now() - Duration::hours(7),
            )))
        });
        echo_upsert(&mut store);
        source
            .expect_find_owned_token()
            .times(1)
            .returning(|_| Ok(None));

        let lookup = service(store, source)
            .check_ownership(&FarcasterUser::new(42, "alice").with_eth_address("0xaaa"))
            .await
            .unwrap();

        assert_eq!(lookup.outcome, CacheOutcome::Refreshed);
        assert_eq!(lookup.value, NftOwnership::not_held());
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let mut store = NftStore::new();
        let mut source = MockNftOwnershipSource::new();

        store.expect_find_by_key().times(1).returning(|_| Ok(None));
        store.expect_upsert().times(0);
        source.expect_find_owned_token().times(1).returning(|_| {
            Err(ExternalError::Transport {
                service: "alchemy",
                message: "connection refused".to_string(),
            })
        });

        let result = service(store, source)
            .check_ownership(&FarcasterUser::new(42, "alice").with_eth_address("0xaaa"))
            .await;

        assert!(matches!(result, Err(AppError::Upstream { .. })));
    }
}
