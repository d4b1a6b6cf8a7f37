use crate::domain::entities::OwnedToken;
use crate::error::ExternalError;
use async_trait::async_trait;

/// Ownership queries against an NFT index for one collection.
///
/// Implemented by [`crate::infrastructure::http::AlchemyClient`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NftOwnershipSource: Send + Sync {
    /// Returns the first token of the collection owned by `owner`, if any.
    async fn find_owned_token(&self, owner: &str) -> Result<Option<OwnedToken>, ExternalError>;
}
