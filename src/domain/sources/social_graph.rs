use crate::domain::entities::{BestFriend, FarcasterUser};
use crate::error::ExternalError;
use async_trait::async_trait;

/// Read access to the Farcaster social graph.
///
/// Implemented by [`crate::infrastructure::http::NeynarClient`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialGraphSource: Send + Sync {
    /// Returns up to `limit` best friends of `fid`, highest affinity first.
    async fn best_friends(&self, fid: i64, limit: u32) -> Result<Vec<BestFriend>, ExternalError>;

    /// Returns the profiles of `fids`, as seen by `viewer_fid`.
    async fn bulk_users(
        &self,
        fids: &[i64],
        viewer_fid: Option<i64>,
    ) -> Result<Vec<FarcasterUser>, ExternalError>;
}
