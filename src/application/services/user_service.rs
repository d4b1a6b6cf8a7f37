//! Bulk profile lookup service.

use std::sync::Arc;

use serde_json::json;

use crate::application::retry::{RetryPolicy, with_retry};
use crate::domain::entities::FarcasterUser;
use crate::domain::sources::SocialGraphSource;
use crate::error::AppError;

/// Most fids the social API accepts in one bulk request.
pub const MAX_BULK_FIDS: usize = 100;

/// Uncached pass-through to the social graph's bulk profile endpoint.
pub struct UserService<G: SocialGraphSource> {
    graph: Arc<G>,
    retry: RetryPolicy,
}

impl<G: SocialGraphSource> UserService<G> {
    pub fn new(graph: Arc<G>, retry: RetryPolicy) -> Self {
        Self { graph, retry }
    }

    /// Fetches the profiles of `fids`, optionally as seen by `viewer_fid`.
    ///
    /// # Validation
    ///
    /// - `fids` is non-empty and holds at most [`MAX_BULK_FIDS`] ids
    /// - every id (and the viewer, if given) is positive
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if validation fails.
    /// Returns [`AppError::Upstream`] if the social graph fails after all retries.
    pub async fn bulk_users(
        &self,
        fids: &[i64],
        viewer_fid: Option<i64>,
    ) -> Result<Vec<FarcasterUser>, AppError> {
        Self::validate(fids, viewer_fid)?;

        let users = with_retry(&self.retry, "neynar.bulk_users", || {
            self.graph.bulk_users(fids, viewer_fid)
        })
        .await?;

        Ok(users)
    }

    fn validate(fids: &[i64], viewer_fid: Option<i64>) -> Result<(), AppError> {
        if fids.is_empty() {
            return Err(AppError::bad_request(
                "At least one fid is required",
                json!({}),
            ));
        }

        if fids.len() > MAX_BULK_FIDS {
            return Err(AppError::bad_request(
                "Too many fids",
                json!({ "max": MAX_BULK_FIDS, "got": fids.len() }),
            ));
        }

        if let Some(bad) = fids.iter().find(|fid| **fid <= 0) {
            return Err(AppError::bad_request(
                "fid must be a positive integer",
                json!({ "fid": bad }),
            ));
        }

        if let Some(viewer) = viewer_fid
            && viewer <= 0
        {
            return Err(AppError::bad_request(
                "viewerFid must be a positive integer",
                json!({ "viewerFid": viewer }),
            ));
        }

        Ok(())
    }
}
