//! Neynar API client (Farcaster social graph).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{endpoint, send_json};
use crate::domain::entities::{BestFriend, FarcasterUser};
use crate::domain::sources::SocialGraphSource;
use crate::error::ExternalError;

const SERVICE: &str = "neynar";
const API_KEY_HEADER: &str = "x-api-key";

/// Neynar v2 client implementing [`SocialGraphSource`].
#[derive(Clone)]
pub struct NeynarClient {
    http: Client,
    base_url: String,
    api_key: String,
}

/// Both endpoints wrap their result in `{"users": [...]}`.
#[derive(Deserialize)]
struct UsersEnvelope<T> {
    #[serde(default = "Vec::new")]
    users: Vec<T>,
}

impl NeynarClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl SocialGraphSource for NeynarClient {
    async fn best_friends(&self, fid: i64, limit: u32) -> Result<Vec<BestFriend>, ExternalError> {
        debug!(fid, limit, "Fetching best friends");

        let request = self
            .http
            .get(endpoint(&self.base_url, "/v2/farcaster/user/best_friends"))
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("limit", limit.to_string()), ("fid", fid.to_string())]);

        let envelope: UsersEnvelope<BestFriend> = send_json(SERVICE, request).await?;
        Ok(envelope.users)
    }

    async fn bulk_users(
        &self,
        fids: &[i64],
        viewer_fid: Option<i64>,
    ) -> Result<Vec<FarcasterUser>, ExternalError> {
        debug!(count = fids.len(), ?viewer_fid, "Fetching bulk users");

        let joined = fids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let mut query = vec![("fids", joined)];
        if let Some(viewer) = viewer_fid {
            query.push(("viewer_fid", viewer.to_string()));
        }

        let request = self
            .http
            .get(endpoint(&self.base_url, "/v2/farcaster/user/bulk"))
            .header(API_KEY_HEADER, &self.api_key)
            .query(&query);

        let envelope: UsersEnvelope<FarcasterUser> = send_json(SERVICE, request).await?;
        Ok(envelope.users)
    }
}
