//! DTOs for the NFT ownership check endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{CacheLookup, CacheOutcome, NftOwnership};

/// Ownership answer with cache metadata.
///
/// The request body is a [`crate::domain::entities::FarcasterUser`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NftCheckResponse {
    pub holding_nft: bool,
    pub nft_image: Option<String>,
    pub cache: CacheOutcome,
    pub updated_at: DateTime<Utc>,
}

impl From<CacheLookup<NftOwnership>> for NftCheckResponse {
    fn from(lookup: CacheLookup<NftOwnership>) -> Self {
        Self {
            holding_nft: lookup.value.holding_nft,
            nft_image: lookup.value.nft_image,
            cache: lookup.outcome,
            updated_at: lookup.updated_at,
        }
    }
}
