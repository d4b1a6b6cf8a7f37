//! NFT ownership result.

use serde::{Deserialize, Serialize};

/// Whether a user holds a token of the configured collection.
///
/// A held token always comes with its image. `holding_nft = false` is
/// cached like any other value (negative caching).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftOwnership {
    pub holding_nft: bool,
    pub nft_image: Option<String>,
}

impl NftOwnership {
    pub fn held(nft_image: impl Into<String>) -> Self {
        Self {
            holding_nft: true,
            nft_image: Some(nft_image.into()),
        }
    }

    pub fn not_held() -> Self {
        Self {
            holding_nft: false,
            nft_image: None,
        }
    }
}

/// A token of the collection found in a wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedToken {
    pub contract_address: String,
    /// Gateway URL of the token's first media item, when the indexer has one.
    pub image_url: Option<String>,
}
