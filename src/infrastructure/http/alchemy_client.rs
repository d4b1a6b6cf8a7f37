//! Alchemy NFT API client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{endpoint, send_json};
use crate::domain::entities::OwnedToken;
use crate::domain::sources::NftOwnershipSource;
use crate::error::ExternalError;

const SERVICE: &str = "alchemy";

/// Alchemy `getNFTs` client scoped to one collection contract.
///
/// Implements [`NftOwnershipSource`]. The API key is part of the request
/// path: only owner and contract are logged, and transport errors are
/// stripped of the URL.
#[derive(Clone)]
pub struct AlchemyClient {
    http: Client,
    base_url: String,
    api_key: String,
    contract_address: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetNftsResponse {
    #[serde(default)]
    owned_nfts: Vec<OwnedNft>,
}

#[derive(Deserialize)]
struct OwnedNft {
    #[serde(default)]
    contract: Option<Contract>,
    #[serde(default)]
    media: Vec<Media>,
}

#[derive(Deserialize)]
struct Contract {
    address: String,
}

#[derive(Deserialize)]
struct Media {
    #[serde(default)]
    gateway: Option<String>,
}

impl OwnedNft {
    fn into_token(self, fallback_contract: &str) -> OwnedToken {
        let image_url = self
            .media
            .into_iter()
            .filter_map(|m| m.gateway)
            .find(|g| !g.is_empty());

        OwnedToken {
            contract_address: self
                .contract
                .map(|c| c.address)
                .unwrap_or_else(|| fallback_contract.to_string()),
            image_url,
        }
    }
}

impl AlchemyClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        contract_address: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            contract_address: contract_address.into(),
        }
    }
}

#[async_trait]
impl NftOwnershipSource for AlchemyClient {
    async fn find_owned_token(&self, owner: &str) -> Result<Option<OwnedToken>, ExternalError> {
        debug!(owner, contract = %self.contract_address, "Fetching owned NFTs");

        let path = format!("/nft/v2/{}/getNFTs", self.api_key);
        let request = self.http.get(endpoint(&self.base_url, &path)).query(&[
            ("owner", owner),
            ("contractAddresses[]", self.contract_address.as_str()),
        ]);

        let response: GetNftsResponse = send_json(SERVICE, request).await?;

        Ok(response
            .owned_nfts
            .into_iter()
            .next()
            .map(|nft| nft.into_token(&self.contract_address)))
    }
}
