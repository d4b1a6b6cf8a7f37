//! Handler for the NFT ownership check endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::api::dto::nft::NftCheckResponse;
use crate::domain::entities::FarcasterUser;
use crate::error::AppError;
use crate::state::AppState;

/// Reports whether a user holds a token of the configured collection.
///
/// # Endpoint
///
/// `POST /api/nft/check`
///
/// # Request Body
///
/// The user's Farcaster profile; only `fid` and
/// `verified_addresses.eth_addresses` are used.
///
/// ```json
/// { "fid": 42, "username": "alice", "verified_addresses": { "eth_addresses": ["0xabc..."] } }
/// ```
///
/// # Response
///
/// ```json
/// { "holdingNft": true, "nftImage": "https://...", "cache": "miss", "updatedAt": "..." }
/// ```
///
/// Negative answers are cached for the NFT freshness window (6 hours by
/// default) like positive ones.
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed or `fid` is not positive.
/// Returns 502 Bad Gateway if the NFT index is unavailable.
pub async fn nft_check_handler(
    State(state): State<AppState>,
    body: Result<Json<FarcasterUser>, JsonRejection>,
) -> Result<Json<NftCheckResponse>, AppError> {
    let Json(user) = body?;

    let lookup = state.nft_service.check_ownership(&user).await?;

    Ok(Json(lookup.into()))
}
