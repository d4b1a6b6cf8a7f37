//! Handler for bulk profile lookups.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::api::dto::users::{UsersQuery, UsersResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Fetches Farcaster profiles in bulk. Not cached.
///
/// # Endpoint
///
/// `GET /api/users?fids=1,2,3&viewerFid=42`
///
/// # Errors
///
/// Returns 400 Bad Request if `fids` is missing, empty, has more than 100
/// entries or contains a non-positive id.
/// Returns 502 Bad Gateway if the social graph is unavailable.
pub async fn users_handler(
    State(state): State<AppState>,
    query: Result<Query<UsersQuery>, QueryRejection>,
) -> Result<Json<UsersResponse>, AppError> {
    let Query(params) = query?;

    let users = state
        .user_service
        .bulk_users(&params.fids, params.viewer_fid)
        .await?;

    Ok(Json(UsersResponse { users }))
}
