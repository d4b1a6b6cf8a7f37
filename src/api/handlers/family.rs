//! Handler for the family endpoint.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::api::dto::family::{FamilyQuery, FamilyResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the best-friends family of a user.
///
/// # Endpoint
///
/// `GET /api/family?fid={fid}`
///
/// # Caching
///
/// Served from the family cache when the stored family is younger than the
/// family freshness window (1 hour by default); otherwise refreshed from the
/// social graph first. The `cache` field reports `hit`, `miss` or `refreshed`.
///
/// # Response
///
/// ```json
/// {
///   "family": [
///     { "fid": 3, "username": "dwr", "mutual_affinity_score": 0.91, "profile": { ... } }
///   ],
///   "cache": "hit",
///   "updatedAt": "2025-09-01T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `fid` is missing or not a positive integer.
/// Returns 502 Bad Gateway if the social graph is unavailable.
pub async fn family_handler(
    State(state): State<AppState>,
    query: Result<Query<FamilyQuery>, QueryRejection>,
) -> Result<Json<FamilyResponse>, AppError> {
    let Query(params) = query?;

    let lookup = state.family_service.get_family(params.fid).await?;

    Ok(Json(lookup.into()))
}
