//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::domain::entities::CacheStats;
use crate::error::AppError;
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: `SELECT 1` on the pool
/// 2. **Family cache**: row counts of `family_cache`
/// 3. **NFT cache**: row counts of `nft_ownership_cache`
///
/// Upstream APIs are not called.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "family_cache": { "status": "ok", "message": "12 rows, 3 stale" },
///     "nft_cache": { "status": "ok", "message": "40 rows, 0 stale" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let family_check = cache_check(state.family_service.cache_stats().await);
    let nft_check = cache_check(state.nft_service.cache_stats().await);

    let all_healthy = db_check.is_ok() && family_check.is_ok() && nft_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            family_cache: family_check,
            nft_cache: nft_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match sqlx::query("SELECT 1").execute(state.pool.as_ref()).await {
        Ok(_) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    }
}

fn cache_check(stats: Result<CacheStats, AppError>) -> CheckStatus {
    match stats {
        Ok(stats) => CheckStatus::ok(format!("{} rows, {} stale", stats.total, stats.stale)),
        Err(e) => CheckStatus::error(format!("Cache table error: {}", e)),
    }
}
