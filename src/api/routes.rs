//! API route configuration.
//!
//! Endpoints are public; abuse is bounded by per-client rate limiting
//! applied in [`crate::routes::app_router`]. The reskin route is kept apart
//! so it can get a stricter limit.

use crate::api::handlers::{
    family_handler, log_event_handler, nft_check_handler, reskin_handler, users_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All `/api` routes.
///
/// # Endpoints
///
/// - `GET  /family`      - Cached best-friends family of a user
/// - `POST /nft/check`   - Cached NFT ownership check
/// - `GET  /users`       - Bulk profile lookup (uncached)
/// - `POST /events/log`  - Record a client event
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/family", get(family_handler))
        .route("/nft/check", post(nft_check_handler))
        .route("/users", get(users_handler))
        .route("/events/log", post(log_event_handler))
}

/// `POST /reskin` - Themed redraw of an NFT image.
pub fn reskin_routes() -> Router<AppState> {
    Router::new().route("/reskin", post(reskin_handler))
}
