//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`  - Health check: database and cache tables (not rate limited)
//! - `/api/*`        - Mini-app API (rate limited per client IP)
//! - `POST /api/reskin` - Image generation (stricter per-IP limit)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let api_router = if behind_proxy {
        api::routes::api_routes()
            .layer(rate_limit::proxy_layer())
            .merge(api::routes::reskin_routes().layer(rate_limit::reskin_proxy_layer()))
    } else {
        api::routes::api_routes()
            .layer(rate_limit::layer())
            .merge(api::routes::reskin_routes().layer(rate_limit::reskin_layer()))
    };

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
