//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, migrations, outbound HTTP clients, and the
//! Axum server lifecycle.

use crate::config::Config;
use crate::infrastructure::http::{AlchemyClient, GeminiClient, NeynarClient};
use crate::routes::app_router;
use crate::state::{AppState, ServiceSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the PostgreSQL pool with the configured limits.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Builds the outbound HTTP client shared by the upstream API clients.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.http_timeout())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Neynar, Alchemy and Gemini clients over one shared `reqwest::Client`
/// - Services and application state
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    let http = build_http_client(&config)?;
    let neynar = Arc::new(NeynarClient::new(
        http.clone(),
        config.neynar_base_url.clone(),
        config.neynar_api_key.clone(),
    ));
    let alchemy = Arc::new(AlchemyClient::new(
        http.clone(),
        config.alchemy_base_url.clone(),
        config.alchemy_api_key.clone(),
        config.nft_contract_address.clone(),
    ));
    let gemini = Arc::new(GeminiClient::new(
        http,
        config.gemini_base_url.clone(),
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_timeout(),
    ));

    let state = AppState::new(
        Arc::new(pool),
        neynar,
        alchemy,
        gemini,
        &ServiceSettings::from(&config),
    );

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
