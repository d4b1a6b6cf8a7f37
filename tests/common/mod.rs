#![allow(dead_code)]

use axum::{Router, routing::get};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use warplet_api::api::handlers::health_handler;
use warplet_api::api::routes::{api_routes, reskin_routes};
use warplet_api::application::retry::RetryPolicy;
use warplet_api::infrastructure::http::{AlchemyClient, GeminiClient, NeynarClient};
use warplet_api::state::{AppState, ServiceSettings};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const NEYNAR_KEY: &str = "test-neynar-key";
pub const ALCHEMY_KEY: &str = "test-alchemy-key";
pub const GEMINI_KEY: &str = "test-gemini-key";
pub const GEMINI_MODEL: &str = "gemini-test-image";
pub const CONTRACT: &str = "0x699727f9e01a822efdcf7333073f0461e5914b4e";

/// Builds application state whose upstream clients all point at `upstream`.
pub fn create_test_state(pool: PgPool, upstream: &MockServer) -> AppState {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    let neynar = Arc::new(NeynarClient::new(http.clone(), upstream.uri(), NEYNAR_KEY));
    let alchemy = Arc::new(AlchemyClient::new(
        http.clone(),
        upstream.uri(),
        ALCHEMY_KEY,
        CONTRACT,
    ));
    let gemini = Arc::new(GeminiClient::new(
        http,
        upstream.uri(),
        GEMINI_KEY,
        GEMINI_MODEL,
        Duration::from_secs(5),
    ));

    let settings = ServiceSettings {
        retry: RetryPolicy::new(2, Duration::from_millis(1)),
        ..ServiceSettings::default()
    };

    AppState::new(Arc::new(pool), neynar, alchemy, gemini, &settings)
}

/// Router with every API route and the health check, without rate limiting.
pub fn test_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes().merge(reskin_routes()))
        .with_state(state)
}

pub fn user_json(fid: i64, username: &str, eth_addresses: &[&str]) -> Value {
    json!({
        "fid": fid,
        "username": username,
        "display_name": username.to_uppercase(),
        "pfp_url": format!("https://img.example/{fid}.png"),
        "verified_addresses": { "eth_addresses": eth_addresses }
    })
}

pub async fn mount_best_friends(server: &MockServer, fid: i64, friends: Value) {
    Mock::given(method("GET"))
        .and(path("/v2/farcaster/user/best_friends"))
        .and(query_param("fid", fid.to_string()))
        .and(header("x-api-key", NEYNAR_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "users": friends })))
        .mount(server)
        .await;
}

pub async fn mount_bulk_users(server: &MockServer, users: Value) {
    Mock::given(method("GET"))
        .and(path("/v2/farcaster/user/bulk"))
        .and(header("x-api-key", NEYNAR_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "users": users })))
        .mount(server)
        .await;
}

fn alchemy_path() -> String {
    format!("/nft/v2/{ALCHEMY_KEY}/getNFTs")
}

/// Alchemy answers `owned_nfts` for `owner`, expecting exactly `calls` requests.
pub async fn mount_owned_nfts(server: &MockServer, owner: &str, owned_nfts: Value, calls: u64) {
    Mock::given(method("GET"))
        .and(path(alchemy_path()))
        .and(query_param("owner", owner))
        .and(query_param("contractAddresses[]", CONTRACT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "ownedNfts": owned_nfts, "totalCount": 1 })),
        )
        .expect(calls)
        .mount(server)
        .await;
}

pub fn owned_nft(image: &str) -> Value {
    json!({
        "contract": { "address": CONTRACT },
        "id": { "tokenId": "0x01" },
        "media": [{ "gateway": image, "raw": "ipfs://x" }]
    })
}

pub async fn seed_nft_row(
    pool: &PgPool,
    fid: i64,
    holding_nft: bool,
    nft_image: Option<&str>,
    updated_at: DateTime<Utc>,
) {
    sqlx::query(
        "INSERT INTO nft_ownership_cache (fid, holding_nft, nft_image, updated_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(fid)
    .bind(holding_nft)
    .bind(nft_image)
    .bind(updated_at)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn seed_family_row(pool: &PgPool, fid: i64, members: Value, updated_at: DateTime<Utc>) {
    sqlx::query("INSERT INTO family_cache (fid, members, updated_at) VALUES ($1, $2, $3)")
        .bind(fid)
        .bind(members)
        .bind(updated_at)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn nft_row_updated_at(pool: &PgPool, fid: i64) -> DateTime<Utc> {
    sqlx::query_scalar("SELECT updated_at FROM nft_ownership_cache WHERE fid = $1")
        .bind(fid)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn gemini_path() -> String {
    format!("/v1beta/models/{GEMINI_MODEL}:generateContent")
}

/// Gemini answers `parts` to prompts containing `prompt_fragment`.
pub async fn mount_gemini(server: &MockServer, prompt_fragment: &str, parts: Value, calls: u64) {
    Mock::given(method("POST"))
        .and(path(gemini_path()))
        .and(header("x-goog-api-key", GEMINI_KEY))
        .and(body_string_contains(prompt_fragment))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "role": "model", "parts": parts } }]
        })))
        .expect(calls)
        .mount(server)
        .await;
}

/// Serves three PNG bytes (`AAEC` in base64) at `image_path`.
pub async fn mount_source_image(server: &MockServer, image_path: &str) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0_u8, 1, 2], "image/png"))
        .mount(server)
        .await;
}
