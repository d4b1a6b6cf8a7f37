mod common;

use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::json;
use sqlx::PgPool;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn check_body(fid: i64, addresses: &[&str]) -> serde_json::Value {
    common::user_json(fid, "alice", addresses)
}

#[sqlx::test]
async fn test_nft_check_miss_then_hit(pool: PgPool) {
    let upstream = MockServer::start().await;
    common::mount_owned_nfts(
        &upstream,
        "0xaaa",
        json!([common::owned_nft("https://x/1.png")]),
        1,
    )
    .await;

    let state = common::create_test_state(pool, &upstream);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let first = server
        .post("/api/nft/check")
        .json(&check_body(42, &["0xaaa"]))
        .await;
    first.assert_status_ok();
    let first = first.json::<serde_json::Value>();
    assert_eq!(first["holdingNft"], true);
    assert_eq!(first["nftImage"], "https://x/1.png");
    assert_eq!(first["cache"], "miss");

    let second = server
        .post("/api/nft/check")
        .json(&check_body(42, &["0xaaa"]))
        .await;
    second.assert_status_ok();
    let second = second.json::<serde_json::Value>();
    assert_eq!(second["holdingNft"], true);
    assert_eq!(second["nftImage"], "https://x/1.png");
    assert_eq!(second["cache"], "hit");
    assert_eq!(second["updatedAt"], first["updatedAt"]);

    let requests = upstream.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[sqlx::test]
async fn test_nft_check_stale_row_is_overwritten(pool: PgPool) {
    let seeded_at = Utc::now() - Duration::hours(7);
    common::seed_nft_row(&pool, 42, true, Some("https://x/1.png"), seeded_at).await;

    let upstream = MockServer::start().await;
    common::mount_owned_nfts(&upstream, "0xaaa", json!([]), 1).await;

    let state = common::create_test_state(pool.clone(), &upstream);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .post("/api/nft/check")
        .json(&check_body(42, &["0xaaa"]))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["holdingNft"], false);
    assert!(json["nftImage"].is_null());
    assert_eq!(json["cache"], "refreshed");

    let updated_at = common::nft_row_updated_at(&pool, 42).await;
    assert!(updated_at > seeded_at + Duration::hours(6));

    let holding: bool =
        sqlx::query_scalar("SELECT holding_nft FROM nft_ownership_cache WHERE fid = 42")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(!holding);
}

#[sqlx::test]
async fn test_nft_check_fresh_negative_row_is_served(pool: PgPool) {
    common::seed_nft_row(&pool, 42, false, None, Utc::now() - Duration::hours(5)).await;

    let upstream = MockServer::start().await;
    let state = common::create_test_state(pool, &upstream);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .post("/api/nft/check")
        .json(&check_body(42, &["0xaaa"]))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["holdingNft"], false);
    assert_eq!(json["cache"], "hit");
    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[sqlx::test]
async fn test_nft_check_first_holding_address_wins(pool: PgPool) {
    let upstream = MockServer::start().await;
    common::mount_owned_nfts(&upstream, "0xaaa", json!([]), 1).await;
    common::mount_owned_nfts(
        &upstream,
        "0xbbb",
        json!([common::owned_nft("https://x/2.png")]),
        1,
    )
    .await;
    common::mount_owned_nfts(&upstream, "0xccc", json!([]), 0).await;

    let state = common::create_test_state(pool, &upstream);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .post("/api/nft/check")
        .json(&check_body(42, &["0xaaa", "0xbbb", "0xccc"]))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["holdingNft"], true);
    assert_eq!(json["nftImage"], "https://x/2.png");
}

#[sqlx::test]
async fn test_nft_check_without_addresses_is_cached_negative(pool: PgPool) {
    let upstream = MockServer::start().await;
    let state = common::create_test_state(pool.clone(), &upstream);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .post("/api/nft/check")
        .json(&json!({ "fid": 42, "username": "alice" }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["holdingNft"], false);
    assert_eq!(json["cache"], "miss");
    assert!(upstream.received_requests().await.unwrap().is_empty());

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM nft_ownership_cache WHERE fid = 42")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test]
async fn test_nft_check_upstream_failure_returns_502(pool: PgPool) {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(2)
        .mount(&upstream)
        .await;

    let state = common::create_test_state(pool.clone(), &upstream);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .post("/api/nft/check")
        .json(&check_body(42, &["0xaaa"]))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "upstream_error");
    assert_eq!(json["error"]["details"]["service"], "alchemy");
    assert_eq!(json["error"]["details"]["status"], 500);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM nft_ownership_cache")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[sqlx::test]
async fn test_nft_check_rejects_invalid_fid(pool: PgPool) {
    let upstream = MockServer::start().await;
    let state = common::create_test_state(pool, &upstream);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .post("/api/nft/check")
        .json(&check_body(0, &["0xaaa"]))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[sqlx::test]
async fn test_nft_check_rejects_malformed_body(pool: PgPool) {
    let upstream = MockServer::start().await;
    let state = common::create_test_state(pool, &upstream);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .post("/api/nft/check")
        .json(&json!({ "username": "no-fid" }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[sqlx::test]
async fn test_nft_check_token_without_media_is_not_held(pool: PgPool) {
    let upstream = MockServer::start().await;
    common::mount_owned_nfts(
        &upstream,
        "0xaaa",
        json!([{ "contract": { "address": common::CONTRACT }, "media": [] }]),
        1,
    )
    .await;
    common::mount_owned_nfts(&upstream, "0xbbb", json!([]), 1).await;

    let state = common::create_test_state(pool, &upstream);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server
        .post("/api/nft/check")
        .json(&check_body(42, &["0xaaa", "0xbbb"]))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["holdingNft"], false);
    assert!(json["nftImage"].is_null());
}
