//! Per-client rate limiting using the token bucket algorithm.
//!
//! Quotas are expressed the `tower_governor` way: one request is replenished
//! every `replenish_seconds`, and a client may spend up to `burst` requests at
//! once.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Seconds to regain one request on the lookup endpoints.
const REPLENISH_SECONDS: u64 = 2;
/// Requests a client may fire in a burst before being throttled.
const BURST_SIZE: u32 = 60;

/// Image generation is slow and billed per call.
const RESKIN_REPLENISH_SECONDS: u64 = 6;
const RESKIN_BURST_SIZE: u32 = 5;

type Limiter<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn build<K: KeyExtractor>(key_extractor: K, replenish_seconds: u64, burst: u32) -> Limiter<K> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(key_extractor)
            .per_second(replenish_seconds)
            .burst_size(burst)
            .finish()
            .expect("rate limit quota is non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Rate limiter keyed by the socket peer address.
///
/// # Limits
///
/// - **Rate**: one request every 2 seconds
/// - **Burst**: 60 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`. The server
/// must be started with connect info (see [`crate::server::run`]).
pub fn layer() -> Limiter<PeerIpKeyExtractor> {
    build(PeerIpKeyExtractor, REPLENISH_SECONDS, BURST_SIZE)
}

/// Same limits as [`layer`], keyed by the client IP found in
/// `X-Forwarded-For`, `X-Real-IP` or `Forwarded`, falling back to the peer
/// address.
///
/// Use only behind a trusted reverse proxy; clients can forge these headers.
pub fn proxy_layer() -> Limiter<SmartIpKeyExtractor> {
    build(SmartIpKeyExtractor, REPLENISH_SECONDS, BURST_SIZE)
}

/// Stricter limiter for `/api/reskin`: one request every 6 seconds, burst 5.
pub fn reskin_layer() -> Limiter<PeerIpKeyExtractor> {
    build(PeerIpKeyExtractor, RESKIN_REPLENISH_SECONDS, RESKIN_BURST_SIZE)
}

/// [`reskin_layer`] keyed like [`proxy_layer`].
pub fn reskin_proxy_layer() -> Limiter<SmartIpKeyExtractor> {
    build(SmartIpKeyExtractor, RESKIN_REPLENISH_SECONDS, RESKIN_BURST_SIZE)
}
