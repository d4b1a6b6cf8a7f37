//! HTTP clients for the third-party APIs.
//!
//! - [`NeynarClient`] - Farcaster social graph
//! - [`AlchemyClient`] - NFT ownership index
//! - [`GeminiClient`] - Generative image model
//!
//! All share one [`reqwest::Client`] built in [`crate::server`], so the
//! connection pool and request timeout are configured once.

pub mod alchemy_client;
pub mod gemini_client;
pub mod neynar_client;

pub use alchemy_client::AlchemyClient;
pub use gemini_client::GeminiClient;
pub use neynar_client::NeynarClient;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::ExternalError;

/// Upper bound on the error body kept in [`ExternalError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Sends `request` and decodes a 2xx JSON body into `T`.
///
/// Transport failures, non-2xx statuses and undecodable bodies map to the
/// matching [`ExternalError`] variant tagged with `service`. Error messages
/// never include the request URL.
pub(crate) async fn send_json<T: DeserializeOwned>(
    service: &'static str,
    request: RequestBuilder,
) -> Result<T, ExternalError> {
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(service, e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(service, e))?;

    if !status.is_success() {
        return Err(ExternalError::Status {
            service,
            status: status.as_u16(),
            body: truncate(body, MAX_ERROR_BODY),
        });
    }

    serde_json::from_str(&body).map_err(|e| ExternalError::Decode {
        service,
        message: e.to_string(),
    })
}

/// Drops the request URL from `e`: some APIs carry the key in the path.
pub(crate) fn transport_error(service: &'static str, e: reqwest::Error) -> ExternalError {
    ExternalError::Transport {
        service,
        message: e.without_url().to_string(),
    }
}

fn truncate(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut end = max;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}

/// Joins a configured base URL and an absolute API path.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
