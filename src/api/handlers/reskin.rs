//! Handler for generative image reskins.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::reskin::{ReskinRequest, ReskinResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Redraws an NFT image in a theme.
///
/// # Endpoint
///
/// `POST /api/reskin`
///
/// # Request Body
///
/// ```json
/// { "imageUrl": "https://.../warplet.png", "theme": "Buddhist" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "image": "data:image/png;base64,...",
///   "theme": "Buddhist",
///   "gender": "female",
///   "description": "a green frog in a hoodie"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for an invalid theme or image URL.
/// Returns 502 Bad Gateway if the image cannot be downloaded or the model
/// returns no image.
pub async fn reskin_handler(
    State(state): State<AppState>,
    body: Result<Json<ReskinRequest>, JsonRejection>,
) -> Result<Json<ReskinResponse>, AppError> {
    let Json(payload) = body?;
    payload.validate()?;

    let reskin = state
        .reskin_service
        .reskin(&payload.image_url, &payload.theme)
        .await?;

    Ok(Json(reskin.into()))
}
