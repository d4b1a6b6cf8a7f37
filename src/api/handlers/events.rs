//! Handler for client event logging.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::events::{LogEventRequest, MessageResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Records a client-side event.
///
/// # Endpoint
///
/// `POST /api/events/log`
///
/// # Request Body
///
/// ```json
/// { "fid": 42, "eventType": "mint_clicked" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `fid` is not positive or `eventType` is empty
/// or longer than 64 characters.
pub async fn log_event_handler(
    State(state): State<AppState>,
    body: Result<Json<LogEventRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(payload) = body?;
    payload.validate()?;

    state
        .event_service
        .log_event(payload.fid, &payload.event_type)
        .await?;

    Ok(Json(MessageResponse::new("Event logged successfully")))
}
