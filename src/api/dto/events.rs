//! DTOs for the event logging endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/events/log`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogEventRequest {
    #[validate(range(min = 1, message = "fid must be a positive integer"))]
    pub fid: i64,

    #[validate(length(min = 1, max = 64, message = "eventType must be 1-64 characters"))]
    pub event_type: String,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
