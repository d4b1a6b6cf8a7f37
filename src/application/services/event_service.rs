//! User event logging service.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::application::services::ensure_valid_fid;
use crate::domain::entities::{NewUserEvent, UserEvent};
use crate::domain::repositories::UserEventRepository;
use crate::error::AppError;

/// Longest accepted event type name.
pub const MAX_EVENT_TYPE_LEN: usize = 64;

/// Records client-side events reported by the mini-app.
pub struct EventService<R: UserEventRepository> {
    repository: Arc<R>,
}

impl<R: UserEventRepository> EventService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Appends an event for `fid`.
    ///
    /// `event_type` is trimmed before validation and storage.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `fid` is not positive or
    /// `event_type` is empty or longer than [`MAX_EVENT_TYPE_LEN`] characters.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn log_event(&self, fid: i64, event_type: &str) -> Result<UserEvent, AppError> {
        ensure_valid_fid(fid)?;

        let event_type = event_type.trim();
        let len = event_type.chars().count();
        if len == 0 || len > MAX_EVENT_TYPE_LEN {
            return Err(AppError::bad_request(
                "eventType must be 1-64 characters",
                json!({ "length": len }),
            ));
        }

        let event = self
            .repository
            .create(NewUserEvent {
                fid,
                event_type: event_type.to_string(),
            })
            .await?;

        debug!(fid, event_type = %event.event_type, id = event.id, "Event logged");
        Ok(event)
    }
}
