//! Repository trait for the user event log.

use crate::domain::entities::{NewUserEvent, UserEvent};
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only store of client-side user events.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserEventRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserEventRepository: Send + Sync {
    /// Appends an event and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, event: NewUserEvent) -> Result<UserEvent, AppError>;

    /// Counts events logged for a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_for_fid(&self, fid: i64) -> Result<i64, AppError>;
}
