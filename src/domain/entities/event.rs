//! Client-side user event.

use chrono::{DateTime, Utc};

/// An event reported by the mini-app front end (e.g. `mint_clicked`).
#[derive(Debug, Clone, PartialEq)]
pub struct UserEvent {
    pub id: i64,
    pub fid: i64,
    pub event_type: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for logging a new event.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserEvent {
    pub fid: i64,
    pub event_type: String,
}
