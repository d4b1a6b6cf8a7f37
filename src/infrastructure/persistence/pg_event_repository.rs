//! PostgreSQL implementation of the user event log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUserEvent, UserEvent};
use crate::domain::repositories::UserEventRepository;
use crate::error::AppError;

/// PostgreSQL repository for the `user_events` table.
pub struct PgUserEventRepository {
    pool: Arc<PgPool>,
}

impl PgUserEventRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserEventRow {
    id: i64,
    fid: i64,
    event_type: String,
    created_at: DateTime<Utc>,
}

impl From<UserEventRow> for UserEvent {
    fn from(row: UserEventRow) -> Self {
        UserEvent {
            id: row.id,
            fid: row.fid,
            event_type: row.event_type,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserEventRepository for PgUserEventRepository {
    async fn create(&self, event: NewUserEvent) -> Result<UserEvent, AppError> {
        let row = sqlx::query_as::<_, UserEventRow>(
            r#"
            INSERT INTO user_events (fid, event_type)
            VALUES ($1, $2)
            RETURNING id, fid, event_type, created_at
            "#,
        )
        .bind(event.fid)
        .bind(event.event_type)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn count_for_fid(&self, fid: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_events WHERE fid = $1")
            .bind(fid)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
