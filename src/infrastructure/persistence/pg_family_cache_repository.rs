//! PostgreSQL implementation of the family cache store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use std::sync::Arc;

use crate::domain::entities::{CacheEntry, CacheStats, FamilyMember, FamilySnapshot};
use crate::domain::repositories::CacheStore;
use crate::error::AppError;

/// PostgreSQL store for the `family_cache` table.
///
/// Members are kept as one JSONB array per fid, in rank order.
pub struct PgFamilyCacheRepository {
    pool: Arc<PgPool>,
}

impl PgFamilyCacheRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FamilyCacheRow {
    fid: i64,
    members: Json<Vec<FamilyMember>>,
    updated_at: DateTime<Utc>,
}

impl From<FamilyCacheRow> for CacheEntry<FamilySnapshot> {
    fn from(row: FamilyCacheRow) -> Self {
        CacheEntry::new(
            row.fid,
            FamilySnapshot {
                members: row.members.0,
            },
            row.updated_at,
        )
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct StatsRow {
    pub total: i64,
    pub stale: i64,
}

impl From<StatsRow> for CacheStats {
    fn from(row: StatsRow) -> Self {
        CacheStats {
            total: row.total,
            stale: row.stale,
        }
    }
}

#[async_trait]
impl CacheStore<FamilySnapshot> for PgFamilyCacheRepository {
    async fn find_by_key(&self, key: i64) -> Result<Option<CacheEntry<FamilySnapshot>>, AppError> {
        let row = sqlx::query_as::<_, FamilyCacheRow>(
            r#"
            SELECT fid, members, updated_at
            FROM family_cache
            WHERE fid = $1
            "#,
        )
        .bind(key)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn upsert(
        &self,
        key: i64,
        value: FamilySnapshot,
        updated_at: DateTime<Utc>,
    ) -> Result<CacheEntry<FamilySnapshot>, AppError> {
        let row = sqlx::query_as::<_, FamilyCacheRow>(
            r#"
            INSERT INTO family_cache (fid, members, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (fid) DO UPDATE SET
                members    = EXCLUDED.members,
                updated_at = EXCLUDED.updated_at
            RETURNING fid, members, updated_at
            "#,
        )
        .bind(key)
        .bind(Json(value.members))
        .bind(updated_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM family_cache WHERE updated_at < $1")
            .bind(cutoff)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn stats(&self, stale_before: DateTime<Utc>) -> Result<CacheStats, AppError> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE updated_at < $1) AS stale
            FROM family_cache
            "#,
        )
        .bind(stale_before)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }
}
