//! PostgreSQL implementation of the NFT ownership cache store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use super::pg_family_cache_repository::StatsRow;
use crate::domain::entities::{CacheEntry, CacheStats, NftOwnership};
use crate::domain::repositories::CacheStore;
use crate::error::AppError;

/// PostgreSQL store for the `nft_ownership_cache` table.
///
/// Rows with `holding_nft = FALSE` are regular entries, not absences.
pub struct PgNftCacheRepository {
    pool: Arc<PgPool>,
}

impl PgNftCacheRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct NftCacheRow {
    fid: i64,
    holding_nft: bool,
    nft_image: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<NftCacheRow> for CacheEntry<NftOwnership> {
    fn from(row: NftCacheRow) -> Self {
        CacheEntry::new(
            row.fid,
            NftOwnership {
                holding_nft: row.holding_nft,
                nft_image: row.nft_image,
            },
            row.updated_at,
        )
    }
}

#[async_trait]
impl CacheStore<NftOwnership> for PgNftCacheRepository {
    async fn find_by_key(&self, key: i64) -> Result<Option<CacheEntry<NftOwnership>>, AppError> {
        let row = sqlx::query_as::<_, NftCacheRow>(
            r#"
            SELECT fid, holding_nft, nft_image, updated_at
            FROM nft_ownership_cache
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
        value: NftOwnership,
        updated_at: DateTime<Utc>,
    ) -> Result<CacheEntry<NftOwnership>, AppError> {
        let row = sqlx::query_as::<_, NftCacheRow>(
            r#"
            INSERT INTO nft_ownership_cache (fid, holding_nft, nft_image, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (fid) DO UPDATE SET
                holding_nft = EXCLUDED.holding_nft,
                nft_image   = EXCLUDED.nft_image,
                updated_at  = EXCLUDED.updated_at
            RETURNING fid, holding_nft, nft_image, updated_at
            "#,
        )
        .bind(key)
        .bind(value.holding_nft)
        .bind(value.nft_image)
        .bind(updated_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM nft_ownership_cache WHERE updated_at < $1")
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
            FROM nft_ownership_cache
            "#,
        )
        .bind(stale_before)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }
}
