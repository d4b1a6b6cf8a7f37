//! Cache row wrapper and lookup outcome types.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// A cached value keyed by Farcaster id.
///
/// `updated_at` is written on every upsert and is the only staleness signal.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub key: i64,
    pub value: V,
    pub updated_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    pub fn new(key: i64, value: V, updated_at: DateTime<Utc>) -> Self {
        Self {
            key,
            value,
            updated_at,
        }
    }

    /// Time elapsed since the row was last written.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.updated_at
    }

    /// Returns true while the row is younger than `window`.
    ///
    /// A row exactly `window` old is stale. Rows stamped in the future
    /// (clock skew between writers) count as fresh.
    pub fn is_fresh(&self, window: Duration, now: DateTime<Utc>) -> bool {
        self.age(now) < window
    }
}

/// How a read-through lookup was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheOutcome {
    /// Fresh row returned without calling the external source.
    Hit,
    /// No row existed; the source was called and the row created.
    Miss,
    /// A stale row existed; the source was called and the row overwritten.
    Refreshed,
}

impl CacheOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Miss => "miss",
            CacheOutcome::Refreshed => "refreshed",
        }
    }
}

/// Result of a read-through lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheLookup<V> {
    pub value: V,
    pub updated_at: DateTime<Utc>,
    pub outcome: CacheOutcome,
}

impl<V> CacheLookup<V> {
    pub fn from_entry(entry: CacheEntry<V>, outcome: CacheOutcome) -> Self {
        Self {
            value: entry.value,
            updated_at: entry.updated_at,
            outcome,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.outcome == CacheOutcome::Hit
    }
}

/// Row counts of a cache table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total: i64,
    pub stale: i64,
}
