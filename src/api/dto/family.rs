//! DTOs for the family endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{CacheLookup, CacheOutcome, FamilyMember, FamilySnapshot};

/// Query string of `GET /api/family`.
#[derive(Debug, Deserialize)]
pub struct FamilyQuery {
    pub fid: i64,
}

/// A user's family with cache metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyResponse {
    pub family: Vec<FamilyMember>,
    pub cache: CacheOutcome,
    pub updated_at: DateTime<Utc>,
}

impl From<CacheLookup<FamilySnapshot>> for FamilyResponse {
    fn from(lookup: CacheLookup<FamilySnapshot>) -> Self {
        Self {
            family: lookup.value.members,
            cache: lookup.outcome,
            updated_at: lookup.updated_at,
        }
    }
}
