//! A user's "family": the ranked best-friends list enriched with profiles.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::user::FarcasterUser;

/// One entry of the social API best-friends ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestFriend {
    pub fid: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub mutual_affinity_score: f64,
}

/// A ranked family member with the profile captured at refresh time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub fid: i64,
    pub username: String,
    pub mutual_affinity_score: f64,
    #[serde(default)]
    pub profile: Option<FarcasterUser>,
}

/// The cached family value: members in best-friends rank order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilySnapshot {
    pub members: Vec<FamilyMember>,
}

impl FamilySnapshot {
    /// Joins the ranking with bulk-fetched profiles.
    ///
    /// Member order follows `best_friends`. Profiles are matched by fid;
    /// members without a matching profile keep `profile: None`.
    pub fn assemble(best_friends: Vec<BestFriend>, profiles: Vec<FarcasterUser>) -> Self {
        let mut by_fid: HashMap<i64, FarcasterUser> =
            profiles.into_iter().map(|p| (p.fid, p)).collect();

        let members = best_friends
            .into_iter()
            .map(|friend| FamilyMember {
                profile: by_fid.remove(&friend.fid),
                fid: friend.fid,
                username: friend.username,
                mutual_affinity_score: friend.mutual_affinity_score,
            })
            .collect();

        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
