//! DTOs for the bulk users endpoint.

use serde::{Deserialize, Serialize};
use serde_with::formats::CommaSeparator;
use serde_with::{StringWithSeparator, serde_as};

use crate::domain::entities::FarcasterUser;

/// Query string of `GET /api/users`.
///
/// `fids` is a comma-separated list (`?fids=1,2,3`).
#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersQuery {
    #[serde_as(as = "StringWithSeparator::<CommaSeparator, i64>")]
    pub fids: Vec<i64>,

    #[serde(default)]
    pub viewer_fid: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<FarcasterUser>,
}
