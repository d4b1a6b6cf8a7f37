//! Business logic services for the application layer.

pub mod event_service;
pub mod family_service;
pub mod nft_service;
pub mod reskin_service;
pub mod user_service;

pub use event_service::EventService;
pub use family_service::FamilyService;
pub use nft_service::NftService;
pub use reskin_service::ReskinService;
pub use user_service::UserService;

use crate::error::AppError;
use serde_json::json;

/// Rejects Farcaster ids that cannot exist (ids start at 1).
pub(crate) fn ensure_valid_fid(fid: i64) -> Result<(), AppError> {
    if fid <= 0 {
        return Err(AppError::bad_request(
            "fid must be a positive integer",
            json!({ "fid": fid }),
        ));
    }
    Ok(())
}
