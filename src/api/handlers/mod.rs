//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod events;
pub mod family;
pub mod health;
pub mod nft;
pub mod reskin;
pub mod users;

pub use events::log_event_handler;
pub use family::family_handler;
pub use health::health_handler;
pub use nft::nft_check_handler;
pub use reskin::reskin_handler;
pub use users::users_handler;
