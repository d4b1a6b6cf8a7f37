//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod events;
pub mod family;
pub mod health;
pub mod nft;
pub mod reskin;
pub mod users;
