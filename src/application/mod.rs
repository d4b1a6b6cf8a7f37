//! Application layer: caching policy and service orchestration.
//!
//! Services consume the domain's repository and source traits and provide the
//! operations the HTTP handlers call.
//!
//! # Modules
//!
//! - [`cache`] - Generic read-through cache over a [`crate::domain::repositories::CacheStore`]
//! - [`retry`] - Fixed-delay retry wrapper for outbound calls
//! - [`services`] - Family, NFT ownership, user profile and event services

pub mod cache;
pub mod retry;
pub mod services;
