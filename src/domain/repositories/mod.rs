//! Repository trait definitions for the domain layer.
//!
//! These traits abstract persistence so services can be tested with
//! `mockall` mocks and run against PostgreSQL in production.
//!
//! # Available Repositories
//!
//! - [`CacheStore`] - Generic keyed cache table (family graph, NFT ownership)
//! - [`UserEventRepository`] - Client event log
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod cache_store;
pub mod event_repository;

pub use cache_store::CacheStore;
pub use event_repository::UserEventRepository;

#[cfg(test)]
pub use cache_store::MockCacheStore;
#[cfg(test)]
pub use event_repository::MockUserEventRepository;
