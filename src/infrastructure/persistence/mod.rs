//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain store traits using SQLx runtime
//! queries mapped through `FromRow` row structs.
//!
//! # Repositories
//!
//! - [`PgFamilyCacheRepository`] - Family cache (`family_cache`)
//! - [`PgNftCacheRepository`] - NFT ownership cache (`nft_ownership_cache`)
//! - [`PgUserEventRepository`] - Client event log (`user_events`)

pub mod pg_event_repository;
pub mod pg_family_cache_repository;
pub mod pg_nft_cache_repository;

pub use pg_event_repository::PgUserEventRepository;
pub use pg_family_cache_repository::PgFamilyCacheRepository;
pub use pg_nft_cache_repository::PgNftCacheRepository;
