//! Domain layer containing business entities and the contracts of the outside world.
//!
//! This module defines what the service caches and where the data comes from,
//! independent of PostgreSQL, HTTP or any other infrastructure concern.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures (cached family graph, NFT ownership, events)
//! - [`repositories`] - Persistence trait definitions (cache stores, event log)
//! - [`sources`] - External data source trait definitions (social graph, NFT index)
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository and source traits are implemented by the infrastructure layer
//! - Caching and retry policy live in [`crate::application`]

pub mod entities;
pub mod repositories;
pub mod sources;
