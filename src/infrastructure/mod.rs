//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and the third-party APIs.
//!
//! # Modules
//!
//! - [`http`] - Neynar and Alchemy HTTP clients
//! - [`persistence`] - PostgreSQL repository implementations

pub mod http;
pub mod persistence;
