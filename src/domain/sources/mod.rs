//! External data source trait definitions.
//!
//! The authoritative data behind every cache lives in third-party HTTP APIs.
//! These traits describe the calls the services need; the infrastructure layer
//! provides the HTTP clients.
//!
//! - [`SocialGraphSource`] - Farcaster social graph (Neynar)
//! - [`NftOwnershipSource`] - NFT index (Alchemy)
//! - [`ImageGenerationSource`] - Generative image model (Gemini)

pub mod image_generation;
pub mod nft_ownership;
pub mod social_graph;

pub use image_generation::ImageGenerationSource;
pub use nft_ownership::NftOwnershipSource;
pub use social_graph::SocialGraphSource;

#[cfg(test)]
pub use image_generation::MockImageGenerationSource;
#[cfg(test)]
pub use nft_ownership::MockNftOwnershipSource;
#[cfg(test)]
pub use social_graph::MockSocialGraphSource;
