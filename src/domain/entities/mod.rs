//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`CacheEntry`] - A cached value together with its last write time
//! - [`FamilySnapshot`] / [`FamilyMember`] - A user's ranked best friends with profiles
//! - [`FarcasterUser`] - A Farcaster profile as returned by the social API
//! - [`InlineImage`] / [`Reskin`] - Images sent to and produced by the generative model
//! - [`NftOwnership`] - Whether a user holds the collection NFT
//! - [`UserEvent`] - A client-side event logged by the mini-app

pub mod cache_entry;
pub mod event;
pub mod family;
pub mod image;
pub mod nft;
pub mod user;

pub use cache_entry::{CacheEntry, CacheLookup, CacheOutcome, CacheStats};
pub use event::{NewUserEvent, UserEvent};
pub use family::{BestFriend, FamilyMember, FamilySnapshot};
pub use image::{CreatureGender, InlineImage, Reskin};
pub use nft::{NftOwnership, OwnedToken};
pub use user::{FarcasterUser, VerifiedAddresses};
